use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChapterOrder {
    Asc,
    Desc,
}

impl ChapterOrder {
    pub(crate) fn query_value(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Asc => "oldest first",
            Self::Desc => "newest first",
        }
    }

    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// One row of the loaded chapter list; cloned wholesale into the reader
/// snapshot so next/prev chapter works without re-fetching the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChapterRef {
    pub(crate) id: String,
    pub(crate) number: String,
    pub(crate) title: Option<String>,
    pub(crate) group: String,
    pub(crate) published: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SearchState {
    pub(crate) query: String,
    pub(crate) language: String,
    pub(crate) page: u32,
    pub(crate) last_page: u32,
}

impl SearchState {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            language: config::DEFAULT_LANGUAGE.to_string(),
            page: 1,
            last_page: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ChapterListState {
    pub(crate) order: ChapterOrder,
    pub(crate) page: u32,
    pub(crate) last_page: u32,
    pub(crate) chapters: Vec<ChapterRef>,
}

impl ChapterListState {
    pub(crate) fn new(order: ChapterOrder) -> Self {
        Self {
            order,
            page: 1,
            last_page: 1,
            chapters: Vec::new(),
        }
    }

    // Opening a title or flipping the order starts over from page 1.
    pub(crate) fn reset(&mut self, order: ChapterOrder) {
        *self = Self::new(order);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ReaderState {
    pub(crate) title_name: String,
    pub(crate) chapter: ChapterRef,
    pub(crate) page_urls: Vec<String>,
    pub(crate) page_index: usize,
    pub(crate) chapter_list: Vec<ChapterRef>,
    pub(crate) chapter_pos: Option<usize>,
}

impl ReaderState {
    pub(crate) fn turn_page(&mut self, delta: i32) {
        if self.page_urls.is_empty() {
            return;
        }
        let last = (self.page_urls.len() - 1) as i64;
        self.page_index = (self.page_index as i64 + i64::from(delta)).clamp(0, last) as usize;
    }

    /// Neighbouring chapter in the snapshotted list. Out of bounds, or an
    /// unknown own position, yields None: no wrap, no re-fetch.
    pub(crate) fn chapter_at_offset(&self, delta: i32) -> Option<&ChapterRef> {
        let pos = self.chapter_pos? as i64 + i64::from(delta);
        if pos < 0 {
            return None;
        }
        self.chapter_list.get(pos as usize)
    }

    pub(crate) fn current_page_url(&self) -> Option<&str> {
        self.page_urls.get(self.page_index).map(String::as_str)
    }
}

pub(crate) fn last_page(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 1;
    }
    total.div_ceil(u64::from(limit)).max(1) as u32
}

pub(crate) fn can_page_prev(page: u32) -> bool {
    page > 1
}

pub(crate) fn can_page_next(page: u32, last_page: u32) -> bool {
    page < last_page
}

// Boundary-clamped pager move; at an edge the page comes back unchanged.
pub(crate) fn step_page(page: u32, last_page: u32, delta: i32) -> u32 {
    let target = i64::from(page) + i64::from(delta);
    target.clamp(1, i64::from(last_page.max(1))) as u32
}
