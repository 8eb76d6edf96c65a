use serde_json::Value;

use crate::config;
use crate::http::{self, ParamValue};

use super::catalog::{self, TitleCard};
use super::state::{self, ChapterListState, ChapterOrder, ChapterRef, ReaderState, SearchState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Search,
    Details,
    Reader,
}

pub(crate) type Fetcher = Box<dyn Fn(&str, &[(&str, ParamValue)]) -> Result<Value, String>>;

/// Owns all view state and is the only layer that talks to the gateway.
/// Every fetch failure becomes a status line plus an inline placeholder
/// for the affected region; nothing propagates past these methods.
pub(crate) struct App {
    pub(crate) mode: Mode,
    pub(crate) search: SearchState,
    pub(crate) results: Vec<TitleCard>,
    pub(crate) results_placeholder: Option<String>,
    pub(crate) selected_result: usize,
    pub(crate) current_title: Option<TitleCard>,
    pub(crate) chapters: ChapterListState,
    pub(crate) chapters_placeholder: Option<String>,
    pub(crate) selected_chapter: usize,
    pub(crate) reader: Option<ReaderState>,
    pub(crate) status: String,
    fetch: Fetcher,
}

impl App {
    pub(crate) fn new() -> Self {
        Self::with_fetcher(Box::new(|path, params| http::fetch_json(path, params)))
    }

    pub(crate) fn with_fetcher(fetch: Fetcher) -> Self {
        Self {
            mode: Mode::Search,
            search: SearchState::new(),
            results: Vec::new(),
            results_placeholder: None,
            selected_result: 0,
            current_title: None,
            chapters: ChapterListState::new(ChapterOrder::Desc),
            chapters_placeholder: None,
            selected_chapter: 0,
            reader: None,
            status: status_info("Type a title and press Enter to search."),
            fetch,
        }
    }

    pub(crate) fn submit_search(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.status = status_error("Type a title to search.");
            return;
        }
        self.search.query = trimmed.to_string();
        self.search.page = 1;
        self.run_search();
    }

    pub(crate) fn run_search(&mut self) {
        self.status = status_info(&format!("Searching \"{}\"...", self.search.query));
        let offset = (self.search.page - 1) * config::SEARCH_PAGE_SIZE;
        let params = [
            ("title", ParamValue::one(self.search.query.clone())),
            ("limit", ParamValue::one(config::SEARCH_PAGE_SIZE.to_string())),
            ("offset", ParamValue::one(offset.to_string())),
            (
                "includes[]",
                ParamValue::many(["cover_art", "author", "artist"]),
            ),
        ];

        match (self.fetch)("/manga", &params) {
            Ok(response) => {
                self.results = catalog::list_data(&response)
                    .iter()
                    .map(catalog::title_card)
                    .collect();
                let total = catalog::list_total(&response);
                let limit = catalog::list_limit(&response, config::SEARCH_PAGE_SIZE);
                self.search.last_page = state::last_page(total, limit);
                self.selected_result = 0;
                self.results_placeholder = self
                    .results
                    .is_empty()
                    .then(|| "No results found. Try another title.".to_string());
                self.status = status_info(&format!("Results for \"{}\"", self.search.query));
            }
            Err(err) => {
                self.results.clear();
                self.selected_result = 0;
                self.results_placeholder = Some(format!("Search failed: {err}"));
                self.status = status_error(&format!("Search failed: {err}"));
            }
        }
    }

    pub(crate) fn search_page(&mut self, delta: i32) {
        let next = state::step_page(self.search.page, self.search.last_page, delta);
        if next == self.search.page {
            return;
        }
        self.search.page = next;
        self.run_search();
    }

    pub(crate) fn select_result(&mut self, delta: i32) {
        self.selected_result = step_selection(self.selected_result, self.results.len(), delta);
    }

    pub(crate) fn open_selected_title(&mut self) {
        let Some(card) = self.results.get(self.selected_result).cloned() else {
            return;
        };
        self.open_title(card);
    }

    // Order carries over from the current selector value; the page always
    // starts back at 1 for a freshly opened title.
    pub(crate) fn open_title(&mut self, card: TitleCard) {
        self.current_title = Some(card);
        self.chapters.reset(self.chapters.order);
        self.chapters_placeholder = None;
        self.selected_chapter = 0;
        self.mode = Mode::Details;
        self.load_chapters();
    }

    pub(crate) fn open_title_by_id(&mut self, manga_id: &str) {
        self.open_title(TitleCard {
            id: manga_id.to_string(),
            title: manga_id.to_string(),
            authors: catalog::TEXT_PLACEHOLDER.to_string(),
            status: catalog::TEXT_PLACEHOLDER.to_string(),
            cover: None,
            alt_titles: String::new(),
            tag_line: String::new(),
        });
    }

    pub(crate) fn load_chapters(&mut self) {
        let Some(title) = self.current_title.as_ref() else {
            return;
        };
        let manga_id = title.id.clone();
        self.status = status_info("Loading chapters...");

        let offset = (self.chapters.page - 1) * config::CHAPTER_PAGE_SIZE;
        let params = [
            ("manga", ParamValue::one(manga_id)),
            (
                "translatedLanguage[]",
                ParamValue::many([self.search.language.clone()]),
            ),
            (
                "limit",
                ParamValue::one(config::CHAPTER_PAGE_SIZE.to_string()),
            ),
            ("offset", ParamValue::one(offset.to_string())),
            (
                "order[chapter]",
                ParamValue::one(self.chapters.order.query_value()),
            ),
            (
                "includes[]",
                ParamValue::many(["scanlation_group", "user"]),
            ),
        ];

        match (self.fetch)("/chapter", &params) {
            Ok(response) => {
                self.chapters.chapters = catalog::list_data(&response)
                    .iter()
                    .map(catalog::chapter_ref)
                    .collect();
                let total = catalog::list_total(&response);
                self.chapters.last_page = state::last_page(total, config::CHAPTER_PAGE_SIZE);
                self.selected_chapter = 0;
                self.chapters_placeholder = self.chapters.chapters.is_empty().then(|| {
                    format!("No chapters available in {}.", self.search.language)
                });
                self.status = status_info(&format!(
                    "Chapters in {} loaded ({})",
                    self.search.language.to_uppercase(),
                    self.chapters.chapters.len()
                ));
            }
            Err(err) => {
                self.chapters.chapters.clear();
                self.selected_chapter = 0;
                self.chapters_placeholder = Some(format!("Chapters failed to load: {err}"));
                self.status = status_error(&format!("Chapters failed to load: {err}"));
            }
        }
    }

    pub(crate) fn chapter_page(&mut self, delta: i32) {
        let next = state::step_page(self.chapters.page, self.chapters.last_page, delta);
        if next == self.chapters.page {
            return;
        }
        self.chapters.page = next;
        self.load_chapters();
    }

    pub(crate) fn select_chapter(&mut self, delta: i32) {
        self.selected_chapter =
            step_selection(self.selected_chapter, self.chapters.chapters.len(), delta);
    }

    pub(crate) fn set_language(&mut self, language: &str) {
        self.search.language = language.to_string();
        if self.mode == Mode::Details {
            self.chapters.page = 1;
            self.load_chapters();
        }
    }

    pub(crate) fn cycle_language(&mut self) {
        let next = config::next_language(&self.search.language);
        self.set_language(next);
    }

    pub(crate) fn set_order(&mut self, order: ChapterOrder) {
        if self.chapters.order == order {
            return;
        }
        self.chapters.order = order;
        if self.mode == Mode::Details {
            self.chapters.page = 1;
            self.load_chapters();
        }
    }

    pub(crate) fn toggle_order(&mut self) {
        self.set_order(self.chapters.order.toggled());
    }

    pub(crate) fn open_selected_chapter(&mut self) {
        let Some(chapter) = self.chapters.chapters.get(self.selected_chapter).cloned() else {
            return;
        };
        self.open_chapter(chapter);
    }

    pub(crate) fn open_chapter(&mut self, chapter: ChapterRef) {
        self.status = status_info("Opening chapter...");
        let path = format!("/at-home/server/{}", chapter.id);

        match (self.fetch)(&path, &[]) {
            Ok(response) => {
                let Some(pages) = catalog::page_urls(&response, config::USE_DATA_SAVER) else {
                    self.status = status_error("Could not open chapter: malformed server response.");
                    return;
                };
                let chapter_pos = self
                    .chapters
                    .chapters
                    .iter()
                    .position(|candidate| candidate.id == chapter.id);
                let title_name = self
                    .current_title
                    .as_ref()
                    .map(|title| title.title.clone())
                    .unwrap_or_default();

                self.reader = Some(ReaderState {
                    title_name,
                    chapter,
                    page_urls: pages,
                    page_index: 0,
                    chapter_list: self.chapters.chapters.clone(),
                    chapter_pos,
                });
                self.mode = Mode::Reader;
                self.status.clear();
            }
            Err(err) => {
                // Reader keeps whatever chapter it had; the failure is
                // surfaced and the user can retry.
                self.status = status_error(&format!("Could not open chapter: {err}"));
            }
        }
    }

    pub(crate) fn turn_page(&mut self, delta: i32) {
        if let Some(reader) = self.reader.as_mut() {
            reader.turn_page(delta);
        }
    }

    pub(crate) fn turn_chapter(&mut self, delta: i32) {
        let Some(target) = self
            .reader
            .as_ref()
            .and_then(|reader| reader.chapter_at_offset(delta))
            .cloned()
        else {
            return;
        };
        self.open_chapter(target);
    }

    pub(crate) fn close_reader(&mut self) {
        self.reader = None;
        self.mode = Mode::Details;
        self.status.clear();
    }

    pub(crate) fn back_to_search(&mut self) {
        self.mode = Mode::Search;
        self.status.clear();
    }
}

fn step_selection(current: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let last = (len - 1) as i64;
    (current as i64 + i64::from(delta)).clamp(0, last) as usize
}

pub(crate) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(crate) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
