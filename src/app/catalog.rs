use chrono::{DateTime, Local};
use serde_json::Value;

use crate::config;

use super::state::ChapterRef;

pub(crate) const TEXT_PLACEHOLDER: &str = "—";
pub(crate) const UNTITLED: &str = "Untitled";

const TITLE_LANGUAGE_PREFERENCE: &[&str] = &["en", "es-la", "es"];
const MAX_AUTHOR_NAMES: usize = 2;
const MAX_ALT_TITLES: usize = 3;
const MAX_TAGS: usize = 6;

/// Display fields derived once per title record; everything downstream
/// works with this instead of the raw API shape.
#[derive(Debug, Clone)]
pub(crate) struct TitleCard {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) authors: String,
    pub(crate) status: String,
    pub(crate) cover: Option<String>,
    pub(crate) alt_titles: String,
    pub(crate) tag_line: String,
}

pub(crate) fn title_card(record: &Value) -> TitleCard {
    TitleCard {
        id: record_id(record).unwrap_or_default().to_string(),
        title: display_title(record),
        authors: authors(record),
        status: status_label(record),
        cover: cover_url(record),
        alt_titles: alt_titles(record),
        tag_line: tag_line(record),
    }
}

pub(crate) fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn relationships(record: &Value) -> &[Value] {
    record
        .get("relationships")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn relationship_of_type<'a>(record: &'a Value, kind: &str) -> Option<&'a Value> {
    relationships(record)
        .iter()
        .find(|rel| rel.get("type").and_then(Value::as_str) == Some(kind))
}

// English first, then the two Spanish variants, then whatever translation
// exists at all.
pub(crate) fn display_title(record: &Value) -> String {
    let Some(translations) = record
        .pointer("/attributes/title")
        .and_then(Value::as_object)
    else {
        return UNTITLED.to_string();
    };

    for lang in TITLE_LANGUAGE_PREFERENCE {
        if let Some(text) = translations.get(*lang).and_then(Value::as_str)
            && !text.is_empty()
        {
            return text.to_string();
        }
    }

    translations
        .values()
        .find_map(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}

pub(crate) fn cover_url(record: &Value) -> Option<String> {
    let rel = relationship_of_type(record, "cover_art")?;
    let file_name = rel.pointer("/attributes/fileName").and_then(Value::as_str)?;
    if file_name.is_empty() {
        return None;
    }
    let title_id = record_id(record)?;
    Some(format!(
        "{}/covers/{title_id}/{file_name}.256.jpg",
        config::UPLOADS_BASE
    ))
}

pub(crate) fn authors(record: &Value) -> String {
    let mut names: Vec<String> = Vec::new();
    for rel in relationships(record) {
        let kind = rel.get("type").and_then(Value::as_str);
        if kind != Some("author") && kind != Some("artist") {
            continue;
        }
        let Some(name) = rel.pointer("/attributes/name").and_then(Value::as_str) else {
            continue;
        };
        if name.is_empty() || names.iter().any(|seen| seen == name) {
            continue;
        }
        names.push(name.to_string());
    }

    if names.is_empty() {
        return TEXT_PLACEHOLDER.to_string();
    }
    names.truncate(MAX_AUTHOR_NAMES);
    names.join(", ")
}

pub(crate) fn status_label(record: &Value) -> String {
    record
        .pointer("/attributes/status")
        .and_then(Value::as_str)
        .map(|status| status.replace('_', " "))
        .unwrap_or_else(|| TEXT_PLACEHOLDER.to_string())
}

pub(crate) fn alt_titles(record: &Value) -> String {
    let Some(entries) = record
        .pointer("/attributes/altTitles")
        .and_then(Value::as_array)
    else {
        return String::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.as_object()?.values().find_map(Value::as_str))
        .filter(|text| !text.is_empty())
        .take(MAX_ALT_TITLES)
        .collect::<Vec<_>>()
        .join(" · ")
}

pub(crate) fn tag_line(record: &Value) -> String {
    let Some(tags) = record.pointer("/attributes/tags").and_then(Value::as_array) else {
        return String::new();
    };

    tags.iter()
        .filter_map(|tag| {
            tag.pointer("/attributes/name/en")
                .or_else(|| tag.pointer("/attributes/name/es"))
                .and_then(Value::as_str)
        })
        .filter(|name| !name.is_empty())
        .take(MAX_TAGS)
        .collect::<Vec<_>>()
        .join(" · ")
}

pub(crate) fn group_name(chapter: &Value) -> String {
    relationship_of_type(chapter, "scanlation_group")
        .and_then(|rel| rel.pointer("/attributes/name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| TEXT_PLACEHOLDER.to_string())
}

pub(crate) fn chapter_ref(record: &Value) -> ChapterRef {
    let number = record
        .pointer("/attributes/chapter")
        .and_then(Value::as_str)
        .filter(|number| !number.is_empty())
        .unwrap_or(TEXT_PLACEHOLDER)
        .to_string();
    let title = record
        .pointer("/attributes/title")
        .and_then(Value::as_str)
        .filter(|title| !title.is_empty())
        .map(str::to_string);

    ChapterRef {
        id: record_id(record).unwrap_or_default().to_string(),
        number,
        title,
        group: group_name(record),
        published: publish_date(record),
    }
}

// First present of publishAt/readableAt/createdAt, shown as a local date.
pub(crate) fn publish_date(record: &Value) -> String {
    let raw = ["publishAt", "readableAt", "createdAt"]
        .iter()
        .find_map(|field| {
            record
                .pointer(&format!("/attributes/{field}"))
                .and_then(Value::as_str)
                .filter(|raw| !raw.is_empty())
        });
    let Some(raw) = raw else {
        return String::new();
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub(crate) fn list_data(response: &Value) -> &[Value] {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(crate) fn list_total(response: &Value) -> u64 {
    response.get("total").and_then(Value::as_u64).unwrap_or(0)
}

pub(crate) fn list_limit(response: &Value, fallback: u32) -> u32 {
    response
        .get("limit")
        .and_then(Value::as_u64)
        .filter(|limit| *limit > 0)
        .map(|limit| limit as u32)
        .unwrap_or(fallback)
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

/// Page URLs for an at-home server response. Data-saver wins only when
/// enabled and its file list is non-empty; otherwise full quality.
/// None means the response is missing baseUrl/hash/file lists entirely.
pub(crate) fn page_urls(at_home: &Value, use_data_saver: bool) -> Option<Vec<String>> {
    let base_url = at_home.get("baseUrl").and_then(Value::as_str)?;
    let chapter = at_home.get("chapter")?;
    let hash = chapter.get("hash").and_then(Value::as_str)?;

    let data_saver = chapter.get("dataSaver").and_then(Value::as_array);
    let (segment, files) = match data_saver {
        Some(files) if use_data_saver && !files.is_empty() => ("data-saver", files),
        _ => ("data", chapter.get("data").and_then(Value::as_array)?),
    };

    Some(
        files
            .iter()
            .filter_map(Value::as_str)
            .map(|file| format!("{base_url}/{segment}/{hash}/{file}"))
            .collect(),
    )
}
