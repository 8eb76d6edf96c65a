use std::time::Duration;

pub(crate) const API_BASE: &str = "https://api.mangadex.org";

/// Alternate CORS relays swept in order when the direct endpoint fails.
pub(crate) const RELAY_BASES: &[&str] = &[
    "https://cors.isomorphic-git.org/",
    "https://r.jina.ai/http/",
];

pub(crate) const UPLOADS_BASE: &str = "https://uploads.mangadex.org";

pub(crate) const SEARCH_PAGE_SIZE: u32 = 24;
pub(crate) const CHAPTER_PAGE_SIZE: u32 = 50;

/// Prefer the lower-bandwidth page variant when the server offers one.
pub(crate) const USE_DATA_SAVER: bool = true;

pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub(crate) const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const DEFAULT_LANGUAGE: &str = "en";
pub(crate) const LANGUAGES: &[&str] = &["en", "es-la", "es"];

pub(crate) fn next_language(current: &str) -> &'static str {
    let idx = LANGUAGES
        .iter()
        .position(|lang| *lang == current)
        .unwrap_or(0);
    LANGUAGES[(idx + 1) % LANGUAGES.len()]
}
