use std::cell::Cell;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::http::ParamValue;

use super::catalog::*;
use super::controller::{App, Mode};
use super::state::*;

fn title_fixture() -> Value {
    json!({
        "id": "manga-1",
        "attributes": {
            "title": {"ja": "ワンピース", "en": "One Piece", "es": "Una Pieza"},
            "altTitles": [{"ja": "OP"}, {"fr": "La Pièce"}, {"de": "Ein Stück"}, {"it": "Extra"}],
            "status": "on_hiatus",
            "tags": [
                {"attributes": {"name": {"en": "Action"}}},
                {"attributes": {"name": {"es": "Aventura"}}}
            ]
        },
        "relationships": [
            {"type": "author", "attributes": {"name": "Eiichiro Oda"}},
            {"type": "artist", "attributes": {"name": "Eiichiro Oda"}},
            {"type": "cover_art", "attributes": {"fileName": "cover-abc.jpg"}}
        ]
    })
}

#[test]
fn display_title_prefers_english_over_earlier_languages() {
    let record = json!({
        "attributes": {"title": {"ja": "日本語", "es": "Español", "en": "English"}}
    });
    assert_eq!(display_title(&record), "English");
}

#[test]
fn display_title_falls_back_through_spanish_variants() {
    let record = json!({"attributes": {"title": {"ja": "日本語", "es-la": "Latam"}}});
    assert_eq!(display_title(&record), "Latam");
}

#[test]
fn display_title_falls_back_to_first_available_translation() {
    let record = json!({"attributes": {"title": {"ko": "한국어", "fr": "Français"}}});
    assert_eq!(display_title(&record), "한국어");
}

#[test]
fn display_title_placeholder_when_no_translations_exist() {
    assert_eq!(display_title(&json!({"attributes": {"title": {}}})), UNTITLED);
    assert_eq!(display_title(&json!({"id": "x"})), UNTITLED);
}

#[test]
fn authors_caps_at_two_and_deduplicates_exact_repeats() {
    let record = json!({
        "relationships": [
            {"type": "author", "attributes": {"name": "Alpha"}},
            {"type": "artist", "attributes": {"name": "Alpha"}},
            {"type": "author", "attributes": {"name": "Beta"}},
            {"type": "artist", "attributes": {"name": "Gamma"}},
            {"type": "author", "attributes": {"name": "Delta"}},
            {"type": "author", "attributes": {"name": "Epsilon"}}
        ]
    });
    assert_eq!(authors(&record), "Alpha, Beta");
}

#[test]
fn authors_placeholder_when_no_author_relationships() {
    let record = json!({
        "relationships": [{"type": "cover_art", "attributes": {"fileName": "f.jpg"}}]
    });
    assert_eq!(authors(&record), TEXT_PLACEHOLDER);
    assert_eq!(authors(&json!({})), TEXT_PLACEHOLDER);
}

#[test]
fn cover_url_formats_uploads_path() {
    assert_eq!(
        cover_url(&title_fixture()).as_deref(),
        Some("https://uploads.mangadex.org/covers/manga-1/cover-abc.jpg.256.jpg")
    );
}

#[test]
fn cover_url_none_when_relationship_or_file_name_missing() {
    assert!(cover_url(&json!({"id": "m", "relationships": []})).is_none());
    let no_file = json!({"id": "m", "relationships": [{"type": "cover_art", "attributes": {}}]});
    assert!(cover_url(&no_file).is_none());
}

#[test]
fn status_label_replaces_underscores_and_degrades_to_placeholder() {
    assert_eq!(status_label(&title_fixture()), "on hiatus");
    assert_eq!(status_label(&json!({})), TEXT_PLACEHOLDER);
}

#[test]
fn alt_titles_take_first_value_per_entry_capped_at_three() {
    assert_eq!(alt_titles(&title_fixture()), "OP · La Pièce · Ein Stück");
    assert_eq!(alt_titles(&json!({})), "");
}

#[test]
fn tag_line_prefers_english_names_and_falls_back_to_spanish() {
    assert_eq!(tag_line(&title_fixture()), "Action · Aventura");
}

#[test]
fn group_name_reads_scanlation_group_relationship() {
    let chapter = json!({
        "relationships": [{"type": "scanlation_group", "attributes": {"name": "NoGroup Scans"}}]
    });
    assert_eq!(group_name(&chapter), "NoGroup Scans");
    assert_eq!(group_name(&json!({})), TEXT_PLACEHOLDER);
}

#[test]
fn chapter_ref_maps_attributes_with_placeholders() {
    let record = json!({
        "id": "ch-9",
        "attributes": {"chapter": "12.5", "title": "Interlude", "publishAt": "2024-06-15T12:00:00+00:00"},
        "relationships": [{"type": "scanlation_group", "attributes": {"name": "Group A"}}]
    });
    let mapped = chapter_ref(&record);
    assert_eq!(mapped.id, "ch-9");
    assert_eq!(mapped.number, "12.5");
    assert_eq!(mapped.title.as_deref(), Some("Interlude"));
    assert_eq!(mapped.group, "Group A");
    assert!(mapped.published.starts_with("2024-06"));

    let bare = chapter_ref(&json!({"id": "ch-0"}));
    assert_eq!(bare.number, TEXT_PLACEHOLDER);
    assert!(bare.title.is_none());
    assert_eq!(bare.published, "");
}

#[test]
fn publish_date_empty_when_timestamp_is_unparsable() {
    let record = json!({"attributes": {"publishAt": "not-a-date"}});
    assert_eq!(publish_date(&record), "");
}

#[test]
fn page_urls_prefer_data_saver_when_enabled_and_non_empty() {
    let at_home = json!({
        "baseUrl": "https://node.example",
        "chapter": {
            "hash": "h4sh",
            "data": ["full-1.png", "full-2.png"],
            "dataSaver": ["s-1.jpg", "s-2.jpg", "s-3.jpg"]
        }
    });
    let urls = page_urls(&at_home, true).expect("pages should resolve");
    assert_eq!(
        urls,
        vec![
            "https://node.example/data-saver/h4sh/s-1.jpg",
            "https://node.example/data-saver/h4sh/s-2.jpg",
            "https://node.example/data-saver/h4sh/s-3.jpg",
        ]
    );
}

#[test]
fn page_urls_fall_back_to_full_quality_when_data_saver_is_empty() {
    let at_home = json!({
        "baseUrl": "https://node.example",
        "chapter": {"hash": "h4sh", "data": ["full-1.png"], "dataSaver": []}
    });
    let urls = page_urls(&at_home, true).expect("pages should resolve");
    assert_eq!(urls, vec!["https://node.example/data/h4sh/full-1.png"]);
}

#[test]
fn page_urls_use_full_quality_when_data_saver_disabled() {
    let at_home = json!({
        "baseUrl": "https://node.example",
        "chapter": {"hash": "h4sh", "data": ["full-1.png"], "dataSaver": ["s-1.jpg"]}
    });
    let urls = page_urls(&at_home, false).expect("pages should resolve");
    assert_eq!(urls, vec!["https://node.example/data/h4sh/full-1.png"]);
}

#[test]
fn page_urls_none_when_server_response_is_malformed() {
    assert!(page_urls(&json!({"chapter": {"hash": "h"}}), true).is_none());
    assert!(page_urls(&json!({"baseUrl": "https://n", "chapter": {}}), true).is_none());
}

#[test]
fn last_page_rounds_up_and_never_drops_below_one() {
    assert_eq!(last_page(100, 24), 5);
    assert_eq!(last_page(96, 24), 4);
    assert_eq!(last_page(0, 24), 1);
    assert_eq!(last_page(7, 0), 1);
}

#[test]
fn pager_disables_previous_on_first_and_next_on_last_page() {
    assert!(!can_page_prev(1));
    assert!(can_page_prev(2));
    assert!(can_page_next(4, 5));
    assert!(!can_page_next(5, 5));
}

#[test]
fn step_page_clamps_at_both_boundaries() {
    assert_eq!(step_page(1, 5, -1), 1);
    assert_eq!(step_page(5, 5, 1), 5);
    assert_eq!(step_page(3, 5, 1), 4);
    assert_eq!(step_page(3, 5, -1), 2);
}

fn reader_fixture(pos: Option<usize>) -> ReaderState {
    let chapters: Vec<ChapterRef> = (0..3)
        .map(|idx| ChapterRef {
            id: format!("ch-{idx}"),
            number: idx.to_string(),
            title: None,
            group: "Group".to_string(),
            published: String::new(),
        })
        .collect();
    ReaderState {
        title_name: "Some Title".to_string(),
        chapter: chapters[pos.unwrap_or(0)].clone(),
        page_urls: vec![
            "https://n/data/h/1.png".to_string(),
            "https://n/data/h/2.png".to_string(),
            "https://n/data/h/3.png".to_string(),
        ],
        page_index: 0,
        chapter_list: chapters,
        chapter_pos: pos,
    }
}

#[test]
fn turn_page_clamps_into_page_range() {
    let mut reader = reader_fixture(Some(0));
    reader.turn_page(10);
    assert_eq!(reader.page_index, 2);
    reader.turn_page(-10);
    assert_eq!(reader.page_index, 0);
    reader.turn_page(1);
    assert_eq!(reader.page_index, 1);
}

#[test]
fn turn_page_is_noop_when_no_pages_loaded() {
    let mut reader = reader_fixture(Some(0));
    reader.page_urls.clear();
    reader.turn_page(1);
    assert_eq!(reader.page_index, 0);
}

#[test]
fn chapter_at_offset_stops_at_snapshot_boundaries() {
    let reader = reader_fixture(Some(2));
    assert!(reader.chapter_at_offset(1).is_none());
    assert_eq!(
        reader.chapter_at_offset(-1).map(|chapter| chapter.id.as_str()),
        Some("ch-1")
    );

    let first = reader_fixture(Some(0));
    assert!(first.chapter_at_offset(-1).is_none());
}

#[test]
fn chapter_at_offset_requires_a_known_position() {
    let reader = reader_fixture(None);
    assert!(reader.chapter_at_offset(1).is_none());
    assert!(reader.chapter_at_offset(-1).is_none());
}

#[test]
fn chapter_order_parse_toggle_and_query_values() {
    assert_eq!(ChapterOrder::parse("asc"), Some(ChapterOrder::Asc));
    assert_eq!(ChapterOrder::parse("desc"), Some(ChapterOrder::Desc));
    assert_eq!(ChapterOrder::parse("sideways"), None);
    assert_eq!(ChapterOrder::Asc.toggled(), ChapterOrder::Desc);
    assert_eq!(ChapterOrder::Desc.query_value(), "desc");
}

fn search_envelope() -> Value {
    json!({
        "data": [title_fixture(), {"id": "manga-2", "attributes": {"title": {"en": "Second"}}}],
        "total": 100,
        "limit": 24
    })
}

fn counting_app(
    response: Value,
    calls: Rc<Cell<usize>>,
) -> App {
    App::with_fetcher(Box::new(move |_path: &str, _params: &[(&str, ParamValue)]| {
        calls.set(calls.get() + 1);
        Ok(response.clone())
    }))
}

#[test]
fn run_search_populates_results_and_pagination() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(search_envelope(), Rc::clone(&calls));
    app.submit_search("one piece");

    assert_eq!(calls.get(), 1);
    assert_eq!(app.results.len(), 2);
    assert_eq!(app.results[0].title, "One Piece");
    assert_eq!(app.search.page, 1);
    assert_eq!(app.search.last_page, 5);
    assert!(app.results_placeholder.is_none());
    assert!(app.status.starts_with("INFO:"));
}

#[test]
fn submit_search_with_blank_query_sets_error_without_a_request() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(search_envelope(), Rc::clone(&calls));
    app.submit_search("   ");

    assert_eq!(calls.get(), 0);
    assert!(app.status.starts_with("ERROR:"));
}

#[test]
fn run_search_failure_sets_status_and_inline_placeholder() {
    let mut app = App::with_fetcher(Box::new(|_path: &str, _params: &[(&str, ParamValue)]| {
        Err("request failed: primary endpoint and 2 relay(s) unreachable".to_string())
    }));
    app.submit_search("anything");

    assert!(app.results.is_empty());
    assert!(app.status.starts_with("ERROR: Search failed:"));
    let placeholder = app.results_placeholder.as_deref().unwrap_or("");
    assert!(placeholder.contains("unreachable"));
}

#[test]
fn search_page_moves_are_noops_at_the_boundaries() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(search_envelope(), Rc::clone(&calls));
    app.submit_search("one piece");
    assert_eq!(calls.get(), 1);

    app.search_page(-1);
    assert_eq!(calls.get(), 1);
    assert_eq!(app.search.page, 1);

    app.search.page = 5;
    app.search_page(1);
    assert_eq!(calls.get(), 1);
    assert_eq!(app.search.page, 5);

    app.search_page(-1);
    assert_eq!(calls.get(), 2);
    assert_eq!(app.search.page, 4);
}

#[test]
fn load_chapters_maps_refs_and_uses_fixed_page_size_for_last_page() {
    let envelope = json!({
        "data": [
            {"id": "ch-1", "attributes": {"chapter": "1"}},
            {"id": "ch-2", "attributes": {"chapter": "2"}}
        ],
        "total": 120,
        "limit": 50
    });
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(envelope, Rc::clone(&calls));
    app.open_title_by_id("manga-1");

    assert_eq!(app.mode, Mode::Details);
    assert_eq!(app.chapters.chapters.len(), 2);
    assert_eq!(app.chapters.chapters[0].id, "ch-1");
    assert_eq!(app.chapters.last_page, 3);
    assert!(app.chapters_placeholder.is_none());
}

#[test]
fn language_change_in_details_resets_chapter_page_and_reloads() {
    let envelope = json!({"data": [], "total": 0, "limit": 50});
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(envelope, Rc::clone(&calls));
    app.open_title_by_id("manga-1");
    assert_eq!(calls.get(), 1);

    app.chapters.page = 3;
    app.set_language("es");
    assert_eq!(app.search.language, "es");
    assert_eq!(app.chapters.page, 1);
    assert_eq!(calls.get(), 2);
}

#[test]
fn order_toggle_resets_chapter_page_and_reloads() {
    let envelope = json!({"data": [], "total": 0, "limit": 50});
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(envelope, Rc::clone(&calls));
    app.open_title_by_id("manga-1");
    app.chapters.page = 2;
    app.toggle_order();

    assert_eq!(app.chapters.order, ChapterOrder::Asc);
    assert_eq!(app.chapters.page, 1);
    assert_eq!(calls.get(), 2);
}

#[test]
fn language_change_outside_details_does_not_fetch() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(json!({}), Rc::clone(&calls));
    app.set_language("es-la");

    assert_eq!(app.search.language, "es-la");
    assert_eq!(calls.get(), 0);
}

fn at_home_envelope(data_saver: Vec<&str>) -> Value {
    json!({
        "baseUrl": "https://node.example",
        "chapter": {
            "hash": "h4sh",
            "data": ["full-1.png", "full-2.png"],
            "dataSaver": data_saver
        }
    })
}

#[test]
fn open_chapter_builds_reader_with_data_saver_urls() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(
        at_home_envelope(vec!["s-1.jpg", "s-2.jpg", "s-3.jpg"]),
        Rc::clone(&calls),
    );
    app.open_chapter(ChapterRef {
        id: "ch-1".to_string(),
        number: "1".to_string(),
        title: None,
        group: "Group".to_string(),
        published: String::new(),
    });

    assert_eq!(app.mode, Mode::Reader);
    let reader = app.reader.as_ref().expect("reader should be open");
    assert_eq!(reader.page_urls.len(), 3);
    assert!(reader.page_urls[0].contains("/data-saver/"));
    assert_eq!(reader.page_index, 0);
}

#[test]
fn open_chapter_failure_keeps_mode_and_reports_error() {
    let mut app = App::with_fetcher(Box::new(|_path: &str, _params: &[(&str, ParamValue)]| {
        Err("request failed: primary endpoint and 2 relay(s) unreachable".to_string())
    }));
    app.open_chapter(ChapterRef {
        id: "ch-1".to_string(),
        number: "1".to_string(),
        title: None,
        group: "Group".to_string(),
        published: String::new(),
    });

    assert_eq!(app.mode, Mode::Search);
    assert!(app.reader.is_none());
    assert!(app.status.starts_with("ERROR: Could not open chapter:"));
}

#[test]
fn turn_chapter_past_snapshot_end_changes_nothing_and_skips_fetch() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(json!({}), Rc::clone(&calls));
    app.reader = Some(reader_fixture(Some(2)));
    app.mode = Mode::Reader;

    app.turn_chapter(1);

    assert_eq!(calls.get(), 0);
    assert_eq!(app.mode, Mode::Reader);
    let reader = app.reader.as_ref().expect("reader should remain open");
    assert_eq!(reader.chapter.id, "ch-2");
    assert_eq!(reader.page_index, 0);
}

#[test]
fn turn_chapter_within_snapshot_reopens_the_neighbour() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(at_home_envelope(vec![]), Rc::clone(&calls));
    app.chapters.chapters = reader_fixture(Some(1)).chapter_list.clone();
    app.reader = Some(reader_fixture(Some(1)));
    app.mode = Mode::Reader;

    app.turn_chapter(1);

    assert_eq!(calls.get(), 1);
    let reader = app.reader.as_ref().expect("reader should be open");
    assert_eq!(reader.chapter.id, "ch-2");
    assert_eq!(reader.chapter_pos, Some(2));
    assert!(reader.page_urls[0].contains("/data/"));
}

#[test]
fn close_reader_returns_to_details_and_clears_status() {
    let calls = Rc::new(Cell::new(0));
    let mut app = counting_app(json!({}), Rc::clone(&calls));
    app.reader = Some(reader_fixture(Some(0)));
    app.mode = Mode::Reader;

    app.close_reader();

    assert_eq!(app.mode, Mode::Details);
    assert!(app.reader.is_none());
    assert_eq!(app.status, "");
}

#[test]
fn list_envelope_defaults_for_missing_fields() {
    let envelope = json!({"data": [{"id": "a"}]});
    assert_eq!(list_data(&envelope).len(), 1);
    assert_eq!(list_total(&envelope), 0);
    assert_eq!(list_limit(&envelope, 24), 24);
    assert_eq!(list_limit(&json!({"limit": 10}), 24), 10);
    assert_eq!(list_limit(&json!({"limit": 0}), 24), 24);
}
