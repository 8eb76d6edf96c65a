mod catalog;
mod controller;
mod state;
mod tui;

#[cfg(test)]
mod tests;

use anyhow::{Result, bail};

use crate::cli::{Cli, Command};

use self::catalog::truncate;
use self::controller::App;
use self::state::{ChapterOrder, ChapterRef};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Search { query, lang, page }) => run_search(&query, &lang, page),
        Some(Command::Chapters {
            manga_id,
            lang,
            order,
            page,
        }) => run_chapters(&manga_id, &lang, &order, page),
        Some(Command::Pages { chapter_id }) => run_pages(&chapter_id),
        Some(Command::Tui) | None => tui::run_tui(),
    }
}

fn run_search(query: &str, lang: &str, page: u32) -> Result<()> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        bail!("search query must not be empty");
    }

    let mut app = App::new();
    app.search.language = lang.to_string();
    app.search.query = trimmed.to_string();
    app.search.page = page.max(1);
    app.run_search();

    if let Some(placeholder) = &app.results_placeholder {
        println!("{placeholder}");
    } else {
        println!("{:<40} {:<30} {:<12} {:<36}", "TITLE", "AUTHORS", "STATUS", "ID");
        for card in &app.results {
            println!(
                "{:<40} {:<30} {:<12} {:<36}",
                truncate(&card.title, 40),
                truncate(&card.authors, 30),
                truncate(&card.status, 12),
                card.id
            );
        }
    }
    println!("\nPage {} of {}", app.search.page, app.search.last_page);
    Ok(())
}

fn run_chapters(manga_id: &str, lang: &str, order: &str, page: u32) -> Result<()> {
    let Some(order) = ChapterOrder::parse(order) else {
        bail!("order must be `asc` or `desc`");
    };

    let mut app = App::new();
    app.search.language = lang.to_string();
    app.chapters.order = order;
    app.open_title_by_id(manga_id);
    if page > 1 {
        app.chapters.page = page;
        app.load_chapters();
    }

    if let Some(placeholder) = &app.chapters_placeholder {
        println!("{placeholder}");
    } else {
        println!("{:<8} {:<34} {:<24} {:<12} {:<36}", "CH", "TITLE", "GROUP", "DATE", "ID");
        for chapter in &app.chapters.chapters {
            println!(
                "{:<8} {:<34} {:<24} {:<12} {:<36}",
                chapter.number,
                truncate(chapter.title.as_deref().unwrap_or(""), 34),
                truncate(&chapter.group, 24),
                chapter.published,
                chapter.id
            );
        }
    }
    println!("\nPage {} of {}", app.chapters.page, app.chapters.last_page);
    Ok(())
}

fn run_pages(chapter_id: &str) -> Result<()> {
    let mut app = App::new();
    app.open_chapter(ChapterRef {
        id: chapter_id.to_string(),
        number: catalog::TEXT_PLACEHOLDER.to_string(),
        title: None,
        group: catalog::TEXT_PLACEHOLDER.to_string(),
        published: String::new(),
    });

    match &app.reader {
        Some(reader) => {
            for url in &reader.page_urls {
                println!("{url}");
            }
        }
        None => println!("{}", app.status),
    }
    Ok(())
}
