use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "mangaterm",
    version,
    about = "Search the MangaDex catalog, browse chapters, and read page URLs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Search {
        query: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Chapters {
        manga_id: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value = "desc")]
        order: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Pages {
        chapter_id: String,
    },
    Tui,
}
