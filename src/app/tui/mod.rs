mod render;
mod session;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::controller::{App, Mode};

use self::render::draw_tui;
use self::session::TuiSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchFocus {
    Input,
    Results,
}

pub(crate) struct UiState {
    pub(crate) input: String,
    pub(crate) focus: SearchFocus,
}

pub(crate) fn run_tui() -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut app = App::new();
    let mut ui = UiState {
        input: String::new(),
        focus: SearchFocus::Input,
    };

    loop {
        terminal.draw(|frame| draw_tui(frame, &app, &ui))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.mode {
            Mode::Reader => match key.code {
                KeyCode::Esc => app.close_reader(),
                KeyCode::Up | KeyCode::Char('k') => app.turn_page(-1),
                KeyCode::Down | KeyCode::Char('j') => app.turn_page(1),
                KeyCode::Left => app.turn_chapter(-1),
                KeyCode::Right => app.turn_chapter(1),
                _ => {}
            },
            Mode::Details => match key.code {
                KeyCode::Esc => app.back_to_search(),
                KeyCode::Char('q') => break,
                KeyCode::Up => app.select_chapter(-1),
                KeyCode::Down => app.select_chapter(1),
                KeyCode::Enter => app.open_selected_chapter(),
                KeyCode::Char('[') => app.chapter_page(-1),
                KeyCode::Char(']') => app.chapter_page(1),
                KeyCode::Char('o') => app.toggle_order(),
                KeyCode::Char('l') => app.cycle_language(),
                _ => {}
            },
            Mode::Search => match (ui.focus, key.code) {
                (_, KeyCode::Esc) => break,
                (_, KeyCode::Tab) => {
                    ui.focus = match ui.focus {
                        SearchFocus::Input => SearchFocus::Results,
                        SearchFocus::Results => SearchFocus::Input,
                    };
                }
                (SearchFocus::Input, KeyCode::Enter) => {
                    app.submit_search(&ui.input);
                    if !app.results.is_empty() {
                        ui.focus = SearchFocus::Results;
                    }
                }
                (SearchFocus::Input, KeyCode::Char(c)) => ui.input.push(c),
                (SearchFocus::Input, KeyCode::Backspace) => {
                    ui.input.pop();
                }
                (SearchFocus::Results, KeyCode::Char('q')) => break,
                (SearchFocus::Results, KeyCode::Up) => app.select_result(-1),
                (SearchFocus::Results, KeyCode::Down) => app.select_result(1),
                (SearchFocus::Results, KeyCode::Enter) => app.open_selected_title(),
                (SearchFocus::Results, KeyCode::Char('[')) => app.search_page(-1),
                (SearchFocus::Results, KeyCode::Char(']')) => app.search_page(1),
                (SearchFocus::Results, KeyCode::Char('l')) => app.cycle_language(),
                _ => {}
            },
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}
