use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState, Wrap,
};

use super::super::catalog::truncate;
use super::super::controller::{App, Mode};
use super::super::state;
use super::{SearchFocus, UiState};

pub(super) fn draw_tui(frame: &mut Frame, app: &App, ui: &UiState) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    match app.mode {
        Mode::Search => draw_search(frame, app, ui, chunks[1]),
        Mode::Details | Mode::Reader => draw_details(frame, app, chunks[1]),
    }

    let controls = Paragraph::new(controls_line(app, ui))
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(app.status.clone())
        .style(status_style(&app.status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);

    if app.mode == Mode::Reader {
        draw_reader_overlay(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mode_text = match app.mode {
        Mode::Search => "SEARCH",
        Mode::Details => "DETAILS",
        Mode::Reader => "READER",
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "MANGATERM",
            Style::default()
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("lang {}", app.search.language),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(mode_text, Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Catalog"));
    frame.render_widget(header, area);
}

fn draw_search(frame: &mut Frame, app: &App, ui: &UiState, area: Rect) {
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(area);
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(body_chunks[0]);

    let input_style = if ui.focus == SearchFocus::Input {
        Style::default()
            .fg(Color::Rgb(230, 235, 242))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(185, 195, 210))
    };
    let input = Paragraph::new(format!("{}▏", ui.input))
        .style(input_style)
        .block(panel_block("Search title"));
    frame.render_widget(input, left_chunks[0]);

    match &app.results_placeholder {
        Some(placeholder) => {
            let hint = Paragraph::new(placeholder.clone())
                .style(Style::default().fg(Color::Rgb(185, 195, 210)))
                .wrap(Wrap { trim: true })
                .block(panel_block("Results"));
            frame.render_widget(hint, left_chunks[1]);
        }
        None => {
            let rows: Vec<Row> = app
                .results
                .iter()
                .map(|card| {
                    Row::new(vec![
                        Cell::from(truncate(&card.title, 48)),
                        Cell::from(truncate(&card.authors, 28)),
                        Cell::from(card.status.clone()),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(52),
                    Constraint::Percentage(30),
                    Constraint::Percentage(18),
                ],
            )
            .header(
                Row::new(vec!["Title", "Authors", "Status"]).style(
                    Style::default()
                        .fg(Color::Rgb(110, 170, 255))
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .block(panel_block("Results"))
            .row_highlight_style(
                Style::default()
                    .bg(Color::Rgb(110, 170, 255))
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
            let mut table_state = TableState::default();
            table_state.select((!app.results.is_empty()).then_some(app.selected_result));
            frame.render_stateful_widget(table, left_chunks[1], &mut table_state);
        }
    }

    let mut side_text = format!(
        "Query\n{}\n\nLanguage\n{}",
        truncate(&app.search.query, 30),
        app.search.language
    );
    if let Some(card) = app.results.get(app.selected_result) {
        side_text.push_str(&format!(
            "\n\nSelected\n{}\n{} • {}",
            truncate(&card.title, 30),
            truncate(&card.authors, 24),
            card.status
        ));
        if let Some(cover) = &card.cover {
            side_text.push_str(&format!("\n\nCover\n{}", truncate(cover, 34)));
        }
    }
    let side = Paragraph::new(side_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .block(panel_block("Selection"))
        .wrap(Wrap { trim: true });
    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(body_chunks[1]);
    frame.render_widget(side, side_chunks[0]);
    frame.render_widget(
        pager_widget("Results page", app.search.page, app.search.last_page),
        side_chunks[1],
    );
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(area);

    match &app.chapters_placeholder {
        Some(placeholder) => {
            let hint = Paragraph::new(placeholder.clone())
                .style(Style::default().fg(Color::Rgb(185, 195, 210)))
                .wrap(Wrap { trim: true })
                .block(panel_block("Chapters"));
            frame.render_widget(hint, body_chunks[0]);
        }
        None => {
            let rows: Vec<Row> = app
                .chapters
                .chapters
                .iter()
                .map(|chapter| {
                    Row::new(vec![
                        Cell::from(format!("Ch. {}", chapter.number)),
                        Cell::from(truncate(chapter.title.as_deref().unwrap_or(""), 34)),
                        Cell::from(truncate(&chapter.group, 22)),
                        Cell::from(chapter.published.clone()),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(10),
                    Constraint::Percentage(44),
                    Constraint::Percentage(30),
                    Constraint::Length(12),
                ],
            )
            .header(
                Row::new(vec!["No.", "Title", "Group", "Date"]).style(
                    Style::default()
                        .fg(Color::Rgb(110, 170, 255))
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .block(panel_block("Chapters"))
            .row_highlight_style(
                Style::default()
                    .bg(Color::Rgb(110, 170, 255))
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
            let mut table_state = TableState::default();
            table_state
                .select((!app.chapters.chapters.is_empty()).then_some(app.selected_chapter));
            frame.render_stateful_widget(table, body_chunks[0], &mut table_state);
        }
    }

    let details_text = match &app.current_title {
        Some(card) => {
            let mut text = format!(
                "Title\n{}\n\n{} • {}",
                truncate(&card.title, 34),
                truncate(&card.authors, 26),
                card.status
            );
            if !card.alt_titles.is_empty() {
                text.push_str(&format!("\n\nAlso known as\n{}", truncate(&card.alt_titles, 64)));
            }
            if !card.tag_line.is_empty() {
                text.push_str(&format!("\n\nTags\n{}", truncate(&card.tag_line, 64)));
            }
            text.push_str(&format!("\n\nOrder\n{}", app.chapters.order.label()));
            text
        }
        None => "No title selected.".to_string(),
    };
    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(body_chunks[1]);
    let details = Paragraph::new(details_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .block(panel_block("Details"))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, side_chunks[0]);
    frame.render_widget(
        pager_widget("Chapter page", app.chapters.page, app.chapters.last_page),
        side_chunks[1],
    );
}

fn draw_reader_overlay(frame: &mut Frame, app: &App) {
    let Some(reader) = &app.reader else {
        return;
    };

    let page_count = reader.page_urls.len();
    let page_line = if page_count == 0 {
        "No pages in this chapter.".to_string()
    } else {
        format!("Page {} / {}", reader.page_index + 1, page_count)
    };
    let popup_text = format!(
        "{}\nCh. {} • {}\n\n{}\n\n{}\n\n↑/↓ page  ←/→ chapter  Esc close",
        truncate(&reader.title_name, 56),
        reader.chapter.number,
        truncate(&reader.chapter.group, 36),
        page_line,
        truncate(reader.current_page_url().unwrap_or(""), 64),
    );

    let popup_area = popup_rect_for_text(frame.area(), &popup_text);
    render_popup_shadow(frame, popup_area);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(popup_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(modal_block("Reader"));
    frame.render_widget(popup, popup_area);
}

fn pager_widget(label: &'static str, page: u32, last_page: u32) -> Paragraph<'static> {
    let prev_style = if state::can_page_prev(page) {
        pill_active()
    } else {
        pill_inactive()
    };
    let next_style = if state::can_page_next(page, last_page) {
        pill_active()
    } else {
        pill_inactive()
    };
    Paragraph::new(Line::from(vec![
        Span::styled(" [ prev ", prev_style),
        Span::styled(
            format!("  {page} / {last_page}  "),
            Style::default().fg(Color::Rgb(230, 235, 242)),
        ),
        Span::styled(" ] next ", next_style),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block(label))
}

fn controls_line(app: &App, ui: &UiState) -> Line<'static> {
    let text = match app.mode {
        Mode::Search => match ui.focus {
            SearchFocus::Input => "type to edit  Enter search  Tab results  Esc quit",
            SearchFocus::Results => {
                "↑/↓ select  Enter open  [/] page  l language  Tab input  q quit"
            }
        },
        Mode::Details => "↑/↓ select  Enter read  [/] page  o order  l language  Esc back  q quit",
        Mode::Reader => "↑/↓ page  ←/→ chapter  Esc close",
    };
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Rgb(185, 195, 210)),
    ))
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn pill_active() -> Style {
    Style::default()
        .bg(Color::Rgb(110, 170, 255))
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn pill_inactive() -> Style {
    Style::default()
        .bg(Color::Rgb(72, 82, 96))
        .fg(Color::Rgb(150, 158, 170))
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24)));
    frame.render_widget(shadow_block, shadow);
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let line_count = text.lines().count() as u16;

    let available_width = area.width.saturating_sub(2).max(1);
    let min_width = 48.min(available_width);
    let max_width = 76.min(available_width);
    let desired_width = max_line_width.saturating_add(12);
    let width = desired_width.clamp(min_width, max_width);

    let available_height = area.height.saturating_sub(2).max(1);
    let min_height = 10.min(available_height);
    let max_height = 18.min(available_height);
    let desired_height = line_count.saturating_add(6);
    let height = desired_height.clamp(min_height, max_height);

    centered_fixed_rect(width, height, area)
}
