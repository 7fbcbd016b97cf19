use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use board_lib::playback::Phase;
use board_lib::BoardController;

use crate::controls::BoardState;
use crate::texts::Texts;

pub fn draw_board(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    board: &BoardController,
    state: &BoardState,
    texts: &Texts,
    log_lines: &[String],
) {
    let strings = texts.get(board.language());
    let _ = terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(8),
            ])
            .split(f.size());

        let title = Paragraph::new(format!(
            "{}  [{}]  {}: {}",
            strings.title,
            board.language().to_uppercase(),
            strings.volume,
            board.volume()
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        f.render_widget(title, chunks[0]);

        draw_grid(f, chunks[1], board, state, texts);

        let playback = board.playback();
        let phase = match playback.phase {
            Phase::Idle => "■",
            Phase::Loaded => "·",
            Phase::Playing => "▶",
            Phase::FadingOut => "↘",
        };
        let (status_text, status_color) = match &state.error {
            Some(err) => (err.clone(), Color::Red),
            None => (texts.status(board.language(), &state.status), Color::Green),
        };
        let status_widget = Paragraph::new(format!("{} {}", phase, status_text))
            .style(Style::default().fg(status_color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(strings.status_title),
            );
        f.render_widget(status_widget, chunks[2]);

        let controls = Paragraph::new(strings.controls)
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(controls, chunks[3]);

        let log_height = chunks[4].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_text = if log_lines.is_empty() {
            strings.no_logs.to_string()
        } else {
            log_lines[start..].join("\n")
        };
        let log_widget = Paragraph::new(log_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(strings.logs_title));
        f.render_widget(log_widget, chunks[4]);
    });
}

fn draw_grid(f: &mut Frame, area: Rect, board: &BoardController, state: &BoardState, texts: &Texts) {
    let rows = board.grid().rows();
    let cols = board.grid().cols();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for view in board.views() {
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(row_areas[view.row]);

        let fill = if view.assigned {
            texts.assigned_color
        } else {
            texts.empty_color
        };
        let selected = view.row == state.row && view.col == state.col;
        let border = if selected {
            Style::default()
                .fg(texts.selected_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fill)
        };

        let cell = Paragraph::new(view.label)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White).bg(fill))
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(cell, cell_areas[view.col]);
    }
}
