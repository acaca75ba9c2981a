use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Render the tracks of the selected artist.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Artist header
            Constraint::Min(5),    // Track table
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    let artist = app.current_artist().unwrap_or("Unknown Artist");
    let header = Paragraph::new(format!("{}    {} tracks", artist, app.tracks.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    render_table(frame, app, chunks[1]);

    let help = Paragraph::new("  \u{2191}/k Up  \u{2193}/j Down  Enter Recommend  b Back  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let viewport_height = (area.height.saturating_sub(3)) as usize;
    // Keep the selection on screen
    let offset = app
        .selected_track
        .saturating_sub(viewport_height.saturating_sub(1));

    let catalog = app.snapshot.catalog();
    let rows: Vec<Row> = app
        .tracks
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport_height)
        .map(|(i, track)| {
            let style = if i == app.selected_track {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            let genre = catalog
                .get(track.position)
                .and_then(|t| t.genre.clone())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(track.title.clone()),
                Cell::from(genre),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Genre"),
    ])
    .height(1);

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(60),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Tracks"));

    frame.render_widget(table, area);
}
