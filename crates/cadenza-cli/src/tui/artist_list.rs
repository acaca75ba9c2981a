use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Render the artist list view.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Artist table
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_help(frame, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(format!(
        "Cadenza    {} artists, {} tracks",
        app.artists.len(),
        app.snapshot.catalog().len()
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Artist").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .height(1);

    // area.height - 2 for borders - 1 for header
    let viewport_height = (area.height.saturating_sub(3)) as usize;
    app.set_artist_viewport(viewport_height);
    let visible_start = app.artist_list_offset;
    let visible_end = (visible_start + viewport_height).min(app.artists.len());

    let rows: Vec<Row> = app
        .artists
        .iter()
        .enumerate()
        .skip(visible_start)
        .take(viewport_height)
        .map(|(i, artist)| {
            let style = if i == app.selected_artist {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(artist.clone()),
            ])
            .style(style)
        })
        .collect();

    let title = if app.artists.len() > viewport_height {
        format!(
            "Artists [{}-{} of {}]",
            visible_start + 1,
            visible_end,
            app.artists.len()
        )
    } else {
        "Artists".to_string()
    };

    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(20)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2191}/k Up  \u{2193}/j Down  Enter Tracks  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
