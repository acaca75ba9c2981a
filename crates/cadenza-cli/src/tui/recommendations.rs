use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::{App, StatusLine};

/// Render recommendations and features for the selected track.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let Some(track) = app.current_track() else {
        let msg = Paragraph::new("Track not found").style(Style::default().fg(Color::Red));
        frame.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Track header
            Constraint::Length(feature_height(app)),
            Constraint::Min(5),    // Recommendations
            Constraint::Length(3), // Status / help bar
        ])
        .split(area);

    let artist = app.current_artist().unwrap_or("Unknown Artist");
    let header = Paragraph::new(format!("{} by {}", track.title, artist))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    render_features(frame, app, chunks[1]);
    render_recommendations(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn feature_height(app: &App) -> u16 {
    u16::try_from(app.features.len().max(1) + 2).unwrap_or(u16::MAX)
}

fn render_features(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line<'_>> = if app.features.is_empty() {
        vec![Line::from(Span::styled(
            "  No features to show",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        app.features
            .iter()
            .map(|reading| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<20}", reading.label()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!("{}", reading.value)),
                ])
            })
            .collect()
    };

    let features =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Features"));
    frame.render_widget(features, area);
}

fn render_recommendations(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Artist"),
        Cell::from("Distance"),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(summary.title.clone()),
                Cell::from(summary.artist.clone()),
                Cell::from(format!("{:.4}", summary.distance)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recommended"),
    );

    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = match &app.status {
        Some(StatusLine::Info(message)) => {
            Paragraph::new(format!("  {message}")).style(Style::default().fg(Color::Green))
        }
        Some(StatusLine::Error(message)) => Paragraph::new(format!("  {message}")).style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        None => Paragraph::new("  f Good recommendations  b Back  q Quit")
            .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer.block(Block::default().borders(Borders::ALL)), area);
}
