use std::io;

use anyhow::Result;
use cadenza_core::inspect::FeatureReading;
use cadenza_core::TrackSummary;
use cadenza_search::Snapshot;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use crate::commands::feedback::FEEDBACK_ACK;
use crate::config::Config;

pub mod artist_list;
pub mod recommendations;
pub mod track_list;

/// Assumed list height until the first render measures the real one.
const VIEWPORT_HEIGHT: usize = 20;

/// Which view the TUI is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    ArtistList,
    /// Tracks by the selected artist.
    TrackList,
    /// Recommendations for the selected track.
    Recommendations,
}

/// A track by the selected artist, with its catalog position.
#[derive(Debug, Clone)]
pub struct BrowseTrack {
    pub position: usize,
    pub title: String,
}

/// A one-line message shown in the footer of the recommendations view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

/// Application state for the browse TUI.
#[derive(Debug)]
pub struct App {
    pub view: View,
    pub snapshot: Snapshot,
    pub artists: Vec<String>,
    pub selected_artist: usize,
    pub artist_list_offset: usize, // First visible artist in the list
    pub tracks: Vec<BrowseTrack>,
    pub selected_track: usize,
    pub recommendations: Vec<TrackSummary>,
    pub features: Vec<FeatureReading>,
    pub status: Option<StatusLine>,
    pub should_quit: bool,
    /// Artist rows that fit on screen, as of the last render.
    pub artist_viewport: usize,
    neighbors: usize,
    inspect_features: Vec<String>,
    precision: u32,
}

impl App {
    pub fn new(snapshot: Snapshot, config: &Config) -> Self {
        let artists = snapshot
            .catalog()
            .artists()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            view: View::ArtistList,
            snapshot,
            artists,
            selected_artist: 0,
            artist_list_offset: 0,
            tracks: Vec::new(),
            selected_track: 0,
            recommendations: Vec::new(),
            features: Vec::new(),
            status: None,
            should_quit: false,
            artist_viewport: VIEWPORT_HEIGHT,
            neighbors: config.neighbors,
            inspect_features: config.inspect_features.clone(),
            precision: config.display_precision,
        }
    }

    pub fn current_artist(&self) -> Option<&str> {
        self.artists.get(self.selected_artist).map(String::as_str)
    }

    pub fn current_track(&self) -> Option<&BrowseTrack> {
        self.tracks.get(self.selected_track)
    }

    /// Record how many artist rows fit on screen and keep the selection
    /// inside that window.
    pub fn set_artist_viewport(&mut self, height: usize) {
        self.artist_viewport = height.max(1);
        if self.selected_artist < self.artist_list_offset {
            self.artist_list_offset = self.selected_artist;
        } else if self.selected_artist >= self.artist_list_offset + self.artist_viewport {
            self.artist_list_offset = self.selected_artist + 1 - self.artist_viewport;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match self.view {
            View::ArtistList => self.handle_artist_list_key(key),
            View::TrackList => self.handle_track_list_key(key),
            View::Recommendations => self.handle_recommendations_key(key),
        }
    }

    fn handle_artist_list_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_artist + 1 < self.artists.len() {
                    self.selected_artist += 1;
                    // Scroll down if selection goes below visible area
                    if self.selected_artist >= self.artist_list_offset + self.artist_viewport {
                        self.artist_list_offset = self.selected_artist + 1 - self.artist_viewport;
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected_artist > 0 {
                    self.selected_artist -= 1;
                    // Scroll up if selection goes above visible area
                    if self.selected_artist < self.artist_list_offset {
                        self.artist_list_offset = self.selected_artist;
                    }
                }
            }
            KeyCode::Enter => {
                self.load_tracks();
                if !self.tracks.is_empty() {
                    self.selected_track = 0;
                    self.view = View::TrackList;
                }
            }
            _ => {}
        }
    }

    fn handle_track_list_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.view = View::ArtistList;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_track + 1 < self.tracks.len() {
                    self.selected_track += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected_track > 0 {
                    self.selected_track -= 1;
                }
            }
            KeyCode::Enter => {
                self.load_recommendations();
                self.view = View::Recommendations;
            }
            _ => {}
        }
    }

    fn handle_recommendations_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.status = None;
                self.view = View::TrackList;
            }
            KeyCode::Char('f') => {
                log::debug!("Feedback received for recommendations");
                self.status = Some(StatusLine::Info(FEEDBACK_ACK.to_string()));
            }
            _ => {}
        }
    }

    fn load_tracks(&mut self) {
        let Some(artist) = self.current_artist() else {
            self.tracks.clear();
            return;
        };
        let catalog = self.snapshot.catalog();
        let tracks = catalog
            .titles_for(artist)
            .into_iter()
            .filter_map(|title| {
                catalog.find(artist, title).map(|(position, _)| BrowseTrack {
                    position,
                    title: title.to_string(),
                })
            })
            .collect();
        self.tracks = tracks;
    }

    fn load_recommendations(&mut self) {
        self.status = None;
        self.recommendations.clear();
        self.features.clear();

        let Some(track) = self.current_track().cloned() else {
            return;
        };
        let Some(artist) = self.current_artist().map(str::to_string) else {
            return;
        };

        match self
            .snapshot
            .recommend_by_index(track.position, self.neighbors)
        {
            Ok(summaries) => self.recommendations = summaries,
            Err(e) => {
                self.status = Some(StatusLine::Error(format!("Could not recommend: {e}")));
            }
        }

        match self
            .snapshot
            .inspect(&artist, &track.title, &self.inspect_features, self.precision)
        {
            Ok(readings) => self.features = readings,
            Err(e) => {
                log::warn!("Could not inspect '{}': {}", track.title, e);
            }
        }
    }
}

/// Run the browse TUI.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(snapshot: Snapshot, config: &Config) -> Result<()> {
    let app = App::new(snapshot, config);

    if app.artists.is_empty() {
        println!("The catalog has no artists to browse.");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        let view = app.view;
        terminal.draw(|frame| match view {
            View::ArtistList => artist_list::render(frame, &mut app),
            View::TrackList => track_list::render(frame, &app),
            View::Recommendations => recommendations::render(frame, &app),
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
