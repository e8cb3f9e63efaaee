//! UI rendering helpers for the terminal user interface.
//!
//! Everything is drawn straight from `App` each frame, so the song list always
//! has exactly one row per playlist entry.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, PlaybackState};
use crate::config::{ControlsSettings, UiSettings};

pub const DOWNLOAD_MARKER: &str = "[download needed]";

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "cursor");
    map.insert("enter", "play selected");
    map.insert("space", "play/pause");
    map.insert("up/down", "prev/next song");
    // left/right is filled dynamically from config.
    map.insert("m", "play mode");
    map.insert("/", "search");
    map.insert("tab", "next playlist");
    map.insert("d", "download selected");
    map.insert("R", "reload");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating skip seconds.
fn controls_text(skip_seconds: u64) -> String {
    let order = [
        "j/k", "enter", "space", "up/down", "left/right", "m", "/", "tab", "d", "R", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "left/right" {
                Some(format!("[left/right] seek -/+{skip_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format milliseconds as `MM:SS`.
pub fn format_mmss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Areas of one frame. Shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct UiLayout {
    pub header: Rect,
    pub status: Rect,
    pub progress: Rect,
    pub list: Rect,
    pub search: Option<Rect>,
    pub footer: Rect,
}

pub fn layout(area: Rect, search_active: bool) -> UiLayout {
    let search_height = if search_active { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(search_height),
            Constraint::Length(4),
        ])
        .split(area);

    UiLayout {
        header: chunks[0],
        status: chunks[1],
        progress: chunks[2],
        list: chunks[3],
        search: search_active.then_some(chunks[4]),
        footer: chunks[5],
    }
}

/// Position inside the progress bar's inner area as a ratio in `[0, 1]`,
/// or `None` when the click missed the bar.
pub fn progress_click_ratio(progress: Rect, column: u16, row: u16) -> Option<f64> {
    let inner = Block::default().borders(Borders::ALL).inner(progress);
    if inner.width == 0 || !inner.contains(Position::new(column, row)) {
        return None;
    }
    let offset = column - inner.x;
    if inner.width == 1 {
        return Some(0.0);
    }
    Some(offset as f64 / (inner.width - 1) as f64)
}

fn song_line(app: &App, index: usize) -> Line<'static> {
    let song = &app.playlist.songs[index];
    let mut spans = vec![Span::raw(format!("{:>3}. {}", index + 1, song.name))];
    if song.has_artist() {
        spans.push(Span::raw(format!(" - {}", song.artist)).dim());
    }
    if !song.is_resolved() {
        spans.push(Span::raw(format!("  {DOWNLOAD_MARKER}")).fg(Color::Yellow));
    } else if song.duration_ms > 0 {
        spans.push(Span::raw(format!("  {}", format_mmss(song.duration_ms))).dim());
    }
    if app.now_playing == Some(index) {
        spans.insert(0, Span::raw("♪ ").fg(Color::Green));
    } else {
        spans.insert(0, Span::raw("  "));
    }
    Line::from(spans)
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings, controls: &ControlsSettings) {
    let areas = layout(frame.area(), app.search.active);

    // Header: playlist tabs
    let tabs: Vec<Span> = app
        .playlists
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let label = format!(" {} ", p.label);
            if app.current_playlist == Some(i) {
                Span::raw(label).reversed()
            } else {
                Span::raw(label)
            }
        })
        .collect();
    let header = Paragraph::new(Line::from(tabs))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ui_settings.header_text.as_str())
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        let state = match app.playback {
            PlaybackState::Idle => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        parts.push(format!("{state} • {}", app.play_mode.label()));

        if !app.downloads.is_empty() {
            parts.push(format!("Queue: {}", app.downloads.len()));
        }
        if !app.download_status.is_empty() {
            parts.push(app.download_status.clone());
        }

        let mut text = parts.join(" • ");
        if !app.status.is_empty() {
            text.push('\n');
            text.push_str(&app.status);
        }
        text
    };
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, areas.status);

    // Progress bar with time label
    let title = match app.now_playing_song() {
        Some(song) if song.has_artist() => format!(" {} - {} ", song.name, song.artist),
        Some(song) => format!(" {} ", song.name),
        None => " nothing playing ".to_string(),
    };
    let range = app.timeline.range_ms();
    let label = if range > 0 {
        format!(
            "{} / {}",
            format_mmss(app.display_position_ms),
            format_mmss(range)
        )
    } else {
        format_mmss(app.display_position_ms)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(app.progress_ratio())
        .label(label);
    frame.render_widget(gauge, areas.progress);

    // Song list
    {
        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window.
        let total = app.playlist.len();
        let list_height = areas.list.height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = (start..end)
            .map(|i| ListItem::new(song_line(app, i)))
            .collect();

        let title = if app.playlist.label.is_empty() {
            " songs ".to_string()
        } else {
            format!(" {} ({}) ", app.playlist.label, total)
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, areas.list, &mut state);
    }

    if let Some(area) = areas.search {
        let input = Paragraph::new(format!("{}▏", app.search.text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" search: song or song--artist (enter / esc) "),
        );
        frame.render_widget(input, area);
    }

    let footer = Paragraph::new(controls_text(controls.skip_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, areas.footer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmss_formats_minutes_and_seconds() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(61_999), "01:01");
        assert_eq!(format_mmss(600_000), "10:00");
    }

    #[test]
    fn controls_text_mentions_skip_seconds() {
        let text = controls_text(7);
        assert!(text.contains("seek -/+7s"));
        assert!(text.starts_with("[j/k] cursor"));
    }

    #[test]
    fn search_row_only_when_active() {
        let area = Rect::new(0, 0, 80, 30);
        assert!(layout(area, false).search.is_none());
        let l = layout(area, true);
        assert_eq!(l.search.map(|r| r.height), Some(3));
        assert_eq!(l.progress.height, 3);
    }

    #[test]
    fn progress_click_maps_inner_width_to_ratio() {
        let bar = Rect::new(0, 7, 12, 3);
        // inner area is x 1..=10, y 8
        assert_eq!(progress_click_ratio(bar, 1, 8), Some(0.0));
        assert_eq!(progress_click_ratio(bar, 10, 8), Some(1.0));
        let mid = progress_click_ratio(bar, 5, 8).unwrap();
        assert!((mid - 4.0 / 9.0).abs() < 1e-9);
        // border and outside
        assert_eq!(progress_click_ratio(bar, 0, 8), None);
        assert_eq!(progress_click_ratio(bar, 5, 7), None);
        assert_eq!(progress_click_ratio(bar, 5, 20), None);
    }
}
