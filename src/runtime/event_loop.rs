use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;
use crate::events::AppEvent;
use crate::ui;

/// Main terminal event loop: applies background events, runs due queue
/// steps, draws, and handles input. Returns `Ok(())` when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    events: &mpsc::Receiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // All state changes coming from other threads are applied here.
        while let Ok(ev) = events.try_recv() {
            app.handle_event(ev, audio_player, Instant::now());
        }
        app.tick(Instant::now());

        let area = terminal
            .draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?
            .area;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, audio_player) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, area, app, audio_player),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Returns true when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> bool {
    let now = Instant::now();

    if app.search.active {
        match key.code {
            KeyCode::Esc => app.search.cancel(),
            KeyCode::Enter => app.submit_search(audio_player, now),
            KeyCode::Backspace => app.search.pop(),
            KeyCode::Char(c) if !c.is_control() => app.search.push(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.playback.quit_fade_out_ms));
            return true;
        }
        KeyCode::Char(' ') => app.toggle_playback(audio_player),
        KeyCode::Left => app.skip(-1, audio_player, now),
        KeyCode::Right => app.skip(1, audio_player, now),
        KeyCode::Up => app.play_previous(audio_player),
        KeyCode::Down => app.play_next(audio_player),
        KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('k') => app.select_prev(),
        KeyCode::Enter => app.play_song(app.selected, audio_player),
        KeyCode::Char('m') => app.cycle_play_mode(),
        KeyCode::Char('/') => app.search.open(),
        KeyCode::Tab => app.next_playlist(audio_player),
        KeyCode::BackTab => app.prev_playlist(audio_player),
        KeyCode::Char('R') => app.reload(audio_player),
        KeyCode::Char('d') => app.download_selected(),
        _ => {}
    }
    false
}

/// Left click on the progress bar seeks there.
fn handle_mouse_event(mouse: MouseEvent, area: Rect, app: &mut App, audio_player: &AudioPlayer) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let layout = ui::layout(area, app.search.active);
    let Some(ratio) = ui::progress_click_ratio(layout.progress, mouse.column, mouse.row) else {
        return;
    };
    let range = app.timeline.range_ms();
    if range == 0 {
        return;
    }
    let target = (ratio * range as f64).round() as u64;
    app.seek_display(target, audio_player, Instant::now());
}
