use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, EngineDurationProber};
use crate::download::{DownloadQueue, FetchPipeline, FileNameRenamer, ThreadFetcher, YtDlp};
use crate::events::AppEvent;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();
    match logging::init(&settings.logging) {
        Ok(path) => log::info!("musiclist starting, logging to {}", path.display()),
        Err(e) => eprintln!("musiclist: logging disabled: {e}"),
    }
    if let Some(msg) = warning {
        log::warn!("{msg}");
    }

    let playlist_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.paths.playlist_dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let download_dir = settings.paths.download_dir_for(&playlist_dir);
    if let Err(e) = fs::create_dir_all(&download_dir) {
        log::warn!("cannot create {}: {e}", download_dir.display());
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let audio_player = AudioPlayer::new(event_tx.clone());

    let pipeline = FetchPipeline::new(
        Box::new(YtDlp::from_settings(&settings.download)),
        Box::new(YtDlp::from_settings(&settings.download)),
        Box::new(FileNameRenamer),
        download_dir,
        settings.download.original_suffix.clone(),
    );
    let downloads = DownloadQueue::new(
        Box::new(ThreadFetcher::new(pipeline, event_tx.clone())),
        Duration::from_millis(settings.download.success_delay_ms),
        Duration::from_millis(settings.download.failure_delay_ms),
    );
    let prober = EngineDurationProber::new(
        event_tx,
        Duration::from_millis(settings.playback.probe_interval_ms),
        settings.playback.probe_attempts,
    );

    let mut app = App::new(&settings, playlist_dir, downloads, Box::new(prober));
    app.load_initial(&audio_player);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &audio_player, &event_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    log::info!("musiclist exiting");
    run_result
}
