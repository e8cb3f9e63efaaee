use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::Error;
use crate::events::{AppEvent, EngineEvent, EngineState, EventSender};

use super::sink::create_sink_at;
use super::types::AudioCmd;

/// Interval of position ticks and end-of-track checks.
const TICK: Duration = Duration::from_millis(200);

fn emit(events: &EventSender, generation: u64, event: EngineEvent) {
    let _ = events.send(AppEvent::Engine { generation, event });
}

/// Everything the audio thread knows about the loaded track.
struct Loaded {
    path: PathBuf,
    generation: u64,
    sink: Sink,
    paused: bool,
    /// Set once the sink ran dry; the next play/seek rebuilds it.
    ended: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Loaded {
    fn position(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn pause(&mut self) {
        self.sink.pause();
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn resume(&mut self) {
        self.sink.play();
        self.started_at = Some(Instant::now());
        self.paused = false;
    }
}

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, events: EventSender) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let err = Error::AudioOutput(e.to_string());
                log::error!("{err}");
                run_without_output(rx, &events, &err);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut loaded: Option<Loaded> = None;

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { path, generation } => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        loaded = load(&stream, &path, generation, &events);
                    }
                    AudioCmd::Play => {
                        let Some(l) = loaded.as_mut() else {
                            continue;
                        };
                        if l.ended {
                            restart_at(&stream, l, Duration::ZERO, true, &events);
                        } else if l.paused {
                            l.resume();
                        }
                        emit(
                            &events,
                            l.generation,
                            EngineEvent::StateChanged(EngineState::Playing),
                        );
                    }
                    AudioCmd::Pause => {
                        let Some(l) = loaded.as_mut() else {
                            continue;
                        };
                        if !l.paused {
                            l.pause();
                        }
                        emit(&events, l.generation, EngineEvent::StateChanged(EngineState::Paused));
                    }
                    AudioCmd::Seek(position_ms) => {
                        let Some(l) = loaded.as_mut() else {
                            continue;
                        };
                        let target = Duration::from_millis(position_ms);
                        let resume = !l.paused || l.ended;
                        if l.ended || l.sink.try_seek(target).is_err() {
                            // Fall back to rebuilding the sink and skipping into the file.
                            restart_at(&stream, l, target, resume, &events);
                        } else {
                            l.accumulated = target;
                            l.started_at = (!l.paused).then(Instant::now);
                        }
                        emit(&events, l.generation, EngineEvent::PositionChanged(position_ms));
                    }
                    AudioCmd::Stop { generation } => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        emit(&events, generation, EngineEvent::StateChanged(EngineState::Stopped));
                    }
                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(l) = loaded.take() {
                            // Fade out gently before stopping.
                            if !l.paused {
                                fade_out_sink(&l.sink, fade_out_ms);
                            }
                            l.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // periodic position report + end-of-track check
                    let Some(l) = loaded.as_mut() else {
                        continue;
                    };
                    if l.paused || l.ended {
                        continue;
                    }
                    if l.sink.empty() {
                        l.pause();
                        l.ended = true;
                        emit(&events, l.generation, EngineEvent::EndOfMedia);
                    } else {
                        let pos = l.position().as_millis() as u64;
                        emit(&events, l.generation, EngineEvent::PositionChanged(pos));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn load(
    stream: &OutputStream,
    path: &Path,
    generation: u64,
    events: &EventSender,
) -> Option<Loaded> {
    match create_sink_at(stream, path, Duration::ZERO) {
        Ok((sink, total)) => {
            sink.play();
            if let Some(total) = total {
                let total_ms = total.as_millis() as u64;
                emit(events, generation, EngineEvent::DurationChanged(total_ms));
            }
            emit(events, generation, EngineEvent::StateChanged(EngineState::Playing));
            emit(events, generation, EngineEvent::PositionChanged(0));
            Some(Loaded {
                path: path.to_path_buf(),
                generation,
                sink,
                paused: false,
                ended: false,
                started_at: Some(Instant::now()),
                accumulated: Duration::ZERO,
            })
        }
        Err(e) => {
            log::warn!("cannot play {}: {e}", path.display());
            emit(events, generation, EngineEvent::Error(e.to_string()));
            emit(events, generation, EngineEvent::StateChanged(EngineState::Stopped));
            None
        }
    }
}

/// Replace the sink of `loaded` with a fresh one starting at `start_at`.
fn restart_at(
    stream: &OutputStream,
    loaded: &mut Loaded,
    start_at: Duration,
    play: bool,
    events: &EventSender,
) {
    loaded.sink.stop();
    match create_sink_at(stream, &loaded.path, start_at) {
        Ok((sink, _)) => {
            loaded.sink = sink;
            loaded.ended = false;
            loaded.accumulated = start_at;
            loaded.started_at = None;
            loaded.paused = true;
            if play {
                loaded.resume();
            }
        }
        Err(e) => {
            log::warn!("cannot reopen {}: {e}", loaded.path.display());
            loaded.ended = true;
            loaded.paused = true;
            emit(events, loaded.generation, EngineEvent::Error(e.to_string()));
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Without an output device every load fails, but commands are still drained
/// so the rest of the player keeps working.
fn run_without_output(rx: Receiver<AudioCmd>, events: &EventSender, err: &Error) {
    for cmd in rx {
        match cmd {
            AudioCmd::Load { generation, .. } => {
                emit(events, generation, EngineEvent::Error(err.to_string()));
                emit(events, generation, EngineEvent::StateChanged(EngineState::Stopped));
            }
            AudioCmd::Quit { .. } => break,
            _ => {}
        }
    }
}
