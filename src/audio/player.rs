use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::events::EventSender;

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// Commands the playback state machine issues to whatever plays the audio.
///
/// Results come back asynchronously as `EngineEvent`s tagged with the
/// generation of the last `load` or `stop`.
pub trait Engine {
    fn load(&self, path: &Path, generation: u64);
    fn play(&self);
    fn pause(&self);
    /// Absolute engine position in milliseconds.
    fn seek(&self, position_ms: u64);
    fn stop(&self, generation: u64);
}

/// Handle to the rodio audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(events: EventSender) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let audio_handle = spawn_audio_thread(rx, events);

        Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    fn send_logged(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            log::warn!("audio thread is gone, dropped {:?}", e.0);
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Engine for AudioPlayer {
    fn load(&self, path: &Path, generation: u64) {
        self.send_logged(AudioCmd::Load {
            path: path.to_path_buf(),
            generation,
        });
    }

    fn play(&self) {
        self.send_logged(AudioCmd::Play);
    }

    fn pause(&self) {
        self.send_logged(AudioCmd::Pause);
    }

    fn seek(&self, position_ms: u64) {
        self.send_logged(AudioCmd::Seek(position_ms));
    }

    fn stop(&self, generation: u64) {
        self.send_logged(AudioCmd::Stop { generation });
    }
}
