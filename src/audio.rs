//! Audio playback: the rodio-backed engine thread, duration lookups and the
//! engine/display timeline mapping.

mod duration;
mod player;
mod sink;
mod thread;
mod timeline;
mod types;

pub use duration::{
    DurationCache, DurationLookup, DurationProber, EngineDurationProber, poll_engine_duration,
};
pub use player::{AudioPlayer, Engine};
pub use timeline::Timeline;
pub use types::{AudioCmd, PlayMode};
