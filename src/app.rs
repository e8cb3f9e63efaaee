//! Application module: the state-owning `App` model.
//!
//! `app::model` holds playlists, queue and cache state, `app::player` the
//! playback state machine and `app::search` the search box.

mod model;
mod player;
mod search;

pub use model::*;
pub use player::shuffle_index;
pub use search::SearchInput;

#[cfg(test)]
mod tests;
