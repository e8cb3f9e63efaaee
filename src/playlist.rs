//! Playlist store: the flat text files songs are listed in.
//!
//! A playlist file holds one `name` or `name--artist` entry per line. The
//! in-memory `Playlist` keeps that order; the file is only ever appended to.

mod model;
mod store;

pub use model::*;
pub use store::*;
