//! Library matcher: finds local audio for playlist entries.
//!
//! Downloaded files are named `name--artist.ext` (or `name.ext`); the
//! matcher reads that identity back out of the file name.

mod matcher;
mod scan;

pub use matcher::*;
pub use scan::{LibraryFile, list_audio_files};
