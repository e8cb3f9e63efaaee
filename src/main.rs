mod app;
mod audio;
mod config;
mod download;
mod error;
mod events;
mod library;
mod playlist;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
