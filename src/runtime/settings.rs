use crate::config;
use crate::error::Error;

/// Load settings, falling back to defaults. Logging is not up yet at this
/// point, so the reason for a fallback is returned for the caller to log.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            (
                config::Settings::default(),
                Some(format!("{}, using defaults", Error::from(e))),
            )
        }
    }
}
