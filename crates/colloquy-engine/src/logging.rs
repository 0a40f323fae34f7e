//! Structured logging setup.

use colloquy_core::config::LoggingSection;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. `format: json` emits one
/// JSON object per event; anything else uses the human-readable layout.
pub fn init(config: &LoggingSection) -> Result<(), EngineError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", config.level),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| EngineError::Logging {
        message: format!("subscriber already installed: {e}"),
    })
}
