// ABOUTME: Builds the tracing dispatcher for a run from LogConfig.
// ABOUTME: The dispatcher is attached per run, never installed globally.

use serde::Deserialize;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `info` or `cert_manager_verifier=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Build a dispatcher writing to stderr, so stdout stays free for the report.
///
/// An unparseable level falls back to `info` rather than failing the run;
/// `Config::validate` rejects such levels before this point.
pub fn dispatch(config: &LogConfig) -> Dispatch {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Text => Dispatch::new(builder.finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

/// Whether `level` is a valid filter directive.
pub fn is_valid_level(level: &str) -> bool {
    EnvFilter::try_new(level).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_text() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn accepts_target_directives() {
        assert!(is_valid_level("warn,cert_manager_verifier=debug"));
        assert!(!is_valid_level("cert_manager_verifier=loud"));
    }

    #[test]
    fn dispatch_scopes_events() {
        let dispatch = dispatch(&LogConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
        });
        tracing::dispatcher::with_default(&dispatch, || {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        });
    }
}
