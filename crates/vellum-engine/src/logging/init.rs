use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "vellum_engine=debug,naga=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterSource {
    Config(String),
    Env(String),
    Fallback,
}

/// Explicit config wins over `RUST_LOG`; neither means `info`.
pub(crate) fn resolve_filter(config: &LoggingConfig, env: Option<String>) -> FilterSource {
    match (&config.env_filter, env) {
        (Some(filter), _) => FilterSource::Config(filter.clone()),
        (None, Some(filter)) => FilterSource::Env(filter),
        (None, None) => FilterSource::Fallback,
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Hosts that already install
/// their own `log` backend should not call this.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(&config, std::env::var("RUST_LOG").ok()) {
            FilterSource::Config(filter) | FilterSource::Env(filter) => {
                builder.parse_filters(&filter);
            }
            FilterSource::Fallback => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);

        // Another backend may already be installed by the host or a test harness.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_filter_beats_env() {
        let config = LoggingConfig::with_filter("vellum_engine=debug");
        assert_eq!(
            resolve_filter(&config, Some("warn".into())),
            FilterSource::Config("vellum_engine=debug".into())
        );
    }

    #[test]
    fn env_used_when_config_is_empty() {
        assert_eq!(
            resolve_filter(&LoggingConfig::default(), Some("warn".into())),
            FilterSource::Env("warn".into())
        );
    }

    #[test]
    fn falls_back_without_any_filter() {
        assert_eq!(resolve_filter(&LoggingConfig::default(), None), FilterSource::Fallback);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::with_filter("debug"));
    }
}
