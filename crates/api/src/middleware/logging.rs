//! Logging initialization.
//!
//! Production runs json output so webhook acknowledgments and routing
//! decisions land in the log pipeline as structured events; anything else
//! in `logging.format` falls back to pretty output for local development.
//! Span close events are kept on so every request span reports its
//! duration.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Picks the filter directive: `RUST_LOG` wins over the configured level.
fn filter_directive<'a>(rust_log: Option<&'a str>, config_level: &'a str) -> &'a str {
    match rust_log {
        Some(directive) if !directive.is_empty() => directive,
        _ => config_level,
    }
}

/// Installs the global tracing subscriber from configuration.
pub fn init_logging(config: &LoggingConfig) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = EnvFilter::new(filter_directive(rust_log.as_deref(), &config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.format == "json" {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true);
        subscriber.with(json_layer).init();
    } else {
        let pretty_layer = fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true);
        subscriber.with(pretty_layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_overrides_config_level() {
        assert_eq!(filter_directive(Some("debug,sqlx=warn"), "info"), "debug,sqlx=warn");
    }

    #[test]
    fn test_config_level_is_fallback() {
        assert_eq!(filter_directive(None, "info"), "info");
        assert_eq!(filter_directive(Some(""), "warn"), "warn");
    }
}
