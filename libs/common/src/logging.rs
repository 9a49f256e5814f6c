//! Logging setup for site planner tools
//!
//! Console output goes to stderr so command output on stdout stays machine-readable.
//! An optional daily rolling file mirrors the console without ANSI colors.

use std::path::Path;
use std::sync::{Mutex, OnceLock};

use errors::{PlannerError, PlannerResult};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config_loader::LogSettings;

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Event formatter that outputs: `timestamp [LEVEL] message`
///
/// Example output: `2026-01-02T00:50:44.809000Z [INFO] Loaded configuration`
pub struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m", // magenta
                Level::DEBUG => "\x1b[34m", // blue
                Level::INFO => "\x1b[32m",  // green
                Level::WARN => "\x1b[33m",  // yellow
                Level::ERROR => "\x1b[31m", // red
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

// Keeps the non-blocking file writer alive for the process lifetime
static GUARDS: OnceLock<Mutex<Vec<WorkerGuard>>> = OnceLock::new();

/// Resolve the filter directive: `RUST_LOG` wins over the configured level
pub fn filter_directive(configured: &str, rust_log: Option<String>) -> String {
    match rust_log {
        Some(env) if !env.trim().is_empty() => env,
        _ => configured.to_string(),
    }
}

/// Parse a filter directive into an EnvFilter
pub fn build_filter(directive: &str) -> PlannerResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| {
        PlannerError::configuration(format!("Invalid log level '{}': {}", directive, e))
    })
}

/// Daily rolling file writer under `dir`, creating the directory if needed
pub fn file_writer(dir: &Path, prefix: &str) -> PlannerResult<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, prefix);
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize the global subscriber from configuration
///
/// Fails if the level is not a valid filter or a global subscriber is already set.
pub fn init_with_config(settings: &LogSettings) -> PlannerResult<()> {
    let directive = filter_directive(&settings.level, std::env::var("RUST_LOG").ok());
    let filter = build_filter(&directive)?;

    let registry = tracing_subscriber::registry().with(filter);

    let console_layer = if settings.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .event_format(BracketedLevelFormat)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match &settings.dir {
        Some(dir) => {
            let (writer, guard) = file_writer(dir, &settings.file_prefix)?;
            let guards = GUARDS.get_or_init(|| Mutex::new(Vec::new()));
            match guards.lock() {
                Ok(mut guards) => guards.push(guard),
                Err(poisoned) => poisoned.into_inner().push(guard),
            }
            Some(
                fmt::layer()
                    .event_format(BracketedLevelFormat)
                    .with_ansi(false)
                    .with_writer(writer),
            )
        },
        None => None,
    };

    registry
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PlannerError::internal(format!("Logging already initialized: {}", e)))?;

    tracing::debug!("Logging initialized with filter '{}'", directive);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_rust_log_overrides_configured_level() {
        assert_eq!(filter_directive("info", None), "info");
        assert_eq!(filter_directive("info", Some("debug".into())), "debug");
        assert_eq!(filter_directive("warn", Some("  ".into())), "warn");
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        assert!(build_filter("info,site_model=debug").is_ok());
        let err = build_filter("site_model=notalevel").unwrap_err();
        assert!(matches!(err, PlannerError::Configuration(_)));
    }

    #[test]
    fn test_bracketed_format_output() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(BracketedLevelFormat)
                .with_ansi(false)
                .with_writer(captured.clone()),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(device = "MegapackXL", "Device wider than site width cap");
        });

        let text = captured.text();
        assert!(text.contains("[WARN] Device wider than site width cap"));
        assert!(text.contains("device=\"MegapackXL\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_file_writer_creates_rolling_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let (writer, guard) = file_writer(&log_dir, "site-planner.log").unwrap();

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(BracketedLevelFormat)
                .with_ansi(false)
                .with_writer(writer),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Site computed");
        });
        drop(guard);

        let contents: String = std::fs::read_dir(&log_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("site-planner.log")
            })
            .map(|e| std::fs::read_to_string(e.path()).unwrap())
            .collect();
        assert!(contents.contains("[INFO] Site computed"));
    }
}
