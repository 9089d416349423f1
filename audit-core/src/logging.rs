//! src/logging.rs
//! ============================================================================
//! # Logger: tracing subscriber setup
//!
//! Two `fmt` layers on one registry, each behind its own `EnvFilter`
//! (configured level as the default directive, `RUST_LOG` on top):
//! - a daily-rolling file at `<log_dir>/audit.YYYY-MM-DD`
//! - an optional stderr mirror for live debugging
//!
//! Both use the compact `SEQ LEVEL [file:line module] message` format.

use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
    registry::LookupSpan,
};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "audit";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Failed to create log directory {path:?}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log level directive: {0}")]
    InvalidDirective(#[from] ParseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`; keep the guard alive until
    /// exit so buffered file output is flushed.
    pub fn init(cfg: &LoggingConfig) -> Result<WorkerGuard, LoggingError> {
        let log_dir = cfg
            .resolved_log_dir()
            .map_err(|e| LoggingError::ConfigError(e.to_string()))?;
        fs::create_dir_all(&log_dir).map_err(|source| LoggingError::DirectoryCreationFailed {
            path: log_dir.clone(),
            source,
        })?;

        // daily rolling file appender → <log_dir>/audit.YYYY-MM-DD
        let (file, guard) = tracing_appender::non_blocking(rolling::daily(&log_dir, LOG_FILE_PREFIX));

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(file)
            .with_ansi(false)
            .with_filter(env_filter(&cfg.level)?);

        // optional stderr layer for live debugging
        let stderr_layer = if cfg.stderr {
            Some(
                fmt::layer()
                    .event_format(SeqFileMod)
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_filter(env_filter(&cfg.level)?),
            )
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        Ok(guard)
    }
}

/// `RUST_LOG` directives layered over the configured default level.
fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let default: Directive = level.parse()?;
    Ok(EnvFilter::builder()
        .with_default_directive(default)
        .from_env_lossy())
}

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// Custom formatter: `SEQ LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically-increasing sequence number
        let seq: usize = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // write all key-value pairs for this event (usually just the message)
        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

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

    #[test]
    fn test_seq_format_layout() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(SeqFileMod)
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(moved = 2, "folder moved");
            tracing::warn!("import rejected");
        });

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let (seq_a, rest_a) = lines[0].split_once(' ').unwrap();
        let (seq_b, _) = lines[1].split_once(' ').unwrap();
        assert_eq!(seq_a.len(), 6);
        assert!(seq_b.parse::<usize>().unwrap() > seq_a.parse::<usize>().unwrap());

        assert!(rest_a.starts_with("INFO "));
        assert!(rest_a.contains("src/logging.rs:"));
        assert!(rest_a.contains("audit_core::logging::tests]"));
        assert!(rest_a.contains("folder moved"));
        assert!(rest_a.contains("moved=2"));
        assert!(lines[1].contains("WARN "));
    }

    #[test]
    fn test_env_filter_accepts_levels_and_targets() {
        assert!(env_filter("info").is_ok());
        assert!(env_filter("audit_core=debug").is_ok());
    }
}
