//! Provide tracing, tailored to this tool.
//!
//! `main` calls [`init_journald_or_stderr`] once at startup to install a
//! subscriber. Events from `i2cbus` (`trace!` for raw transfers, `debug!`
//! for register values) flow through the same subscriber.
//!
//! The rest of the tool uses `crate::tracing::prelude::*` for the level
//! macros.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Crate prefixes stripped from event targets.
const OWN_CRATES: &[&str] = &["i2cbus::", "i2ctool::"];

/// Initialize logging.
///
/// Under systemd, events go to journald; otherwise to stderr so that
/// command output on stdout stays machine-readable.
pub fn init_journald_or_stderr() {
    if env::var("JOURNAL_STREAM").is_ok() {
        if let Ok(layer) = tracing_journald::layer() {
            tracing_subscriber::registry().with(layer).init();
        } else {
            init_stderr(LevelFilter::INFO);
            error!("Failed to initialize journald logging, using stderr.");
        }
    } else {
        init_stderr(LevelFilter::INFO);
    }
}

/// Log to stderr, filtered by RUST_LOG with `default` as the fallback level.
pub fn init_stderr(default: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(CompactFormatter),
        )
        .init();
}

/// Target with our own crate prefix removed; dependency targets unchanged.
fn short_target(target: &str) -> &str {
    OWN_CRATES
        .iter()
        .find_map(|prefix| target.strip_prefix(prefix))
        .unwrap_or(target)
}

/// One line per event: time, colored level, short target, message, then
/// `key=value` fields.
struct CompactFormatter;

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl tracing::field::Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for CompactFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        LocalTimer.format_time(&mut writer)?;
        write!(writer, " ")?;

        let (color, text) = match *event.metadata().level() {
            tracing::Level::ERROR => ("\x1b[31m", "ERROR"),
            tracing::Level::WARN => ("\x1b[33m", "WARN "),
            tracing::Level::INFO => ("\x1b[32m", "INFO "),
            tracing::Level::DEBUG => ("\x1b[34m", "DEBUG"),
            tracing::Level::TRACE => ("\x1b[35m", "TRACE"),
        };
        write!(writer, "{}{}\x1b[0m ", color, text)?;
        write!(writer, "{}: ", short_target(event.metadata().target()))?;

        if let Some(msg) = &visitor.message {
            write!(writer, "{}", msg.trim_matches('"'))?;
        }
        for (key, value) in &visitor.fields {
            write!(writer, " \x1b[90m{}={}\x1b[0m", key, value.trim_matches('"'))?;
        }

        writeln!(writer)
    }
}

// Local time to the nearest second; the default timer prints long UTC
// timestamps.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or(OffsetDateTime::now_utc());
        let stamp = now
            .format(time::macros::format_description!(
                "[hour]:[minute]:[second]"
            ))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("i2cbus::bus"), "bus");
        assert_eq!(short_target("i2cbus::register"), "register");
        assert_eq!(short_target("i2ctool::command"), "command");
        assert_eq!(short_target("mio::poll"), "mio::poll");
    }

    #[test]
    fn test_local_timer_format() {
        let mut out = String::new();
        LocalTimer.format_time(&mut Writer::new(&mut out)).unwrap();
        assert_eq!(out.len(), 8, "{out}");
        assert_eq!(out.matches(':').count(), 2);
    }
}
