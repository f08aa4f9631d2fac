use std::fmt::{self, Write as _};

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::progress::ProgressWriter;

/// Events on this target are terminal output and are written verbatim.
pub const PRINT_TARGET: &str = "cidr2ip::print";

#[derive(Default)]
struct EventFields {
    message: String,
    raw_msg: Option<String>,
    success: bool,
    extra: String,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "raw_msg" => self.raw_msg = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            name => {
                let _ = write!(self.extra, " {}={}", name, value);
            }
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "success" => self.success = value,
            name => {
                let _ = write!(self.extra, " {}={}", name, value);
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "raw_msg" => self.raw_msg = Some(format!("{:?}", value)),
            name => {
                let _ = write!(self.extra, " {}={:?}", name, value);
            }
        }
    }
}

pub struct Cidr2IpFormatter;

impl<S, N> FormatEvent<S, N> for Cidr2IpFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut fields = EventFields::default();
        event.record(&mut fields);

        if meta.target() == PRINT_TARGET {
            if let Some(raw) = fields.raw_msg {
                return writeln!(writer, "{}", raw);
            }
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = if fields.success {
            ("[✓]", |s| s.green().bold())
        } else {
            match *meta.level() {
                Level::TRACE => ("[ ]", |s| s.dimmed()),
                Level::DEBUG => ("[?]", |s| s.blue()),
                Level::INFO => ("[+]", |s| s.green().bold()),
                Level::WARN => ("[*]", |s| s.yellow().bold()),
                Level::ERROR => ("[-]", |s| s.red().bold()),
            }
        };

        write!(writer, "{} {}", color_func(symbol.into()), fields.message)?;
        if !fields.extra.is_empty() {
            write!(writer, "{}", fields.extra.dimmed())?;
        }
        writeln!(writer)
    }
}

fn level_for(q_level: u8) -> &'static str {
    match q_level {
        0 => "info",
        1 => "warn",
        _ => "error",
    }
}

/// Screen output on [`PRINT_TARGET`] stays visible at every quiet level.
fn default_filter(q_level: u8) -> EnvFilter {
    EnvFilter::new(format!("{},{}=info", level_for(q_level), PRINT_TARGET))
}

/// Installs the global subscriber. `RUST_LOG` wins over `-q` when set.
pub fn init_logging(q_level: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(q_level));

    tracing_subscriber::fmt()
        .event_format(Cidr2IpFormatter)
        .with_env_filter(filter)
        .with_writer(|| ProgressWriter)
        .init();
}
