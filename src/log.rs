use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Identifies which game a log line belongs to.
#[derive(Clone, Debug, Default)]
pub struct LogContext {
    pub session: Option<String>,
    pub seed: Option<u32>,
    pub tick: Option<u64>,
}

impl LogContext {
    pub fn session(session: impl Into<String>) -> Self {
        Self {
            session: Some(session.into()),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine<'a> {
    timestamp: String,
    level: &'a str,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

pub fn format_line(level: &str, event: &str, ctx: &LogContext, details: Value) -> String {
    let line = StructuredLogLine {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        level,
        event,
        session: ctx.session.as_deref(),
        seed: ctx.seed,
        tick: ctx.tick,
        details,
    };
    serde_json::to_string(&line).unwrap_or_else(|error| {
        format!(r#"{{"level":"error","event":"log_serialize_failed","details":"{error}"}}"#)
    })
}

/// One JSON object per line on stderr.
pub fn emit(level: &str, event: &str, ctx: &LogContext, details: Value) {
    eprintln!("{}", format_line(level, event, ctx, details));
}

pub fn info(event: &str, ctx: &LogContext, details: Value) {
    emit("info", event, ctx, details);
}

pub fn warn(event: &str, ctx: &LogContext, details: Value) {
    emit("warn", event, ctx, details);
}

pub fn error(event: &str, ctx: &LogContext, details: Value) {
    emit("error", event, ctx, details);
}
