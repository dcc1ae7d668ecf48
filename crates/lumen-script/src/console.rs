//! Console API
//!
//! `console.log/info/warn/error/debug`, routed to `tracing`.

use super::environment::Environment;
use super::object::ScriptObject;
use super::value::Value;

#[derive(Debug, Clone, Copy)]
enum Level {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

/// Install the `console` global
pub fn install_console(global: &Environment) {
    let mut console = ScriptObject::new();
    for (name, level) in [
        ("log", Level::Log),
        ("info", Level::Info),
        ("warn", Level::Warn),
        ("error", Level::Error),
        ("debug", Level::Debug),
    ] {
        console.set(name, Value::native(name, move |args| {
            log_with_level(level, args);
            Ok(Value::Undefined)
        }));
    }
    global.set("console", Value::object(console));
}

fn log_with_level(level: Level, values: &[Value]) {
    let output = format_values(values);
    match level {
        Level::Error => tracing::error!("[script] {}", output),
        Level::Warn => tracing::warn!("[script] {}", output),
        Level::Debug => tracing::debug!("[script] {}", output),
        Level::Log | Level::Info => tracing::info!("[script] {}", output),
    }
}

/// Space-separated display form of the arguments
fn format_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
