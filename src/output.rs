use serde_json::{json, Value};

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Human }
    }

    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

pub fn success_envelope(command: &str, data: Value) -> Value {
    json!({ "ok": true, "command": command, "data": data })
}

pub fn error_envelope(command: &str, message: &str) -> Value {
    json!({ "ok": false, "command": command, "error": message })
}

/// Print a JSON result. Human mode prints nothing; callers render their own output.
pub fn emit_success(mode: OutputMode, command: &str, data: Value) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&success_envelope(command, data))?);
    }
    Ok(())
}

pub fn emit_error(mode: OutputMode, command: &str, message: &str) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&error_envelope(command, message))?);
    }
    Ok(())
}
