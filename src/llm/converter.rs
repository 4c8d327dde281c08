//! JSON to ToolArgs conversion for LLM function calls
//!
//! Providers disagree on how arguments arrive: OpenAI sends a JSON encoded
//! string, Anthropic a JSON object, some local models a string wrapping an
//! object wrapping nothing at all.

use crate::core::ToolError;
use crate::ToolArgs;
use anyhow::Result;
use serde_json::Value;
use tracing::debug;

/// Convert function call arguments to ToolArgs.
///
/// Accepts an object, `null` (no arguments) or a string holding either.
pub fn json_to_tool_args(tool_name: &str, args: Value) -> Result<ToolArgs> {
    let args = match args {
        Value::String(raw) if raw.trim().is_empty() => Value::Null,
        Value::String(raw) => {
            debug!(tool = tool_name, "decoding string encoded arguments");
            serde_json::from_str(&raw).map_err(ToolError::from)?
        }
        other => other,
    };

    // drop explicit nulls so optional arguments read as absent
    let args = match args {
        Value::Object(mut obj) => {
            obj.retain(|_, v| !v.is_null());
            Value::Object(obj)
        }
        other => other,
    };

    Ok(ToolArgs::from_json(args)?)
}
