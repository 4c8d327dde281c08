//! Assistant content generation for tool calls
//!
//! Generates a short human-friendly line describing what the assistant is
//! about to look up, used as the assistant message accompanying tool calls.

use crate::tools::{
    TOOL_DIRECTIONS, TOOL_GEOCODE, TOOL_PLACES_SEARCH_NEARBY, TOOL_PLACES_SEARCH_TEXT,
    TOOL_PLACE_DETAILS, TOOL_REVERSE_GEOCODE,
};
use serde_json::Value;

/// Simple tool call representation for assistant content generation
#[derive(Debug, Clone)]
pub struct ToolCallInfo {
    pub name: String,
    pub arguments: String,
}

impl ToolCallInfo {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

fn describe(call: &ToolCallInfo) -> String {
    let args = serde_json::from_str::<Value>(&call.arguments).unwrap_or(Value::Null);
    let text = |key: &str| args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());

    match call.name.as_str() {
        TOOL_GEOCODE => match text("address") {
            Some(address) => format!("I'll look up where `{}` is.", address),
            None => "I'll look up that location.".to_string(),
        },
        TOOL_REVERSE_GEOCODE => {
            match (args.get("lat").and_then(Value::as_f64), args.get("lng").and_then(Value::as_f64)) {
                (Some(lat), Some(lng)) => format!("I'll find the address at {}, {}.", lat, lng),
                _ => "I'll find the address for those coordinates.".to_string(),
            }
        }
        TOOL_DIRECTIONS => match (text("origin"), text("destination")) {
            (Some(origin), Some(destination)) => {
                format!("I'll get directions from `{}` to `{}`.", origin, destination)
            }
            _ => "I'll get directions for that trip.".to_string(),
        },
        TOOL_PLACES_SEARCH_TEXT => match text("text_query") {
            Some(query) => format!("I'll search Google Maps for `{}`.", query),
            None => "I'll search Google Maps for matching places.".to_string(),
        },
        TOOL_PLACES_SEARCH_NEARBY => "I'll look for places nearby.".to_string(),
        TOOL_PLACE_DETAILS => {
            "I'll fetch the details for that place (hours, phone, website).".to_string()
        }
        _ => format!("I'll use the {} tool to help with your request.", call.name),
    }
}

/// Generate meaningful assistant content based on actual tool calls
pub fn generate_assistant_content(tool_calls: &[ToolCallInfo]) -> String {
    match tool_calls {
        [] => String::new(),
        [call] => describe(call),
        [first, second] => format!(
            "I'll help you with that by using {} and {}.",
            first.name, second.name
        ),
        calls => {
            let tool_names: Vec<&str> = calls.iter().map(|tc| tc.name.as_str()).collect();
            format!(
                "I'll work on this using multiple tools: {}.",
                tool_names.join(", ")
            )
        }
    }
}
