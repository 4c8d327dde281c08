//! Core traits and types for the maps tools system

use crate::gateway::MapsError;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Error types for tool operations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {message}")]
    InvalidArgs { message: String },
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },
    #[error(transparent)]
    Maps(#[from] MapsError),
    #[error("Tool execution failed: {message}")]
    Execution { message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidArgs {
            message: message.into(),
        }
    }

    /// True when the failure came from rejected credentials, so the caller can
    /// ask for a new API key instead of retrying.
    pub fn is_auth(&self) -> bool {
        matches!(self, ToolError::Maps(e) if e.is_auth())
    }
}

/// Flat argument mapping passed to tool execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArgs {
    pub args: Map<String, Value>,
}

impl ToolArgs {
    /// Create ToolArgs from command line style `--key=value` arguments.
    ///
    /// Values are read as JSON when they parse (`--lat=40.1`, `--alternatives=true`,
    /// `--included_types=["cafe"]`) and as plain strings otherwise. A bare
    /// `--flag` is stored as `true`.
    pub fn from_args(args: &[&str]) -> Result<Self, ToolError> {
        let mut named = Map::new();

        for &arg in args {
            let Some(rest) = arg.strip_prefix("--") else {
                return Err(ToolError::invalid(format!(
                    "Unexpected positional argument '{}'; use --key=value",
                    arg
                )));
            };
            if let Some(eq) = rest.find('=') {
                let key = rest[..eq].to_string();
                let raw = &rest[eq + 1..];
                let value = serde_json::from_str::<Value>(raw)
                    .unwrap_or_else(|_| Value::String(raw.to_string()));
                named.insert(key, value);
            } else {
                named.insert(rest.to_string(), Value::Bool(true));
            }
        }

        Ok(Self { args: named })
    }

    /// Create ToolArgs from a JSON object as sent by an LLM function call
    pub fn from_json(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(args) => Ok(Self { args }),
            Value::Null => Ok(Self::default()),
            other => Err(ToolError::invalid(format!(
                "Tool arguments must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Get a raw argument. Explicit `null` counts as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    /// Get a string argument; empty strings count as absent
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Get free text, rendering numbers and booleans as text.
    ///
    /// Command line values are read as JSON first, so `--place_id=123` arrives
    /// as a number.
    pub fn get_text(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Get required free text
    pub fn require_text(&self, name: &str) -> Result<String, ToolError> {
        self.get_text(name)
            .ok_or_else(|| ToolError::invalid(format!("Missing required argument '{}'", name)))
    }

    /// Get a float argument, coercing numeric strings
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ToolError::invalid(format!("'{}' must be a number", name))),
            Some(_) => Err(ToolError::invalid(format!("'{}' must be a number", name))),
        }
    }

    /// Get an integer argument, truncating floats and coercing numeric strings
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ToolError::invalid(format!("'{}' must be an integer", name))),
            Some(_) => Err(ToolError::invalid(format!("'{}' must be an integer", name))),
        }
    }

    /// Get a boolean argument; accepts JSON booleans and common string spellings
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" | "enable" => Ok(Some(true)),
                "false" | "no" | "off" | "0" | "disable" => Ok(Some(false)),
                _ => Err(ToolError::invalid(format!("'{}' must be a boolean", name))),
            },
            Some(Value::Number(n)) => Ok(Some(n.as_f64().unwrap_or(0.0) != 0.0)),
            Some(_) => Err(ToolError::invalid(format!("'{}' must be a boolean", name))),
        }
    }

    /// Get a list of strings. A single string is accepted as a one element list.
    pub fn get_str_list(&self, name: &str) -> Result<Option<Vec<String>>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(vec![s.clone()])),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ToolError::invalid(format!("'{}' must be a list of strings", name))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(ToolError::invalid(format!(
                "'{}' must be a list of strings",
                name
            ))),
        }
    }

    /// Get a required string argument
    pub fn require_str(&self, name: &str) -> Result<&str, ToolError> {
        self.get_str(name)
            .ok_or_else(|| ToolError::invalid(format!("Missing required argument '{}'", name)))
    }

    /// Check whether an argument is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get argument count
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if arguments are empty
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Result returned by tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
}

impl ToolResult {
    /// Create successful result
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Create successful result with data
    pub fn success_with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a successful result whose message is the compact JSON of `data`
    pub fn from_json(data: Value) -> Self {
        let message = data.to_string();
        Self::success_with_data(message, data)
    }

    /// Create error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Main trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the tool usage/signature
    fn signature(&self) -> &str;

    /// Validate arguments before execution
    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError>;

    /// Execute the tool with given arguments
    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult>;

    /// Get OpenAI function schema for this tool
    fn get_openai_schema(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.get_parameters_schema()
            }
        })
    }

    /// Get parameters schema - should be overridden by implementing tools
    fn get_parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }
}

/// Registry for managing available tools
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Execute a tool by name
    pub async fn execute_tool(&self, name: &str, args: &ToolArgs) -> Result<ToolResult, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::ToolNotFound {
            name: name.to_string(),
        })?;

        // Validate arguments
        tool.validate_args(args)?;

        // Execute tool, keeping typed errors visible to the caller
        tool.execute(args).await.map_err(|e| match e.downcast::<MapsError>() {
            Ok(maps) => ToolError::Maps(maps),
            Err(e) => match e.downcast::<ToolError>() {
                Ok(tool_err) => tool_err,
                Err(e) => ToolError::Execution {
                    message: format!("{:#}", e),
                },
            },
        })
    }

    /// List all registered tool names, sorted
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get OpenAI function schemas for all tools
    pub fn get_all_schemas(&self) -> Vec<Value> {
        self.list_tools()
            .iter()
            .filter_map(|name| self.get_tool(name))
            .map(|tool| tool.get_openai_schema())
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
