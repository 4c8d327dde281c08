//! Tool execution orchestration for LLM function calls
//!
//! Provides utilities to execute tool calls with proper error handling,
//! result processing, and optional callbacks for logging and custom behavior.

use crate::core::ToolError;
use crate::ToolRegistry;
use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use super::converter::json_to_tool_args;
use super::result_handler::{handle_large_result, ResultHandlerConfig};

/// Result from a single tool execution
#[derive(Debug, Clone)]
pub struct ToolExecutionResult {
    /// Tool call ID (for provider correlation)
    pub tool_call_id: String,
    /// Tool name
    pub tool_name: String,
    /// Result content or error message
    pub content: String,
    /// Whether the execution succeeded
    pub success: bool,
    /// The Maps API key was missing or rejected; retrying will not help
    pub auth_error: bool,
}

impl ToolExecutionResult {
    fn failed(call: &ToolCallRequest, content: String, auth_error: bool) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content,
            success: false,
            auth_error,
        }
    }
}

/// Simple tool call representation for execution
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    /// Tool call ID
    pub id: String,
    /// Tool name
    pub name: String,
    /// JSON arguments as string
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Optional callback for logging and custom behavior
pub trait ExecutionCallback: Send {
    /// Called before executing a tool
    fn on_tool_start(&mut self, tool_name: &str, args: &str);

    /// Called after tool execution (success or failure)
    fn on_tool_complete(&mut self, tool_name: &str, args: &str, result: &str, success: bool);

    /// Called for compact logging (JSON format)
    fn on_compact_log(&mut self, compact_json: &str);
}

/// Default no-op callback
pub struct NoOpCallback;

impl ExecutionCallback for NoOpCallback {
    fn on_tool_start(&mut self, _tool_name: &str, _args: &str) {}
    fn on_tool_complete(&mut self, _tool_name: &str, _args: &str, _result: &str, _success: bool) {}
    fn on_compact_log(&mut self, _compact_json: &str) {}
}

async fn execute_one(
    registry: &ToolRegistry,
    call: &ToolCallRequest,
    result_config: &ResultHandlerConfig,
    callback: &mut dyn ExecutionCallback,
) -> ToolExecutionResult {
    let tool_name = &call.name;
    let tool_args_str = &call.arguments;

    let compact_json = serde_json::json!({
        "name": tool_name,
        "arguments": serde_json::from_str::<Value>(tool_args_str).unwrap_or(serde_json::json!({}))
    });
    callback.on_compact_log(&compact_json.to_string());
    callback.on_tool_start(tool_name, tool_args_str);

    let args: Value = if tool_args_str.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(tool_args_str) {
            Ok(args) => args,
            Err(e) => {
                let error_msg = format!("Failed to parse tool arguments for {}: {}", tool_name, e);
                callback.on_tool_complete(tool_name, tool_args_str, &error_msg, false);
                return ToolExecutionResult::failed(call, error_msg, false);
            }
        }
    };

    let tool_args = match json_to_tool_args(tool_name, args) {
        Ok(args) => args,
        Err(e) => {
            let error_msg = format!("Failed to convert arguments for {}: {}", tool_name, e);
            callback.on_tool_complete(tool_name, tool_args_str, &error_msg, false);
            return ToolExecutionResult::failed(call, error_msg, false);
        }
    };

    info!(tool = %tool_name, "executing tool call");
    match registry.execute_tool(tool_name, &tool_args).await {
        Ok(result) => {
            callback.on_tool_complete(tool_name, tool_args_str, &result.message, true);
            ToolExecutionResult {
                tool_call_id: call.id.clone(),
                tool_name: tool_name.clone(),
                content: handle_large_result(tool_name, &result.message, result_config),
                success: true,
                auth_error: false,
            }
        }
        Err(e) => {
            let auth_error = e.is_auth();
            let error_msg = match &e {
                ToolError::InvalidArgs { .. } | ToolError::ToolNotFound { .. } => {
                    format!("{} for {}", e, tool_name)
                }
                _ => format!("Tool execution failed for {}: {}", tool_name, e),
            };
            warn!(tool = %tool_name, auth_error, error = %e, "tool call failed");
            callback.on_tool_complete(tool_name, tool_args_str, &error_msg, false);
            ToolExecutionResult::failed(call, error_msg, auth_error)
        }
    }
}

/// Execute tool calls in order and return a combined result string
pub async fn execute_tool_calls(
    registry: &ToolRegistry,
    tool_calls: Vec<ToolCallRequest>,
    result_config: &ResultHandlerConfig,
    callback: &mut dyn ExecutionCallback,
) -> Result<String> {
    let results =
        execute_tool_calls_structured(registry, tool_calls, result_config, callback).await?;

    Ok(results
        .iter()
        .map(|r| {
            if r.success {
                format!("Tool: {}\nResult: {}", r.tool_name, r.content)
            } else {
                format!("Tool: {}\nError: {}", r.tool_name, r.content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// Execute tool calls and return structured results
///
/// Returns individual tool results that can be sent as separate tool messages
/// to LLM providers. A failing call never stops the remaining ones.
pub async fn execute_tool_calls_structured(
    registry: &ToolRegistry,
    tool_calls: Vec<ToolCallRequest>,
    result_config: &ResultHandlerConfig,
    callback: &mut dyn ExecutionCallback,
) -> Result<Vec<ToolExecutionResult>> {
    let mut results = Vec::with_capacity(tool_calls.len());
    for call in &tool_calls {
        results.push(execute_one(registry, call, result_config, callback).await);
    }
    Ok(results)
}
