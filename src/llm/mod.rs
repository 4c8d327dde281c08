//! LLM integration module for the maps tools
//!
//! Glue between provider function calling and the [`crate::ToolRegistry`].
//!
//! ## Features
//!
//! - **JSON Conversion**: Convert LLM function call JSON to ToolArgs
//! - **Tool Execution**: Execute tool calls with logging, error handling and auth detection
//! - **Result Handling**: Handle large tool results with truncation
//! - **Assistant Content**: Generate human-friendly descriptions of tool calls

pub mod assistant;
pub mod converter;
pub mod executor;
pub mod result_handler;

pub use assistant::{generate_assistant_content, ToolCallInfo};
pub use converter::json_to_tool_args;
pub use executor::{
    execute_tool_calls, execute_tool_calls_structured, ExecutionCallback, NoOpCallback,
    ToolCallRequest, ToolExecutionResult,
};
pub use result_handler::{handle_large_result, ResultHandlerConfig};
