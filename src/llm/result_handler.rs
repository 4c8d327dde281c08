//! Large tool result handling for LLM context limits
//!
//! Maps results are compact by construction, but a directions call with
//! alternatives and step lists can still run long.

/// Configuration for result handling
#[derive(Debug, Clone)]
pub struct ResultHandlerConfig {
    /// Maximum size in bytes for tool results
    pub max_size_bytes: usize,
    /// Whether to truncate large results (true) or replace with warning (false)
    pub truncate_enabled: bool,
}

impl Default for ResultHandlerConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 64_000,
            truncate_enabled: true,
        }
    }
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a char
fn truncate_at_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Handle large tool results by truncating or warning
pub fn handle_large_result(
    tool_name: &str,
    result_message: &str,
    config: &ResultHandlerConfig,
) -> String {
    let result_size = result_message.len();
    if result_size <= config.max_size_bytes {
        return result_message.to_string();
    }

    if config.truncate_enabled {
        format!(
            "{}\n\nWARNING: Tool result was truncated due to size limit ({} bytes > {} bytes). \
            The result may be incomplete. Narrow the request, for example with fewer \
            max_results, a smaller radius_m or without alternatives.",
            truncate_at_char_boundary(result_message, config.max_size_bytes),
            result_size,
            config.max_size_bytes
        )
    } else {
        format!(
            "RESULT TOO LARGE: Tool '{}' returned {} bytes (limit: {} bytes). \
            The result was not included. Narrow the request with fewer max_results, \
            a smaller radius_m or more specific type filters.",
            tool_name, result_size, config.max_size_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_large_result_small() {
        let config = ResultHandlerConfig::default();
        let small_result = r#"{"places":[],"raw_count":0}"#;
        assert_eq!(
            handle_large_result("gmaps_places_search_text", small_result, &config),
            small_result
        );
    }

    #[test]
    fn test_handle_large_result_large_with_truncation() {
        let config = ResultHandlerConfig {
            max_size_bytes: 1000,
            truncate_enabled: true,
        };

        let large_result = "x".repeat(1500);
        let processed = handle_large_result("gmaps_directions", &large_result, &config);

        assert!(processed.starts_with(&"x".repeat(1000)));
        assert!(!processed.starts_with(&"x".repeat(1001)));
        assert!(processed.contains("WARNING: Tool result was truncated"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let config = ResultHandlerConfig {
            max_size_bytes: 5,
            truncate_enabled: true,
        };
        // each 'é' is two bytes; byte 5 falls inside the third one
        let processed = handle_large_result("gmaps_geocode", "éééé", &config);
        assert!(processed.starts_with("éé\n"));
    }

    #[test]
    fn test_handle_large_result_large_without_truncation() {
        let config = ResultHandlerConfig {
            max_size_bytes: 1000,
            truncate_enabled: false,
        };

        let large_result = "x".repeat(1500);
        let processed = handle_large_result("gmaps_directions", &large_result, &config);

        assert!(processed.contains("RESULT TOO LARGE: Tool 'gmaps_directions'"));
        assert!(!processed.contains("xxx"));
    }
}
