//! # gmaps-tools - Google Maps Platform tools for LLM agents
//!
//! Exposes geocoding, routing and place search as function-calling tools
//! whose results are small enough to hand straight back to a model.
//!
//! ## Features
//!
//! - **Geocoding**: forward and reverse, biased toward a configured home
//! - **Directions**: Routes API with polylines stripped and localized text promoted
//! - **Places**: text search, nearby search and place details with compact summaries
//! - **Time phrases**: "3:30pm tomorrow" resolved to epoch seconds in the local zone
//! - **LLM glue**: OpenAI function schemas, tool call execution, result truncation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gmaps_tools::{create_tool_registry, MapsConfig, MapsContext, ToolArgs};
//! use serde_json::json;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = MapsConfig::load(None)?;
//! let registry = create_tool_registry(MapsContext::from_config(config)?);
//! let args = ToolArgs::from_json(json!({"address": "1600 Amphitheatre Parkway"}))?;
//! let result = registry.execute_tool("gmaps_geocode", &args).await?;
//! println!("{}", result.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod gateway;
pub mod llm;
pub mod normalize;
pub mod request;
pub mod time;
pub mod tools;

// Re-export main types
pub use config::{ConfigError, HomeLocation, MapsConfig};
pub use core::{Tool, ToolArgs, ToolError, ToolRegistry, ToolResult};
pub use gateway::{HttpTransport, MapsError, MapsGateway, PlaceDetails, ReqwestTransport};
pub use tools::{
    DirectionsTool, GeocodeTool, MapsContext, PlaceDetailsTool, PlacesNearbySearchTool,
    PlacesTextSearchTool, ReverseGeocodeTool, API_PROMPT,
};

/// Initialize the tool registry with every Google Maps tool sharing `ctx`
pub fn create_tool_registry(ctx: MapsContext) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Geocoding
    registry.register(Box::new(GeocodeTool::new(ctx.clone())));
    registry.register(Box::new(ReverseGeocodeTool::new(ctx.clone())));

    // Routes
    registry.register(Box::new(DirectionsTool::new(ctx.clone())));

    // Places
    registry.register(Box::new(PlacesTextSearchTool::new(ctx.clone())));
    registry.register(Box::new(PlacesNearbySearchTool::new(ctx.clone())));
    registry.register(Box::new(PlaceDetailsTool::new(ctx)));

    registry
}
