//! Places (New) tools: text search, nearby search and place details

use super::{
    explicit_point, language_schema, lat_lng_schema, region_schema, validate_strings,
    MapsContext, TOOL_PLACES_SEARCH_NEARBY, TOOL_PLACES_SEARCH_TEXT, TOOL_PLACE_DETAILS,
};
use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use crate::request::{
    clamp_result_count, normalize_price_levels, normalize_rating, place_id_from_resource,
    BiasCircle, NearbySearchOptions, TextSearchOptions, MAX_RADIUS_M, MIN_RADIUS_M,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const PRICE_LEVEL_CHOICES: [&str; 4] = ["INEXPENSIVE", "MODERATE", "EXPENSIVE", "VERY_EXPENSIVE"];
const RANK_CHOICES: [&str; 2] = ["POPULARITY", "DISTANCE"];
const MAX_TYPE_FILTERS: usize = 10;
const MAX_PRIMARY_TYPE_FILTERS: usize = 5;

const HOME_UNKNOWN: &str =
    "Home location unknown; provide lat and lng explicitly for nearby search";

fn validate_min_rating(args: &ToolArgs) -> Result<Option<f64>, ToolError> {
    match args.get_f64("min_rating")? {
        Some(rating) if normalize_rating(rating).is_none() => {
            Err(ToolError::invalid("min_rating must be between 0 and 5"))
        }
        rating => Ok(rating),
    }
}

fn validate_max_results(args: &ToolArgs) -> Result<Option<u32>, ToolError> {
    Ok(args.get_i64("max_results")?.map(clamp_result_count))
}

fn validate_type_list(args: &ToolArgs, name: &str, limit: usize) -> Result<(), ToolError> {
    if let Some(items) = args.get_str_list(name)? {
        if items.len() > limit {
            return Err(ToolError::invalid(format!(
                "'{}' accepts at most {} entries",
                name, limit
            )));
        }
    }
    Ok(())
}

fn radius_schema(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": MIN_RADIUS_M,
        "maximum": MAX_RADIUS_M,
        "description": description
    })
}

fn max_results_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": 20,
        "description": "Maximum number of places to return"
    })
}

fn type_list_schema(limit: usize, description: &str) -> Value {
    json!({
        "type": "array",
        "items": {"type": "string"},
        "maxItems": limit,
        "description": description
    })
}

/// Free text place search with optional filters and a bias circle
pub struct PlacesTextSearchTool {
    ctx: MapsContext,
}

impl PlacesTextSearchTool {
    pub fn new(ctx: MapsContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for PlacesTextSearchTool {
    fn name(&self) -> &str {
        TOOL_PLACES_SEARCH_TEXT
    }

    fn description(&self) -> &str {
        "Search for places with free text query (minimal fields)"
    }

    fn signature(&self) -> &str {
        "gmaps_places_search_text --text_query=<text> [--included_type=<type>] [--open_now] [--min_rating=<0-5>] [--price_levels=<list>] [--radius_m=<meters>] [--lat=<deg> --lng=<deg>] [--max_results=<1-20>]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        args.require_text("text_query")?;
        validate_strings(args, &["included_type", "language", "region"])?;
        args.get_bool("strict_type_filtering")?;
        args.get_bool("open_now")?;
        validate_min_rating(args)?;
        validate_max_results(args)?;
        args.get_f64("radius_m")?;
        explicit_point(args)?;

        if let Some(levels) = args.get_str_list("price_levels")? {
            if levels.is_empty() || levels.len() > PRICE_LEVEL_CHOICES.len() {
                return Err(ToolError::invalid(format!(
                    "'price_levels' must list 1 to {} levels",
                    PRICE_LEVEL_CHOICES.len()
                )));
            }
            normalize_price_levels(&levels).map_err(|e| {
                ToolError::invalid(format!(
                    "{}; expected one of {}",
                    e,
                    PRICE_LEVEL_CHOICES.join(", ")
                ))
            })?;
        }
        Ok(())
    }

    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let config = &self.ctx.config;

        // bias only when a radius is given
        let bias = match args.get_f64("radius_m")?.filter(|r| *r > 0.0) {
            Some(radius) => self
                .ctx
                .center(args)?
                .map(|(lat, lng)| BiasCircle::new(lat, lng, radius)),
            None => None,
        };

        let requested_rating = validate_min_rating(args)?;
        let min_rating = requested_rating.and_then(normalize_rating);

        let price_levels = match args.get_str_list("price_levels")? {
            Some(levels) => Some(
                normalize_price_levels(&levels).map_err(|e| ToolError::invalid(e.to_string()))?,
            ),
            None => None,
        };

        let options = TextSearchOptions {
            text_query: args.require_text("text_query")?,
            included_type: args.get_str("included_type").map(str::to_string),
            strict_type_filtering: args.get_bool("strict_type_filtering")?,
            open_now: args.get_bool("open_now")?,
            min_rating,
            price_levels,
            bias,
            language: Some(config.language(args.get_str("language"))),
            region: config.region(args.get_str("region")),
            page_size: validate_max_results(args)?,
        };
        debug!(query = %options.text_query, biased = options.bias.is_some(), "places text search");

        let mut data = self.ctx.gateway.places_search_text(&options).await?;
        if let (Some(requested), Some(rounded)) = (requested_rating, min_rating) {
            if rounded != requested {
                data["normalized_min_rating"] = json!(rounded);
            }
        }
        Ok(ToolResult::from_json(data))
    }

    fn get_parameters_schema(&self) -> Value {
        let (lat, lng) = lat_lng_schema();
        json!({
            "type": "object",
            "properties": {
                "text_query": {
                    "type": "string",
                    "description": "What to search for, e.g. 'vegan pizza in Brooklyn'"
                },
                "included_type": {
                    "type": "string",
                    "description": "Restrict to one place type, e.g. 'restaurant'"
                },
                "strict_type_filtering": {
                    "type": "boolean",
                    "description": "Only return places of included_type"
                },
                "open_now": {"type": "boolean", "description": "Only places open now"},
                "min_rating": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 5,
                    "description": "Minimum star rating, rounded up to the nearest 0.5"
                },
                "price_levels": {
                    "type": "array",
                    "items": {"type": "string", "enum": PRICE_LEVEL_CHOICES},
                    "minItems": 1,
                    "maxItems": PRICE_LEVEL_CHOICES.len(),
                    "description": "Allowed price levels"
                },
                "radius_m": radius_schema("Bias results to this radius around lat/lng or home"),
                "lat": lat,
                "lng": lng,
                "language": language_schema(),
                "region": region_schema(),
                "max_results": max_results_schema()
            },
            "required": ["text_query"]
        })
    }
}

/// Type filtered search inside a circle around a point or home
pub struct PlacesNearbySearchTool {
    ctx: MapsContext,
}

impl PlacesNearbySearchTool {
    pub fn new(ctx: MapsContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for PlacesNearbySearchTool {
    fn name(&self) -> &str {
        TOOL_PLACES_SEARCH_NEARBY
    }

    fn description(&self) -> &str {
        "Search for places near a location by types"
    }

    fn signature(&self) -> &str {
        "gmaps_places_search_nearby --radius_m=<meters> [--lat=<deg> --lng=<deg>] [--included_types=<list>] [--rank=POPULARITY|DISTANCE] [--max_results=<1-20>]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        args.get_f64("radius_m")?
            .ok_or_else(|| ToolError::invalid("Missing required argument 'radius_m'"))?;
        validate_strings(args, &["language", "region", "rank"])?;
        explicit_point(args)?;
        validate_max_results(args)?;
        validate_type_list(args, "included_types", MAX_TYPE_FILTERS)?;
        validate_type_list(args, "excluded_types", MAX_TYPE_FILTERS)?;
        validate_type_list(args, "included_primary_types", MAX_PRIMARY_TYPE_FILTERS)?;
        validate_type_list(args, "excluded_primary_types", MAX_PRIMARY_TYPE_FILTERS)?;
        if let Some(rank) = args.get_str("rank") {
            if !RANK_CHOICES.contains(&rank) {
                return Err(ToolError::invalid(format!(
                    "'rank' must be one of {}",
                    RANK_CHOICES.join(", ")
                )));
            }
        }
        Ok(())
    }

    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let config = &self.ctx.config;
        let (lat, lng) = self
            .ctx
            .center(args)?
            .ok_or_else(|| ToolError::Execution {
                message: HOME_UNKNOWN.to_string(),
            })?;
        let radius = args
            .get_f64("radius_m")?
            .ok_or_else(|| ToolError::invalid("Missing required argument 'radius_m'"))?;

        let options = NearbySearchOptions {
            restriction: BiasCircle::new(lat, lng, radius),
            included_types: args.get_str_list("included_types")?,
            excluded_types: args.get_str_list("excluded_types")?,
            included_primary_types: args.get_str_list("included_primary_types")?,
            excluded_primary_types: args.get_str_list("excluded_primary_types")?,
            language: Some(config.language(args.get_str("language"))),
            region: config.region(args.get_str("region")),
            max_results: validate_max_results(args)?,
            rank: args.get_str("rank").map(str::to_string),
        };
        debug!(lat, lng, radius = options.restriction.radius_meters, "places nearby search");

        let data = self.ctx.gateway.places_search_nearby(&options).await?;
        Ok(ToolResult::from_json(data))
    }

    fn get_parameters_schema(&self) -> Value {
        let (lat, lng) = lat_lng_schema();
        json!({
            "type": "object",
            "properties": {
                "radius_m": radius_schema("Search radius in meters"),
                "lat": lat,
                "lng": lng,
                "included_types": type_list_schema(MAX_TYPE_FILTERS, "Place types to include"),
                "excluded_types": type_list_schema(MAX_TYPE_FILTERS, "Place types to exclude"),
                "included_primary_types": type_list_schema(
                    MAX_PRIMARY_TYPE_FILTERS,
                    "Primary place types to include"
                ),
                "excluded_primary_types": type_list_schema(
                    MAX_PRIMARY_TYPE_FILTERS,
                    "Primary place types to exclude"
                ),
                "rank": {
                    "type": "string",
                    "enum": RANK_CHOICES,
                    "description": "Result ordering"
                },
                "language": language_schema(),
                "region": region_schema(),
                "max_results": max_results_schema()
            },
            "required": ["radius_m"]
        })
    }
}

/// Details (hours, phone, website) for a single place id
pub struct PlaceDetailsTool {
    ctx: MapsContext,
}

impl PlaceDetailsTool {
    pub fn new(ctx: MapsContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for PlaceDetailsTool {
    fn name(&self) -> &str {
        TOOL_PLACE_DETAILS
    }

    fn description(&self) -> &str {
        "Fetch details for a place id (hours, phone, website)"
    }

    fn signature(&self) -> &str {
        "gmaps_place_details --place_id=<id> [--language=<code>] [--region=<code>]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        let place_id = args.require_text("place_id")?;
        if place_id_from_resource(&place_id).trim().is_empty() {
            return Err(ToolError::invalid("'place_id' must name a place"));
        }
        validate_strings(args, &["language", "region"])
    }

    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let config = &self.ctx.config;
        let place_id = args.require_text("place_id")?;
        let language = config.language(args.get_str("language"));
        let region = config.region(args.get_str("region"));

        let details = self
            .ctx
            .gateway
            .place_details(&place_id, Some(&language), region.as_deref())
            .await?;
        Ok(ToolResult::from_json(details.into_value()))
    }

    fn get_parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "place_id": {
                    "type": "string",
                    "description": "Place id from a search result ('places/<id>' also accepted)"
                },
                "language": language_schema(),
                "region": region_schema()
            },
            "required": ["place_id"]
        })
    }
}
