//! Tools exposed over the RPC boundary.
//!
//! 1. `stratus_record_sample` - Appends a daily mean temperature
//! 2. `stratus_statistics` - Statistics for a location
//! 3. `stratus_cache_status` - Entity cache and statistic store counters

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::EntityCaches;
use crate::statistics::{StatisticStore, StatisticsService};
use crate::types::config::Config;

use super::protocol::{ToolDescription, ToolResult};

/// Parameters for `stratus_record_sample`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSampleParams {
    pub location: String,

    /// `YYYY-MM-DD`.
    pub date: String,

    pub temperature: f64,
}

/// Parameters for `stratus_statistics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsParams {
    pub location: String,
}

/// Dispatches tool calls to the statistics service and, when shared with a
/// `WeatherService`, its entity caches.
pub struct ToolHandler {
    caches: Option<Arc<EntityCaches>>,
    statistics: StatisticsService,
}

impl ToolHandler {
    /// Creates a handler over a fresh store and no entity caches.
    pub fn new(config: &Config) -> Self {
        let store = Arc::new(StatisticStore::new(&config.statistics));
        Self {
            caches: None,
            statistics: StatisticsService::new(store, &config.statistics),
        }
    }

    /// Creates a handler over the caches and store a `WeatherService` fills.
    pub fn with_state(caches: Arc<EntityCaches>, statistics: StatisticsService) -> Self {
        Self {
            caches: Some(caches),
            statistics,
        }
    }

    pub fn list_tools() -> Vec<ToolDescription> {
        vec![
            ToolDescription::new(
                "stratus_record_sample",
                "Records the mean temperature of a location for one day. The first sample for a location-day is kept.",
                json!({
                    "type": "object",
                    "properties": {
                        "location": { "type": "string", "description": "Location name" },
                        "date": { "type": "string", "description": "Day, YYYY-MM-DD" },
                        "temperature": { "type": "number", "description": "Mean daily temperature, °C" }
                    },
                    "required": ["location", "date", "temperature"]
                }),
            ),
            ToolDescription::new(
                "stratus_statistics",
                "Min, max, mean, standard deviation, median, mode and anomalies of a location's temperature history.",
                json!({
                    "type": "object",
                    "properties": {
                        "location": { "type": "string", "description": "Location name" }
                    },
                    "required": ["location"]
                }),
            ),
            ToolDescription::new(
                "stratus_cache_status",
                "Size of the statistic store, plus hit/miss counters of each entity cache when a weather service is attached.",
                json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            ),
        ]
    }

    pub fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolResult {
        tracing::info!(tool = name, "Processing tool call");

        match name {
            "stratus_record_sample" => self.handle_record_sample(arguments),
            "stratus_statistics" => self.handle_statistics(arguments),
            "stratus_cache_status" => self.handle_cache_status(),
            _ => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    fn handle_record_sample(&self, arguments: Value) -> ToolResult {
        let params: RecordSampleParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        match self
            .statistics
            .store()
            .record_raw(&params.location, &params.date, params.temperature)
        {
            Ok(inserted) => ToolResult::success(json!({ "inserted": inserted })),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    fn handle_statistics(&self, arguments: Value) -> ToolResult {
        let params: StatisticsParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        match self.statistics.get_statistics(&params.location) {
            Ok(stats) => match serde_json::to_value(&stats) {
                Ok(value) => ToolResult::success(value),
                Err(e) => ToolResult::error(format!("Failed to encode statistics: {}", e)),
            },
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    fn handle_cache_status(&self) -> ToolResult {
        let store = self.statistics.store();
        let mut status = json!({
            "statistics": {
                "samples": store.len(),
                "locations": store.locations(),
            }
        });

        if let Some(caches) = &self.caches {
            status["caches"] = json!(caches.stats());
        }

        ToolResult::success(status)
    }
}
