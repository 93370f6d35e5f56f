//! Record parsing for catalog data.
//!
//! The wire shape of the static tables. Every field is declared and
//! typed, so malformed data is rejected while the catalog is built
//! instead of on first access. Reading the table text from wherever it
//! lives (files, an HTTP fetch) is the caller's concern.

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Route, RouteId, Stop, StopId};

use super::{Catalog, CatalogError};

/// One route as it appears in the static route table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: RouteId,
    pub route_short_name: String,
    pub direction_0: Direction,
    pub direction_1: Direction,
    pub direction_0_stop_ids: Vec<StopId>,
    pub direction_1_stop_ids: Vec<StopId>,
}

/// One stop as it appears in the static stop table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: StopId,
    pub stop_desc: String,
    pub route_ids: Vec<RouteId>,
    pub directions: Vec<Direction>,
}

impl From<RouteRecord> for Route {
    fn from(record: RouteRecord) -> Self {
        Route {
            id: record.route_id,
            short_name: record.route_short_name,
            direction_0: record.direction_0,
            direction_1: record.direction_1,
            direction_0_stop_ids: record.direction_0_stop_ids.into_iter().collect(),
            direction_1_stop_ids: record.direction_1_stop_ids.into_iter().collect(),
        }
    }
}

impl From<StopRecord> for Stop {
    fn from(record: StopRecord) -> Self {
        Stop {
            id: record.stop_id,
            description: record.stop_desc,
            route_ids: record.route_ids.into_iter().collect(),
            directions: record.directions.into_iter().collect(),
        }
    }
}

impl Catalog {
    /// Build a catalog from parsed records.
    pub fn from_records(
        routes: Vec<RouteRecord>,
        stops: Vec<StopRecord>,
    ) -> Result<Self, CatalogError> {
        Catalog::new(
            routes.into_iter().map(Route::from).collect(),
            stops.into_iter().map(Stop::from).collect(),
        )
    }

    /// Build a catalog from JSON route and stop tables.
    ///
    /// Each argument is the text of one table: a JSON array of route or
    /// stop records.
    pub fn from_json(routes_json: &str, stops_json: &str) -> Result<Self, CatalogError> {
        let routes: Vec<RouteRecord> =
            serde_json::from_str(routes_json).map_err(|e| CatalogError::Json {
                message: e.to_string(),
            })?;
        let stops: Vec<StopRecord> =
            serde_json::from_str(stops_json).map_err(|e| CatalogError::Json {
                message: e.to_string(),
            })?;
        Catalog::from_records(routes, stops)
    }
}
