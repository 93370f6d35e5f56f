//! The static route and stop tables.
//!
//! A `Catalog` is built once at startup, validated eagerly, and treated
//! as read-only for the life of the process. Requests borrow it rather
//! than copying it, and because it never changes after construction it
//! can be shared across concurrent sessions without synchronization.

mod error;
mod matcher;
mod records;

pub use error::CatalogError;
pub use matcher::DEFAULT_MATCH_THRESHOLD;
pub use records::{RouteRecord, StopRecord};

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Direction, Route, RouteId, Stop, StopId};

/// Validated, immutable route and stop tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    routes: BTreeMap<RouteId, Route>,
    stops: BTreeMap<StopId, Stop>,
}

impl Catalog {
    /// Build a catalog, checking every cross-reference.
    ///
    /// Malformed data is rejected here rather than surfacing as a failed
    /// lookup in the middle of a refinement:
    ///
    /// - route and stop identifiers are unique;
    /// - a route's two directions are distinct;
    /// - a route's per-direction stop sets only reference known stops;
    /// - a stop's routes exist and list the stop in at least one
    ///   direction;
    /// - a stop's directions are each run by at least one serving route.
    pub fn new(routes: Vec<Route>, stops: Vec<Stop>) -> Result<Self, CatalogError> {
        let mut route_map = BTreeMap::new();
        for route in routes {
            if route.direction_0 == route.direction_1 {
                return Err(CatalogError::SameDirections(route.id));
            }
            let id = route.id;
            if route_map.insert(id, route).is_some() {
                return Err(CatalogError::DuplicateRoute(id));
            }
        }

        let mut stop_map = BTreeMap::new();
        for stop in stops {
            let id = stop.id;
            if stop_map.insert(id, stop).is_some() {
                return Err(CatalogError::DuplicateStop(id));
            }
        }

        for route in route_map.values() {
            for stop_id in route
                .direction_0_stop_ids
                .iter()
                .chain(route.direction_1_stop_ids.iter())
            {
                if !stop_map.contains_key(stop_id) {
                    return Err(CatalogError::UnknownStopInRoute {
                        route: route.id,
                        stop: *stop_id,
                    });
                }
            }
        }

        for stop in stop_map.values() {
            for route_id in &stop.route_ids {
                let Some(route) = route_map.get(route_id) else {
                    return Err(CatalogError::UnknownRouteAtStop {
                        stop: stop.id,
                        route: *route_id,
                    });
                };
                if !route.serves_stop(stop.id) {
                    return Err(CatalogError::RouteDoesNotServeStop {
                        stop: stop.id,
                        route: *route_id,
                    });
                }
            }
            for direction in &stop.directions {
                let served = stop
                    .route_ids
                    .iter()
                    .filter_map(|id| route_map.get(id))
                    .any(|route| route.serves_direction(*direction));
                if !served {
                    return Err(CatalogError::DirectionNotServedAtStop {
                        stop: stop.id,
                        direction: *direction,
                    });
                }
            }
        }

        Ok(Self {
            routes: route_map,
            stops: stop_map,
        })
    }

    /// Look up a route by id.
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(&id)
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    /// Every route identifier in the catalog.
    pub fn route_ids(&self) -> BTreeSet<RouteId> {
        self.routes.keys().copied().collect()
    }

    /// Every stop identifier in the catalog.
    pub fn stop_ids(&self) -> BTreeSet<StopId> {
        self.stops.keys().copied().collect()
    }

    /// The fixed direction vocabulary, in its fixed order.
    pub fn direction_vocabulary(&self) -> [Direction; 6] {
        Direction::ALL
    }

    /// Number of routes in the catalog.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of stops in the catalog.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
