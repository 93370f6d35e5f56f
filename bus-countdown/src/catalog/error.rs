//! Catalog validation error types.

use crate::domain::{Direction, RouteId, StopId};

/// Errors raised while building a catalog.
///
/// A catalog either validates completely or is rejected: every variant is
/// a construction-time failure, so downstream code never encounters a
/// dangling cross-reference mid-refinement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two route records share an identifier
    #[error("duplicate route id {0}")]
    DuplicateRoute(RouteId),

    /// Two stop records share an identifier
    #[error("duplicate stop id {0}")]
    DuplicateStop(StopId),

    /// A route's two traversal directions must be distinct
    #[error("route {0} lists the same direction twice")]
    SameDirections(RouteId),

    /// A route's per-direction stop set references a stop that does not exist
    #[error("route {route} serves unknown stop {stop}")]
    UnknownStopInRoute { route: RouteId, stop: StopId },

    /// A stop's route set references a route that does not exist
    #[error("stop {stop} references unknown route {route}")]
    UnknownRouteAtStop { stop: StopId, route: RouteId },

    /// A stop claims a route that does not list it in either direction
    #[error("stop {stop} references route {route}, which does not serve it")]
    RouteDoesNotServeStop { stop: StopId, route: RouteId },

    /// A stop claims a direction none of its serving routes runs in
    #[error("stop {stop} claims direction {direction}, which no serving route runs in")]
    DirectionNotServedAtStop { stop: StopId, direction: Direction },

    /// Record data failed to parse
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
