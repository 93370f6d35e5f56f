//! Stop types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Direction, RouteId};

/// A unique stop identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StopId(u32);

impl StopId {
    /// Creates a stop identifier.
    pub const fn new(id: u32) -> Self {
        StopId(id)
    }

    /// Returns the raw numeric identifier.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bus stop.
///
/// The route and direction sets are derived views of the route tables:
/// which routes serve this stop, and in which directions any of them
/// passes it. The catalog verifies both against the route records at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Unique stop identifier.
    pub id: StopId,
    /// Human-readable description shown in disambiguation menus.
    pub description: String,
    /// Routes that serve this stop.
    pub route_ids: BTreeSet<RouteId>,
    /// Directions in which any serving route passes this stop.
    pub directions: BTreeSet<Direction>,
}
