//! Route types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Direction, StopId};

/// A unique route identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RouteId(u32);

impl RouteId {
    /// Creates a route identifier.
    pub const fn new(id: u32) -> Self {
        RouteId(id)
    }

    /// Returns the raw numeric identifier.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bus route.
///
/// A route runs in exactly two traversal directions, each serving its own
/// set of stops. Order within a stop set is irrelevant. The catalog
/// guarantees at construction that the two directions are distinct and
/// that every referenced stop exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Unique route identifier.
    pub id: RouteId,
    /// Short display name (e.g. "60" or "R-Line").
    pub short_name: String,
    /// First traversal direction.
    pub direction_0: Direction,
    /// Second traversal direction, distinct from the first.
    pub direction_1: Direction,
    /// Stops served in `direction_0`.
    pub direction_0_stop_ids: BTreeSet<StopId>,
    /// Stops served in `direction_1`.
    pub direction_1_stop_ids: BTreeSet<StopId>,
}

impl Route {
    /// Both traversal directions, `direction_0` first.
    pub fn directions(&self) -> [Direction; 2] {
        [self.direction_0, self.direction_1]
    }

    /// Does this route run in the given direction?
    pub fn serves_direction(&self, direction: Direction) -> bool {
        self.direction_0 == direction || self.direction_1 == direction
    }

    /// The stop set for one of this route's directions.
    ///
    /// Returns `None` for a direction the route does not run in.
    pub fn stops_in(&self, direction: Direction) -> Option<&BTreeSet<StopId>> {
        if direction == self.direction_0 {
            Some(&self.direction_0_stop_ids)
        } else if direction == self.direction_1 {
            Some(&self.direction_1_stop_ids)
        } else {
            None
        }
    }

    /// Every stop this route serves, in either direction.
    pub fn all_stop_ids(&self) -> BTreeSet<StopId> {
        self.direction_0_stop_ids
            .union(&self.direction_1_stop_ids)
            .copied()
            .collect()
    }

    /// Does this route serve the given stop in either direction?
    pub fn serves_stop(&self, stop: StopId) -> bool {
        self.direction_0_stop_ids.contains(&stop) || self.direction_1_stop_ids.contains(&stop)
    }
}
