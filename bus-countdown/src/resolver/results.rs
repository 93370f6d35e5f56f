//! Enumeration of concrete countdown targets.

use std::fmt;

use crate::domain::{Direction, Route, Stop};

use super::Request;

/// A fully resolved (route, direction, stop) combination.
///
/// Each target is mutually consistent with the catalog schema: the
/// direction is one the route runs in, and the stop is served by that
/// route in that direction. A live countdown is fetched per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTarget<'a> {
    pub route: &'a Route,
    pub direction: Direction,
    pub stop: &'a Stop,
}

impl fmt::Display for CountdownTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} to {}",
            self.route.short_name, self.direction, self.stop.description
        )
    }
}

impl<'a> Request<'a> {
    /// Every (route, direction, stop) combination consistent with the
    /// current candidate sets.
    ///
    /// Routes are visited in set order, each route's `direction_0`
    /// before its `direction_1`; triples are unique by construction (a
    /// route's two directions are distinct), so no deduplication is
    /// done. An empty vector means the candidate sets, though each
    /// non-empty, share no consistent triple: "no matching departures",
    /// a normal outcome distinct from an empty candidate set.
    pub fn results(&self) -> Vec<CountdownTarget<'a>> {
        let catalog = self.catalog();
        let mut targets = Vec::new();

        for route in self.candidate_routes() {
            let legs = [
                (route.direction_0, &route.direction_0_stop_ids),
                (route.direction_1, &route.direction_1_stop_ids),
            ];
            for (direction, stop_set) in legs {
                if !self.directions().contains(&direction) {
                    continue;
                }
                for stop_id in stop_set.intersection(self.stop_ids()) {
                    if let Some(stop) = catalog.stop(*stop_id) {
                        targets.push(CountdownTarget {
                            route,
                            direction,
                            stop,
                        });
                    }
                }
            }
        }

        targets
    }
}
