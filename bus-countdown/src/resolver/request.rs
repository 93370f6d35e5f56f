//! The candidate-set snapshot and its narrowing operations.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, trace};

use crate::catalog::{Catalog, DEFAULT_MATCH_THRESHOLD};
use crate::domain::{Direction, Route, RouteId, Stop, StopId};

/// One of the three candidate dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Routes,
    Directions,
    Stops,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Routes => "routes",
            Dimension::Directions => "directions",
            Dimension::Stops => "stops",
        })
    }
}

/// Error from building or narrowing a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A candidate set emptied: the current constraints admit no
    /// interpretation at all. The caller must back out its last
    /// selection or start over; this is never retried automatically.
    #[error("no candidate {0} remain for this request")]
    EmptyCandidateSet(Dimension),

    /// A route id the catalog does not know
    #[error("unknown route {0}")]
    UnknownRoute(RouteId),

    /// A stop id the catalog does not know
    #[error("unknown stop {0}")]
    UnknownStop(StopId),
}

/// An immutable snapshot of the three candidate sets.
///
/// A request is seeded once per session from a free-text stop query,
/// then replaced (never mutated) by each narrowing or selection until
/// it is unambiguous enough to enumerate countdown targets for. All
/// three sets are non-empty, and every id is known to the catalog, by
/// construction.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    catalog: &'a Catalog,
    route_ids: BTreeSet<RouteId>,
    directions: BTreeSet<Direction>,
    stop_ids: BTreeSet<StopId>,
}

impl<'a> Request<'a> {
    /// Build a request from explicit candidate sets.
    ///
    /// A request with no possible interpretation is invalid, not a state
    /// to tolerate: any empty set fails with
    /// [`RequestError::EmptyCandidateSet`], and ids the catalog does not
    /// know are rejected up front.
    pub fn new(
        catalog: &'a Catalog,
        route_ids: BTreeSet<RouteId>,
        directions: BTreeSet<Direction>,
        stop_ids: BTreeSet<StopId>,
    ) -> Result<Self, RequestError> {
        if route_ids.is_empty() {
            return Err(RequestError::EmptyCandidateSet(Dimension::Routes));
        }
        if directions.is_empty() {
            return Err(RequestError::EmptyCandidateSet(Dimension::Directions));
        }
        if stop_ids.is_empty() {
            return Err(RequestError::EmptyCandidateSet(Dimension::Stops));
        }
        if let Some(id) = route_ids.iter().find(|id| catalog.route(**id).is_none()) {
            return Err(RequestError::UnknownRoute(*id));
        }
        if let Some(id) = stop_ids.iter().find(|id| catalog.stop(**id).is_none()) {
            return Err(RequestError::UnknownStop(*id));
        }

        Ok(Self {
            catalog,
            route_ids,
            directions,
            stop_ids,
        })
    }

    /// Seed a request from a free-text stop query.
    ///
    /// `route` and `direction`, when given, pin their dimensions to a
    /// single candidate; otherwise the full catalog route list and the
    /// full direction vocabulary start as candidates. The stop set is
    /// whatever fuzzy-matches the query at the default threshold, so a
    /// query matching no stop description fails here with
    /// [`RequestError::EmptyCandidateSet`].
    pub fn seed(
        catalog: &'a Catalog,
        stop_query: &str,
        route: Option<RouteId>,
        direction: Option<Direction>,
    ) -> Result<Self, RequestError> {
        let route_ids = match route {
            Some(id) => BTreeSet::from([id]),
            None => catalog.route_ids(),
        };
        let directions = match direction {
            Some(d) => BTreeSet::from([d]),
            None => catalog.direction_vocabulary().into_iter().collect(),
        };
        let stop_ids = catalog.fuzzy_match_stops(stop_query, DEFAULT_MATCH_THRESHOLD);
        Self::new(catalog, route_ids, directions, stop_ids)
    }

    /// The catalog this request draws from.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Current route candidates.
    pub fn route_ids(&self) -> &BTreeSet<RouteId> {
        &self.route_ids
    }

    /// Current direction candidates.
    pub fn directions(&self) -> &BTreeSet<Direction> {
        &self.directions
    }

    /// Current stop candidates.
    pub fn stop_ids(&self) -> &BTreeSet<StopId> {
        &self.stop_ids
    }

    /// Short names of the candidate routes, in set order, for
    /// disambiguation menus.
    pub fn route_names(&self) -> Vec<&'a str> {
        self.candidate_routes()
            .map(|route| route.short_name.as_str())
            .collect()
    }

    /// Descriptions of the candidate stops, in set order, for
    /// disambiguation menus.
    pub fn stop_descriptions(&self) -> Vec<&'a str> {
        self.candidate_stops()
            .map(|stop| stop.description.as_str())
            .collect()
    }

    /// A cheap lower bound on how many distinct interpretations remain.
    ///
    /// A shell keeps prompting for one more dimension while this exceeds
    /// the ambiguity it is willing to present.
    pub fn min_results(&self) -> usize {
        self.route_ids
            .len()
            .max(self.directions.len())
            .max(self.stop_ids.len())
    }

    pub(crate) fn candidate_routes(&self) -> impl Iterator<Item = &'a Route> + '_ {
        let catalog = self.catalog;
        self.route_ids.iter().filter_map(move |id| catalog.route(*id))
    }

    pub(crate) fn candidate_stops(&self) -> impl Iterator<Item = &'a Stop> + '_ {
        let catalog = self.catalog;
        self.stop_ids.iter().filter_map(move |id| catalog.stop(*id))
    }

    /// Pin the route dimension to a single choice.
    ///
    /// The replacement is fed straight through [`Request::refine_all`],
    /// so a route inconsistent with the current stops or directions
    /// fails here rather than lingering until the next refinement.
    pub fn select_route(&self, route_id: RouteId) -> Result<Self, RequestError> {
        Self::new(
            self.catalog,
            BTreeSet::from([route_id]),
            self.directions.clone(),
            self.stop_ids.clone(),
        )?
        .refine_all()
    }

    /// Pin the direction dimension to a single choice.
    pub fn select_direction(&self, direction: Direction) -> Result<Self, RequestError> {
        Self::new(
            self.catalog,
            self.route_ids.clone(),
            BTreeSet::from([direction]),
            self.stop_ids.clone(),
        )?
        .refine_all()
    }

    /// Pin the stop dimension to a single choice.
    pub fn select_stop(&self, stop_id: StopId) -> Result<Self, RequestError> {
        Self::new(
            self.catalog,
            self.route_ids.clone(),
            self.directions.clone(),
            BTreeSet::from([stop_id]),
        )?
        .refine_all()
    }

    /// Narrow the route set to routes serving at least one candidate stop.
    pub fn refine_routes_with_stops(&self) -> Result<Self, RequestError> {
        let stop_routes: BTreeSet<RouteId> = self
            .candidate_stops()
            .flat_map(|stop| stop.route_ids.iter().copied())
            .collect();
        let narrowed: BTreeSet<RouteId> =
            self.route_ids.intersection(&stop_routes).copied().collect();
        trace!(
            before = self.route_ids.len(),
            after = narrowed.len(),
            "narrowed routes by stops"
        );
        Self::new(
            self.catalog,
            narrowed,
            self.directions.clone(),
            self.stop_ids.clone(),
        )
    }

    /// Narrow the route set to routes running in at least one candidate
    /// direction.
    pub fn refine_routes_with_directions(&self) -> Result<Self, RequestError> {
        let narrowed: BTreeSet<RouteId> = self
            .candidate_routes()
            .filter(|route| {
                route
                    .directions()
                    .iter()
                    .any(|d| self.directions.contains(d))
            })
            .map(|route| route.id)
            .collect();
        trace!(
            before = self.route_ids.len(),
            after = narrowed.len(),
            "narrowed routes by directions"
        );
        Self::new(
            self.catalog,
            narrowed,
            self.directions.clone(),
            self.stop_ids.clone(),
        )
    }

    /// Narrow the direction set to directions some candidate route runs in.
    pub fn refine_directions_with_routes(&self) -> Result<Self, RequestError> {
        let route_directions: BTreeSet<Direction> = self
            .candidate_routes()
            .flat_map(|route| route.directions())
            .collect();
        let narrowed: BTreeSet<Direction> = self
            .directions
            .intersection(&route_directions)
            .copied()
            .collect();
        trace!(
            before = self.directions.len(),
            after = narrowed.len(),
            "narrowed directions by routes"
        );
        Self::new(
            self.catalog,
            self.route_ids.clone(),
            narrowed,
            self.stop_ids.clone(),
        )
    }

    /// Narrow the direction set to directions some candidate stop is
    /// served in.
    pub fn refine_directions_with_stops(&self) -> Result<Self, RequestError> {
        let stop_directions: BTreeSet<Direction> = self
            .candidate_stops()
            .flat_map(|stop| stop.directions.iter().copied())
            .collect();
        let narrowed: BTreeSet<Direction> = self
            .directions
            .intersection(&stop_directions)
            .copied()
            .collect();
        trace!(
            before = self.directions.len(),
            after = narrowed.len(),
            "narrowed directions by stops"
        );
        Self::new(
            self.catalog,
            self.route_ids.clone(),
            narrowed,
            self.stop_ids.clone(),
        )
    }

    /// Narrow the stop set to stops some candidate route serves, in
    /// either of its directions.
    pub fn refine_stops_with_routes(&self) -> Result<Self, RequestError> {
        let route_stops: BTreeSet<StopId> = self
            .candidate_routes()
            .flat_map(|route| route.all_stop_ids())
            .collect();
        let narrowed: BTreeSet<StopId> =
            self.stop_ids.intersection(&route_stops).copied().collect();
        trace!(
            before = self.stop_ids.len(),
            after = narrowed.len(),
            "narrowed stops by routes"
        );
        Self::new(
            self.catalog,
            self.route_ids.clone(),
            self.directions.clone(),
            narrowed,
        )
    }

    /// Narrow the stop set to stops served in at least one candidate
    /// direction.
    pub fn refine_stops_with_directions(&self) -> Result<Self, RequestError> {
        let narrowed: BTreeSet<StopId> = self
            .candidate_stops()
            .filter(|stop| stop.directions.iter().any(|d| self.directions.contains(d)))
            .map(|stop| stop.id)
            .collect();
        trace!(
            before = self.stop_ids.len(),
            after = narrowed.len(),
            "narrowed stops by directions"
        );
        Self::new(
            self.catalog,
            self.route_ids.clone(),
            self.directions.clone(),
            narrowed,
        )
    }

    /// One pass of the six narrowing operations, in a fixed order.
    ///
    /// Cheaper than [`Request::refine_all`], and sufficient for most
    /// realistic one-shot queries, but not guaranteed to reach the fixed
    /// point: a late step can newly disqualify candidates that only an
    /// earlier, already-run step would remove.
    pub fn refine_once(&self) -> Result<Self, RequestError> {
        self.refine_routes_with_stops()?
            .refine_directions_with_stops()?
            .refine_routes_with_directions()?
            .refine_stops_with_directions()?
            .refine_directions_with_routes()?
            .refine_stops_with_routes()
    }

    /// Narrow every candidate set until none can shrink further.
    ///
    /// Each operation only ever shrinks its target set, and the
    /// non-empty invariant bounds every set below by 1, so iteration
    /// terminates; the resulting fixed point does not depend on the
    /// order the operations run in.
    pub fn refine_all(&self) -> Result<Self, RequestError> {
        let mut current = self.clone();
        let mut passes = 0usize;
        loop {
            let next = current.refine_once()?;
            passes += 1;
            let converged = next.route_ids.len() == current.route_ids.len()
                && next.directions.len() == current.directions.len()
                && next.stop_ids.len() == current.stop_ids.len();
            current = next;
            if converged {
                break;
            }
        }
        debug!(
            passes,
            routes = current.route_ids.len(),
            directions = current.directions.len(),
            stops = current.stop_ids.len(),
            "request refined to fixed point"
        );
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Route, Stop};

    fn route(id: u32, d0: Direction, s0: &[u32], d1: Direction, s1: &[u32]) -> Route {
        Route {
            id: RouteId::new(id),
            short_name: id.to_string(),
            direction_0: d0,
            direction_1: d1,
            direction_0_stop_ids: s0.iter().copied().map(StopId::new).collect(),
            direction_1_stop_ids: s1.iter().copied().map(StopId::new).collect(),
        }
    }

    fn stop(id: u32, desc: &str, routes: &[u32], dirs: &[Direction]) -> Stop {
        Stop {
            id: StopId::new(id),
            description: desc.to_string(),
            route_ids: routes.iter().copied().map(RouteId::new).collect(),
            directions: dirs.iter().copied().collect(),
        }
    }

    fn route_set(ids: &[u32]) -> BTreeSet<RouteId> {
        ids.iter().copied().map(RouteId::new).collect()
    }

    fn stop_set(ids: &[u32]) -> BTreeSet<StopId> {
        ids.iter().copied().map(StopId::new).collect()
    }

    fn direction_set(dirs: &[Direction]) -> BTreeSet<Direction> {
        dirs.iter().copied().collect()
    }

    /// Route 1 runs Inbound {10, 20, 30} / Outbound {30, 40}; route 2
    /// runs North {10} / South {}.
    fn fixture() -> Catalog {
        use Direction::*;
        Catalog::new(
            vec![
                route(1, Inbound, &[10, 20, 30], Outbound, &[30, 40]),
                route(2, North, &[10], South, &[]),
            ],
            vec![
                stop(10, "Kennedy Plaza", &[1, 2], &[Inbound, North]),
                stop(20, "Broad St at Colfax Ave", &[1], &[Inbound]),
                stop(30, "Elmwood Ave at Park St", &[1], &[Inbound, Outbound]),
                stop(40, "Prairie Ave at Thurbers Ave", &[1], &[Outbound]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn seed_defaults_to_full_candidate_sets() {
        let catalog = fixture();
        let request = Request::seed(&catalog, "Kennedy Plaza", None, None).unwrap();

        assert_eq!(request.route_ids(), &route_set(&[1, 2]));
        assert_eq!(request.directions().len(), 6);
        assert_eq!(request.stop_ids(), &stop_set(&[10]));
    }

    #[test]
    fn seed_pins_route_and_direction_when_given() {
        let catalog = fixture();
        let request = Request::seed(
            &catalog,
            "Kennedy Plaza",
            Some(RouteId::new(1)),
            Some(Direction::Inbound),
        )
        .unwrap();

        assert_eq!(request.route_ids(), &route_set(&[1]));
        assert_eq!(request.directions(), &direction_set(&[Direction::Inbound]));
        assert_eq!(request.stop_ids(), &stop_set(&[10]));
    }

    #[test]
    fn seed_fails_when_no_stop_matches() {
        let catalog = fixture();
        let err = Request::seed(&catalog, "zzzz", None, None).unwrap_err();
        assert_eq!(err, RequestError::EmptyCandidateSet(Dimension::Stops));
    }

    #[test]
    fn new_rejects_each_empty_dimension() {
        let catalog = fixture();

        let err = Request::new(
            &catalog,
            BTreeSet::new(),
            direction_set(&Direction::ALL),
            stop_set(&[10]),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::EmptyCandidateSet(Dimension::Routes));

        let err = Request::new(&catalog, route_set(&[1]), BTreeSet::new(), stop_set(&[10]))
            .unwrap_err();
        assert_eq!(err, RequestError::EmptyCandidateSet(Dimension::Directions));

        let err = Request::new(
            &catalog,
            route_set(&[1]),
            direction_set(&Direction::ALL),
            BTreeSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::EmptyCandidateSet(Dimension::Stops));
    }

    #[test]
    fn new_rejects_unknown_ids() {
        let catalog = fixture();

        let err = Request::new(
            &catalog,
            route_set(&[99]),
            direction_set(&Direction::ALL),
            stop_set(&[10]),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::UnknownRoute(RouteId::new(99)));

        let err = Request::new(
            &catalog,
            route_set(&[1]),
            direction_set(&Direction::ALL),
            stop_set(&[99]),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::UnknownStop(StopId::new(99)));
    }

    #[test]
    fn routes_narrow_to_those_serving_a_candidate_stop() {
        let catalog = fixture();
        let request = Request::new(
            &catalog,
            route_set(&[1, 2]),
            direction_set(&Direction::ALL),
            stop_set(&[40]),
        )
        .unwrap();

        let narrowed = request.refine_routes_with_stops().unwrap();
        assert_eq!(narrowed.route_ids(), &route_set(&[1]));
        // The other two dimensions are untouched
        assert_eq!(narrowed.directions(), request.directions());
        assert_eq!(narrowed.stop_ids(), request.stop_ids());
    }

    #[test]
    fn directions_narrow_to_those_served_at_a_candidate_stop() {
        let catalog = fixture();
        let request = Request::new(
            &catalog,
            route_set(&[1, 2]),
            direction_set(&Direction::ALL),
            stop_set(&[40]),
        )
        .unwrap();

        let narrowed = request.refine_directions_with_stops().unwrap();
        assert_eq!(narrowed.directions(), &direction_set(&[Direction::Outbound]));
    }

    #[test]
    fn stops_narrow_to_those_served_in_a_candidate_direction() {
        let catalog = fixture();
        let request = Request::new(
            &catalog,
            route_set(&[1, 2]),
            direction_set(&[Direction::Outbound]),
            stop_set(&[10, 20, 30, 40]),
        )
        .unwrap();

        let narrowed = request.refine_stops_with_directions().unwrap();
        assert_eq!(narrowed.stop_ids(), &stop_set(&[30, 40]));
    }

    #[test]
    fn narrowing_to_nothing_is_an_error() {
        let catalog = fixture();
        // Route 2 never serves stop 40
        let request = Request::new(
            &catalog,
            route_set(&[2]),
            direction_set(&Direction::ALL),
            stop_set(&[40]),
        )
        .unwrap();

        let err = request.refine_routes_with_stops().unwrap_err();
        assert_eq!(err, RequestError::EmptyCandidateSet(Dimension::Routes));
    }

    #[test]
    fn full_query_converges_to_both_serving_routes() {
        let catalog = fixture();
        let request = Request::seed(&catalog, "Kennedy Plaza", None, None).unwrap();
        let refined = request.refine_all().unwrap();

        assert_eq!(refined.route_ids(), &route_set(&[1, 2]));
        assert_eq!(
            refined.directions(),
            &direction_set(&[Direction::Inbound, Direction::North])
        );
        assert_eq!(refined.stop_ids(), &stop_set(&[10]));
        assert_eq!(refined.min_results(), 2);

        // The seed request itself is untouched
        assert_eq!(request.directions().len(), 6);
    }

    #[test]
    fn selecting_an_incompatible_direction_fails() {
        let catalog = fixture();
        let request = Request::seed(&catalog, "Kennedy Plaza", None, None)
            .unwrap()
            .refine_all()
            .unwrap();

        let on_route_1 = request.select_route(RouteId::new(1)).unwrap();
        assert_eq!(on_route_1.route_ids(), &route_set(&[1]));
        assert_eq!(
            on_route_1.directions(),
            &direction_set(&[Direction::Inbound])
        );

        // Route 1 never runs North
        let err = request
            .select_route(RouteId::new(1))
            .unwrap()
            .select_direction(Direction::North)
            .unwrap_err();
        assert_eq!(err, RequestError::EmptyCandidateSet(Dimension::Routes));
    }

    #[test]
    fn selecting_an_unknown_route_fails() {
        let catalog = fixture();
        let request = Request::seed(&catalog, "Kennedy Plaza", None, None).unwrap();
        let err = request.select_route(RouteId::new(99)).unwrap_err();
        assert_eq!(err, RequestError::UnknownRoute(RouteId::new(99)));
    }

    #[test]
    fn select_stop_narrows_the_other_dimensions() {
        let catalog = fixture();
        let request = Request::new(
            &catalog,
            route_set(&[1, 2]),
            direction_set(&Direction::ALL),
            stop_set(&[10, 20, 30, 40]),
        )
        .unwrap();

        let selected = request.select_stop(StopId::new(20)).unwrap();
        assert_eq!(selected.stop_ids(), &stop_set(&[20]));
        assert_eq!(selected.route_ids(), &route_set(&[1]));
        assert_eq!(selected.directions(), &direction_set(&[Direction::Inbound]));
        assert_eq!(selected.min_results(), 1);
    }

    #[test]
    fn labels_follow_set_order() {
        let catalog = fixture();
        let request = Request::new(
            &catalog,
            route_set(&[1, 2]),
            direction_set(&Direction::ALL),
            stop_set(&[10, 30]),
        )
        .unwrap();

        assert_eq!(request.route_names(), vec!["1", "2"]);
        assert_eq!(
            request.stop_descriptions(),
            vec!["Kennedy Plaza", "Elmwood Ave at Park St"]
        );
    }

    /// Route 7 runs East {70} / West {80}; route 8 runs West {90} /
    /// North {}. With directions pinned to West and stops {70, 90}, one
    /// fixed-order pass drops stop 70 after the route steps already ran,
    /// leaving route 7 alive with no supporting stop.
    fn cross_fixture() -> Catalog {
        use Direction::*;
        Catalog::new(
            vec![
                route(7, East, &[70], West, &[80]),
                route(8, West, &[90], North, &[]),
            ],
            vec![
                stop(70, "Eastbound Loop", &[7], &[East]),
                stop(80, "Westbound Turn", &[7], &[West]),
                stop(90, "Harbor View", &[8], &[West]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn single_pass_can_stop_short_of_the_fixed_point() {
        let catalog = cross_fixture();
        let request = Request::new(
            &catalog,
            route_set(&[7, 8]),
            direction_set(&[Direction::West]),
            stop_set(&[70, 90]),
        )
        .unwrap();

        let once = request.refine_once().unwrap();
        assert_eq!(once.route_ids(), &route_set(&[7, 8]));
        assert_eq!(once.stop_ids(), &stop_set(&[90]));

        let fixed = request.refine_all().unwrap();
        assert_eq!(fixed.route_ids(), &route_set(&[8]));
        assert_eq!(fixed.stop_ids(), &stop_set(&[90]));
        assert_eq!(fixed.directions(), &direction_set(&[Direction::West]));
    }
}
