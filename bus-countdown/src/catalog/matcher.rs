//! Fuzzy stop matching.
//!
//! The entry point of a countdown query: free text is compared against
//! every stop description, and the stops scoring at or above a threshold
//! seed the stop candidate set. Matching itself never fails; an empty
//! match set is caught when the request checks its stop set for
//! non-emptiness.

use std::collections::BTreeSet;

use crate::domain::StopId;

use super::Catalog;

/// Similarity threshold used when seeding a request from free text.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

impl Catalog {
    /// Stops whose description scores at least `threshold` against `query`.
    ///
    /// Scores are Jaro-Winkler similarity in [0, 1]: identical strings
    /// score 1.0, and the comparison is case-sensitive. There is no cap on
    /// the match count: a permissive threshold can return most of the
    /// catalog, relying on refinement and disambiguation to narrow it.
    pub fn fuzzy_match_stops(&self, query: &str, threshold: f64) -> BTreeSet<StopId> {
        self.stops
            .iter()
            .filter(|(_, stop)| strsim::jaro_winkler(&stop.description, query) >= threshold)
            .map(|(id, _)| *id)
            .collect()
    }
}
