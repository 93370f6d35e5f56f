//! Request refinement engine.
//!
//! This module implements the core algorithm that answers: "which
//! concrete departures does this ambiguous query mean?" Three candidate
//! sets (routes, directions, stops) are narrowed against each other
//! using the catalog's relational schema until nothing more can be ruled
//! out, then every consistent (route, direction, stop) combination is
//! enumerated.

mod request;
mod results;

pub use request::{Dimension, Request, RequestError};
pub use results::CountdownTarget;
