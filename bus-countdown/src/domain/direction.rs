//! The direction vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown direction label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {label}")]
pub struct InvalidDirection {
    label: String,
}

/// A traversal direction.
///
/// The vocabulary is fixed at six labels and is never extended at
/// runtime. Every route runs in exactly two of these; every stop is
/// served in some subset of them.
///
/// # Examples
///
/// ```
/// use bus_countdown::domain::Direction;
///
/// let d: Direction = "Inbound".parse().unwrap();
/// assert_eq!(d, Direction::Inbound);
/// assert_eq!(d.to_string(), "Inbound");
///
/// // Labels are case-sensitive
/// assert!("inbound".parse::<Direction>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Direction {
    Inbound,
    Outbound,
    North,
    South,
    East,
    West,
}

impl Direction {
    /// The full vocabulary, in its fixed order.
    pub const ALL: [Direction; 6] = [
        Direction::Inbound,
        Direction::Outbound,
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Returns the direction label as shown to riders.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "Inbound",
            Direction::Outbound => "Outbound",
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| InvalidDirection {
                label: s.to_string(),
            })
    }
}
