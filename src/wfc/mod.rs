//! Constraint-based tile assignment.
//!
//! A single-pass wave function collapse: each target cell gets one tile that
//! agrees with every neighbour already assigned. There is no backtracking, so a
//! cell whose candidates run out is reported and left empty.

mod solver;

pub use solver::{filter, SolveEvent, SolveOutcome, SolverRun, TileConstraintSolver};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order in which cells are collapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Input order; only earlier neighbours constrain a cell.
    #[default]
    Sequential,
    /// Fewest candidates first, ties broken by input order.
    MinEntropy,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(SelectionPolicy::Sequential),
            "min_entropy" | "min-entropy" => Ok(SelectionPolicy::MinEntropy),
            other => Err(format!(
                "unknown policy '{other}', expected sequential or min-entropy"
            )),
        }
    }
}

/// How floor cells are grouped into solver jobs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WfcScope {
    /// One job over every floor cell with the `None` theme's tiles.
    #[default]
    Dungeon,
    /// One job per room with that room's theme, then one for the corridors.
    PerRoom,
}

impl FromStr for WfcScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dungeon" => Ok(WfcScope::Dungeon),
            "per_room" | "per-room" => Ok(WfcScope::PerRoom),
            other => Err(format!(
                "unknown scope '{other}', expected dungeon or per-room"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parses_both_spellings() {
        assert_eq!("min-entropy".parse::<SelectionPolicy>(), Ok(SelectionPolicy::MinEntropy));
        assert_eq!("min_entropy".parse::<SelectionPolicy>(), Ok(SelectionPolicy::MinEntropy));
        assert_eq!("sequential".parse::<SelectionPolicy>(), Ok(SelectionPolicy::Sequential));
        assert!("random".parse::<SelectionPolicy>().is_err());
    }

    #[test]
    fn test_scope_round_trips_through_json() {
        let json = serde_json::to_string(&WfcScope::PerRoom).unwrap();
        assert_eq!(json, "\"per_room\"");
        assert_eq!("per-room".parse::<WfcScope>(), Ok(WfcScope::PerRoom));
    }
}
