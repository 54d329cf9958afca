//! Cost arithmetic shared by every action.
//!
//! Costs are whole numbers. Adjustments from cost modifiers are signed and
//! summed in `i64` with saturation; the final value is clamped to
//! [`MIN_ACTION_COST`] so that no edge in the search graph is ever free.

use foundry_types::Coord;

/// An action's incremental cost, or a plan's accumulated cost.
pub type Cost = u64;

/// Floor applied to every computed action cost.
pub const MIN_ACTION_COST: Cost = 1;

/// Base cost used when a descriptor omits one.
pub const DEFAULT_BASE_COST: i64 = 1;

/// Distance-based base cost for a move between two grid points.
pub fn movement_cost(from: Coord, to: Coord) -> Cost {
    from.manhattan(to)
}

/// Widen a cost into the signed domain used while applying adjustments.
pub fn to_signed(cost: Cost) -> i64 {
    i64::try_from(cost).unwrap_or(i64::MAX)
}

/// Clamp a raw (possibly negative) running cost to the cost floor.
pub fn clamp(raw: i64) -> Cost {
    Cost::try_from(raw).map_or(MIN_ACTION_COST, |c| c.max(MIN_ACTION_COST))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_enforces_floor() {
        assert_eq!(clamp(-40), 1);
        assert_eq!(clamp(0), 1);
        assert_eq!(clamp(1), 1);
        assert_eq!(clamp(15), 15);
    }

    #[test]
    fn to_signed_saturates() {
        assert_eq!(to_signed(7), 7);
        assert_eq!(to_signed(Cost::MAX), i64::MAX);
    }

    #[test]
    fn movement_cost_is_manhattan() {
        assert_eq!(movement_cost(Coord::new(0, 0), Coord::new(10, 5)), 15);
        assert_eq!(movement_cost(Coord::new(5, 0), Coord::new(2, 8)), 11);
    }
}
