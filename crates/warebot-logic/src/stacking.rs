//! Stack placement math.
//!
//! A stack is not a stored entity: it is the set of items sharing a
//! `stack_id`, ordered by insertion. The placement height for the next item
//! depends only on how many items are already in the stack.

/// `(x, z)` base used for a stack that has no members yet.
pub const DEFAULT_STACK_BASE: (f64, f64) = (25.0, 10.0);

/// Height at which the next item lands on a stack that already holds
/// `height` items.
pub fn next_placement_y(height: usize) -> f64 {
    0.5 * (height as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_item_lands_at_half_a_unit() {
        assert_eq!(next_placement_y(0), 0.5);
    }

    #[test]
    fn placement_height_is_strictly_increasing() {
        let mut last = 0.0;
        for height in 0..10 {
            let y = next_placement_y(height);
            assert!(y > last, "y={y} at height {height} not above {last}");
            last = y;
        }
    }
}
