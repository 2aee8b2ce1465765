//! Axis-aligned box tests for the square entities in the arena.
//!
//! Every entity is a `size × size` square addressed by its top-left corner.

use arena_shared::config::WorldConfig;

/// Top-left corner of an entity's box, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// True iff the two boxes intersect with positive area.
/// Boxes that only share an edge or a corner do not overlap.
pub fn overlaps(a: Position, b: Position, size: f64) -> bool {
    a.x < b.x + size && a.x + size > b.x && a.y < b.y + size && a.y + size > b.y
}

/// Clamp a position so its box lies inside the world.
pub fn clamp(pos: Position, world: &WorldConfig) -> Position {
    Position {
        x: pos.x.clamp(0.0, world.max_x()),
        y: pos.y.clamp(0.0, world.max_y()),
    }
}

pub fn in_bounds(pos: Position, world: &WorldConfig) -> bool {
    (0.0..=world.max_x()).contains(&pos.x) && (0.0..=world.max_y()).contains(&pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f64 = 20.0;

    #[test]
    fn identical_boxes_overlap() {
        let p = Position::new(100.0, 100.0);
        assert!(overlaps(p, p, SIZE));
    }

    #[test]
    fn partial_overlap_detected_in_both_orders() {
        let a = Position::new(100.0, 100.0);
        let b = Position::new(110.0, 115.0);
        assert!(overlaps(a, b, SIZE));
        assert!(overlaps(b, a, SIZE));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Position::new(100.0, 100.0);
        assert!(!overlaps(a, Position::new(120.0, 100.0), SIZE));
        assert!(!overlaps(a, Position::new(80.0, 100.0), SIZE));
        assert!(!overlaps(a, Position::new(100.0, 120.0), SIZE));
        assert!(!overlaps(a, Position::new(100.0, 80.0), SIZE));
        // Corner contact
        assert!(!overlaps(a, Position::new(120.0, 120.0), SIZE));
    }

    #[test]
    fn separated_on_one_axis_is_enough() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(5.0, 300.0);
        assert!(!overlaps(a, b, SIZE));
    }

    #[test]
    fn clamp_keeps_inside_positions() {
        let world = WorldConfig::default();
        let p = Position::new(400.0, 300.0);
        assert_eq!(clamp(p, &world), p);
    }

    #[test]
    fn clamp_limits_every_side() {
        let world = WorldConfig::default();
        assert_eq!(clamp(Position::new(-5.0, -0.1), &world), Position::new(0.0, 0.0));
        assert_eq!(
            clamp(Position::new(790.0, 599.0), &world),
            Position::new(780.0, 580.0)
        );
        assert_eq!(
            clamp(Position::new(-3.0, 700.0), &world),
            Position::new(0.0, 580.0)
        );
    }

    #[test]
    fn clamped_positions_are_in_bounds() {
        let world = WorldConfig::default();
        for (x, y) in [(-100.0, 50.0), (1e6, -1e6), (780.0, 580.0), (0.0, 0.0)] {
            assert!(in_bounds(clamp(Position::new(x, y), &world), &world));
        }
        assert!(!in_bounds(Position::new(780.5, 0.0), &world));
    }
}
