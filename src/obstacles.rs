use std::collections::HashMap;

use crate::rendering::CellAttr;
use crate::scheduler::{Control, Task};
use crate::world::World;

// Unique per spawn; identities are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObstacleId(u64);

// An active collidable bounding box. `row` is mutated every tick by the
// owning debris task; `column` is fixed at spawn. The `hit` flag is the
// collided marker of the two-phase removal: shooters only set it, the
// owning task removes the entry on its next resume.
pub struct Obstacle {
    pub id: ObstacleId,
    pub row: f64,
    pub column: f64,
    pub rows: u16,
    pub cols: u16,
    hit: bool,
}

impl Obstacle {
    pub fn overlaps(&self, row: f64, column: f64, rows: u16, cols: u16) -> bool {
        self.row < row + rows as f64
            && row < self.row + self.rows as f64
            && self.column < column + cols as f64
            && column < self.column + self.cols as f64
    }
}

// The shared set of active bounding boxes, keyed by identity for O(1)
// mark and removal.
pub struct ObstacleRegistry {
    obstacles: HashMap<ObstacleId, Obstacle>,
    next_id: u64,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        ObstacleRegistry { obstacles: HashMap::new(), next_id: 0 }
    }

    pub fn insert(&mut self, row: f64, column: f64, rows: u16, cols: u16) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.obstacles.insert(id, Obstacle { id, row, column, rows, cols, hit: false });
        id
    }

    // Idempotent: two shots landing on the same tick both mark without
    // conflict. A mark for an identity that already left the registry is
    // loud in test builds only.
    pub fn mark_hit(&mut self, id: ObstacleId) {
        match self.obstacles.get_mut(&id) {
            Some(obstacle) => obstacle.hit = true,
            None => debug_assert!(false, "collision mark for unknown obstacle {id:?}"),
        }
    }

    pub fn is_hit(&self, id: ObstacleId) -> bool {
        self.obstacles.get(&id).is_some_and(|obstacle| obstacle.hit)
    }

    // Moves an obstacle's box down in lockstep with its task's own row.
    pub fn advance(&mut self, id: ObstacleId, delta: f64) {
        if let Some(obstacle) = self.obstacles.get_mut(&id) {
            obstacle.row += delta;
        }
    }

    // Called exactly once per obstacle, by its owner.
    pub fn remove(&mut self, id: ObstacleId) {
        let removed = self.obstacles.remove(&id);
        debug_assert!(removed.is_some(), "double removal of obstacle {id:?}");
    }

    pub fn hit_test(&self, row: f64, column: f64, rows: u16, cols: u16) -> Option<ObstacleId> {
        self.obstacles
            .values()
            .find(|obstacle| obstacle.overlaps(row, column, rows, cols))
            .map(|obstacle| obstacle.id)
    }

    pub fn contains(&self, id: ObstacleId) -> bool {
        self.obstacles.contains_key(&id)
    }

    pub fn active_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

// --- Debug overlay ---

// Outlines every active bounding box each tick so the collision state can
// be eyeballed during headless runs.
pub struct ShowObstacles {
    drawn: Vec<(i32, i32, u16, u16)>,
}

impl ShowObstacles {
    pub fn new() -> Self {
        ShowObstacles { drawn: Vec::new() }
    }

    fn stamp(world: &mut World, row: i32, column: i32, rows: u16, cols: u16, erase: bool) {
        let bottom = row + rows as i32 + 1;
        let right = column + cols as i32 + 1;
        for r in row..=bottom {
            for c in column..=right {
                let on_horizontal = r == row || r == bottom;
                let on_vertical = c == column || c == right;
                if !on_horizontal && !on_vertical {
                    continue;
                }
                let glyph = if erase {
                    ' '
                } else if on_horizontal && on_vertical {
                    '+'
                } else if on_horizontal {
                    '-'
                } else {
                    '|'
                };
                world.canvas.put(r, c, glyph, CellAttr::Dim);
            }
        }
    }
}

impl Task for ShowObstacles {
    fn poll(&mut self, world: &mut World) -> Control {
        for (row, column, rows, cols) in std::mem::take(&mut self.drawn) {
            Self::stamp(world, row, column, rows, cols, true);
        }
        let boxes: Vec<(i32, i32, u16, u16)> = world
            .obstacles
            .active_obstacles()
            .map(|o| (o.row.round() as i32 - 1, o.column.round() as i32 - 1, o.rows, o.cols))
            .collect();
        for &(row, column, rows, cols) in &boxes {
            Self::stamp(world, row, column, rows, cols, false);
        }
        self.drawn = boxes;
        Control::Yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_covers_touching_and_disjoint_boxes() {
        let mut registry = ObstacleRegistry::new();
        let id = registry.insert(5.0, 10.0, 3, 4);
        let obstacle = registry.active_obstacles().next().unwrap();
        assert_eq!(obstacle.id, id);

        // Point inside.
        assert!(obstacle.overlaps(6.0, 11.0, 1, 1));
        // Corner cell.
        assert!(obstacle.overlaps(5.0, 10.0, 1, 1));
        // One row above, one column left: outside.
        assert!(!obstacle.overlaps(4.0, 10.0, 1, 1));
        assert!(!obstacle.overlaps(5.0, 9.0, 1, 1));
        // Box ending exactly where the obstacle starts does not overlap.
        assert!(!obstacle.overlaps(2.0, 10.0, 3, 1));
        // Larger box engulfing the obstacle.
        assert!(obstacle.overlaps(0.0, 0.0, 30, 30));
    }

    #[test]
    fn lifecycle_is_insert_then_single_removal() {
        let mut registry = ObstacleRegistry::new();
        let id = registry.insert(0.0, 3.0, 2, 2);
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        registry.remove(id);
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
        assert_eq!(registry.hit_test(0.0, 3.0, 2, 2), None);
    }

    #[test]
    fn identities_are_not_reused() {
        let mut registry = ObstacleRegistry::new();
        let first = registry.insert(0.0, 0.0, 1, 1);
        registry.remove(first);
        let second = registry.insert(0.0, 0.0, 1, 1);
        assert_ne!(first, second);
    }

    #[test]
    fn double_mark_is_idempotent() {
        let mut registry = ObstacleRegistry::new();
        let id = registry.insert(4.0, 4.0, 2, 2);

        // Two shots observing the same obstacle within one tick.
        registry.mark_hit(id);
        registry.mark_hit(id);
        assert!(registry.is_hit(id));

        // Still exactly one removal by the owner.
        registry.remove(id);
        assert!(!registry.contains(id));
        assert!(!registry.is_hit(id));
    }

    #[test]
    fn hit_test_finds_overlapping_box() {
        let mut registry = ObstacleRegistry::new();
        let id = registry.insert(8.0, 20.0, 4, 6);
        assert_eq!(registry.hit_test(9.0, 22.0, 1, 1), Some(id));
        assert_eq!(registry.hit_test(13.0, 22.0, 1, 1), None);
    }

    #[test]
    fn advance_moves_the_registry_box() {
        let mut registry = ObstacleRegistry::new();
        let id = registry.insert(0.0, 5.0, 2, 2);
        registry.advance(id, 0.5);
        registry.advance(id, 0.5);
        let obstacle = registry.active_obstacles().next().unwrap();
        assert_eq!(obstacle.row, 1.0);
        assert_eq!(registry.hit_test(2.0, 5.0, 1, 1), Some(id));
    }
}
