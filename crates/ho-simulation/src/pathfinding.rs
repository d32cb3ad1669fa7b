//! Breadth-first search over the wall grid.

use std::collections::{HashMap, HashSet, VecDeque};

use ho_core::{Cell, GridSize, World};

/// Static navigation data for one world: the grid bounds and the cells
/// permanently blocked by walls. The layout never changes after generation,
/// so this is built once and reused every tick.
#[derive(Debug, Clone)]
pub struct NavGrid {
    grid: GridSize,
    walls: HashSet<Cell>,
}

impl NavGrid {
    /// Capture the wall layout of a world.
    pub fn from_world(world: &World) -> Self {
        Self {
            grid: world.grid(),
            walls: world.wall_cells(),
        }
    }

    /// Grid dimensions.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Return `true` if a wall occupies the cell.
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    /// Shortest 4-connected path from `from` to `to`, both inclusive.
    ///
    /// Wall cells and every cell in `obstacles` are impassable. Neighbours are
    /// expanded east, west, south, north, so ties between equal-length paths
    /// always resolve the same way. Returns an empty path when the
    /// destination is unreachable, outside the grid, or blocked, or when the
    /// source itself sits in a wall.
    pub fn find_path(&self, from: Cell, to: Cell, obstacles: &HashSet<Cell>) -> Vec<Cell> {
        if self.is_wall(from) {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }

        let mut came_from: HashMap<Cell, Option<Cell>> = HashMap::new();
        let mut queue = VecDeque::new();
        came_from.insert(from, None);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut node = to;
                while let Some(&Some(prev)) = came_from.get(&node) {
                    path.push(prev);
                    node = prev;
                }
                path.reverse();
                return path;
            }

            for next in current.neighbors() {
                if !self.grid.contains(next)
                    || self.walls.contains(&next)
                    || obstacles.contains(&next)
                    || came_from.contains_key(&next)
                {
                    continue;
                }
                came_from.insert(next, Some(current));
                queue.push_back(next);
            }
        }

        Vec::new()
    }
}
