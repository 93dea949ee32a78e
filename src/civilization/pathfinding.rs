//! Weighted A* routing over the movement cost grid.
//!
//! 8-directional movement; a diagonal step costs sqrt(2) times the target
//! cell's cost. The heuristic is straight-line distance, which is admissible
//! because every passable cell costs at least 1 per step. No path yields an
//! empty result: roads are opportunistic, not guaranteed.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::civilization::movement::IMPASSABLE_COST;
use crate::tilemap::Tilemap;

const DIAGONAL_FACTOR: f32 = 1.414;

/// Open-set entry ordered by lowest estimated total cost
struct PathNode {
    x: usize,
    y: usize,
    g: f32,
    f: f32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert to pop the cheapest node first.
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(x: usize, y: usize, goal_x: usize, goal_y: usize) -> f32 {
    let dx = goal_x as f32 - x as f32;
    let dy = goal_y as f32 - y as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Find a route between two cells. Returns the inclusive cell path from start
/// to goal, or an empty vector when the goal is unreachable.
pub fn find_path(
    costs: &Tilemap<f32>,
    start: (usize, usize),
    goal: (usize, usize),
) -> Vec<(usize, usize)> {
    let mut open_set = BinaryHeap::new();
    let mut closed_set: HashSet<(usize, usize)> = HashSet::new();
    let mut came_from: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    let mut g_score: HashMap<(usize, usize), f32> = HashMap::new();

    g_score.insert(start, 0.0);
    open_set.push(PathNode {
        x: start.0,
        y: start.1,
        g: 0.0,
        f: heuristic(start.0, start.1, goal.0, goal.1),
    });

    while let Some(current) = open_set.pop() {
        let pos = (current.x, current.y);

        if pos == goal {
            return reconstruct_path(&came_from, pos);
        }

        if !closed_set.insert(pos) {
            continue; // Stale heap entry
        }

        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let nx = current.x as i32 + dx;
                let ny = current.y as i32 + dy;
                if !costs.in_bounds(nx, ny) {
                    continue;
                }
                let neighbor = (nx as usize, ny as usize);
                if closed_set.contains(&neighbor) {
                    continue;
                }

                let cell_cost = *costs.get(neighbor.0, neighbor.1);
                if cell_cost > IMPASSABLE_COST {
                    continue;
                }

                let step_factor = if dx != 0 && dy != 0 { DIAGONAL_FACTOR } else { 1.0 };
                let tentative_g = current.g + cell_cost * step_factor;

                if tentative_g < *g_score.get(&neighbor).unwrap_or(&f32::INFINITY) {
                    g_score.insert(neighbor, tentative_g);
                    came_from.insert(neighbor, pos);
                    open_set.push(PathNode {
                        x: neighbor.0,
                        y: neighbor.1,
                        g: tentative_g,
                        f: tentative_g + heuristic(neighbor.0, neighbor.1, goal.0, goal.1),
                    });
                }
            }
        }
    }

    Vec::new()
}

fn reconstruct_path(
    came_from: &HashMap<(usize, usize), (usize, usize)>,
    goal: (usize, usize),
) -> Vec<(usize, usize)> {
    let mut path = vec![goal];
    let mut pos = goal;
    while let Some(&prev) = came_from.get(&pos) {
        path.push(prev);
        pos = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_shortcut_on_uniform_grid() {
        let costs = Tilemap::new_with(5, 5, 1.0f32);
        let path = find_path(&costs, (0, 0), (4, 4));

        // Chebyshev distance 4 plus the start cell: the diagonal is cheapest.
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(4, 4)));
    }

    #[test]
    fn test_full_barrier_yields_empty_path() {
        let mut costs = Tilemap::new_with(7, 7, 1.0f32);
        for x in 0..7 {
            costs.set(x, 3, 999.0);
        }

        let path = find_path(&costs, (3, 0), (3, 6));
        assert!(path.is_empty());
    }

    #[test]
    fn test_route_avoids_expensive_cells() {
        // A cheap corridor along the top row beats a straight line through
        // heavy terrain.
        let mut costs = Tilemap::new_with(9, 3, 50.0f32);
        for x in 0..9 {
            costs.set(x, 0, 1.0);
        }
        costs.set(0, 1, 1.0);
        costs.set(8, 1, 1.0);

        let path = find_path(&costs, (0, 2), (8, 2));
        assert!(!path.is_empty());
        assert!(path.iter().filter(|&&(_, y)| y == 0).count() >= 5);
    }

    #[test]
    fn test_start_equals_goal() {
        let costs = Tilemap::new_with(3, 3, 1.0f32);
        let path = find_path(&costs, (1, 1), (1, 1));
        assert_eq!(path, vec![(1, 1)]);
    }
}
