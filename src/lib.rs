use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
    fmt::{Display, Formatter},
};

use derive_more::Display;
use derive_new::new;
use log::debug;
use serde::{Deserialize, Serialize};

pub mod load;
pub mod store;

pub use load::load_grid;
pub use store::store_grid;

#[derive(Debug, Display)]
pub enum FindPathError {
    #[display(fmt = "Start out of bounds")]
    StartOutOfBounds,
    #[display(fmt = "Goal out of bounds")]
    GoalOutOfBounds,
}

#[derive(Debug, Display)]
pub enum FindDistancesError {
    #[display(fmt = "Start out of bounds")]
    StartOutOfBounds,
    #[display(fmt = "Ends unreachable: {:?}", _0)]
    EndsUnreachable(Vec<Point>),
}

pub struct PlannerGrid {
    walkable: Vec<Vec<bool>>,
}

impl PlannerGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            walkable: vec![vec![true; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.walkable.len()
    }

    pub fn cols(&self) -> usize {
        self.walkable.first().map_or(0, Vec::len)
    }

    /**
     * Marks a cell as an obstacle.  Idempotent.
     * Out-of-bounds coordinates are ignored; returns whether the cell was in bounds.
     */
    pub fn set_obstacle(&mut self, row: i32, col: i32) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }

        self.walkable[row as usize][col as usize] = false;
        true
    }

    pub fn is_walkable(&self, point: &Point) -> bool {
        self.in_bounds(point.row, point.col)
            && self.walkable[point.row as usize][point.col as usize]
    }

    /**
     * Returns a shortest path inclusive of both start and goal.  Uses A*.
     * None if either endpoint is an obstacle or no path exists.
     * Err if start or goal is out of bounds.
     */
    pub fn find_path(
        &self,
        start: &Point,
        goal: &Point,
    ) -> Result<Option<Vec<Point>>, FindPathError> {
        if !self.in_bounds(start.row, start.col) {
            return Err(FindPathError::StartOutOfBounds);
        }

        if !self.in_bounds(goal.row, goal.col) {
            return Err(FindPathError::GoalOutOfBounds);
        }

        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return Ok(None);
        }

        Ok(self.astar(start, goal))
    }

    /**
     * Returns a map of points to distances from start.  Uses BFS.
     * Err if start is out of bounds or if an end is unreachable.
     */
    pub fn find_distances(
        &self,
        start: &Point,
        ends: Vec<Point>,
    ) -> Result<Vec<(Point, i32)>, FindDistancesError> {
        if !self.in_bounds(start.row, start.col) {
            return Err(FindDistancesError::StartOutOfBounds);
        }

        let mut ends = ends.iter().collect::<HashSet<&Point>>();

        let mut distances = Vec::new();

        let mut frontier = Vec::new();
        let mut seen = HashSet::new();
        if self.is_walkable(start) {
            frontier.push(*start);
            seen.insert(*start);
        }

        let mut distance = 0;

        while !frontier.is_empty() {
            let mut next_frontier = Vec::new();
            for point in frontier {
                if ends.remove(&point) {
                    distances.push((point, distance));
                }

                for (d_row, d_col) in STEPS {
                    let adj = Point::new(point.row + d_row, point.col + d_col);

                    if !self.is_walkable(&adj) || seen.contains(&adj) {
                        continue;
                    }

                    seen.insert(adj);
                    next_frontier.push(adj);
                }
            }

            frontier = next_frontier;

            distance += 1;
        }

        if !ends.is_empty() {
            return Err(FindDistancesError::EndsUnreachable(
                ends.iter().map(|p| **p).collect(),
            ));
        }

        Ok(distances)
    }

    fn astar(&self, start: &Point, goal: &Point) -> Option<Vec<Point>> {
        if start == goal {
            return Some(vec![*start]);
        }

        let mut open = BinaryHeap::new();
        let mut closed = HashSet::new();
        let mut g_costs = HashMap::new();
        let mut came_from = HashMap::new();
        let mut seq = 0u64;

        g_costs.insert(*start, 0);
        open.push(FrontierEntry::create(*start, 0, goal, seq));

        while let Some(curr) = open.pop() {
            if closed.contains(&curr.point) {
                //There can be stale duplicate entries for a point whose g improved later.
                debug!("already closed: {}", curr.point);
                continue;
            }

            closed.insert(curr.point);

            if curr.point == *goal {
                debug!("found path, cost {}", curr.g);
                return Some(reconstruct(&came_from, *goal));
            }

            debug!("expand {} f:{} h:{} g:{}", curr.point, curr.f, curr.h, curr.g);

            for (d_row, d_col) in STEPS {
                let adj = Point::new(curr.point.row + d_row, curr.point.col + d_col);

                if !self.is_walkable(&adj) || closed.contains(&adj) {
                    continue;
                }

                let tentative_g = curr.g + 1;

                if let Some(&known_g) = g_costs.get(&adj) {
                    if tentative_g >= known_g {
                        continue;
                    }

                    debug!("relax {} {} -> {}", adj, known_g, tentative_g);
                }

                g_costs.insert(adj, tentative_g);
                came_from.insert(adj, curr.point);

                seq += 1;
                open.push(FrontierEntry::create(adj, tentative_g, goal, seq));
            }
        }

        debug!("no path found");
        None
    }

    /**
     * Renders the grid as text, one line per row: '.' walkable, '#' obstacle,
     * '*' path cell, 'S' and 'G' for the path endpoints.  Presentation only.
     */
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut display = self
            .walkable
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&walkable| if walkable { '.' } else { '#' })
                    .collect::<Vec<char>>()
            })
            .collect::<Vec<_>>();

        let mut mark = |point: &Point, marker| {
            if self.in_bounds(point.row, point.col) {
                display[point.row as usize][point.col as usize] = marker;
            }
        };

        for point in path {
            mark(point, '*');
        }

        if let Some(goal) = path.last() {
            mark(goal, 'G');
        }

        if let Some(start) = path.first() {
            mark(start, 'S');
        }

        let mut out = String::new();
        for row in display {
            let line = row.iter().map(char::to_string).collect::<Vec<_>>();
            out.push_str(&line.join(" "));
            out.push('\n');
        }

        out
    }

    fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows() && (col as usize) < self.cols()
    }
}

//The start cell is the only one with no parent entry.
fn reconstruct(came_from: &HashMap<Point, Point>, goal: Point) -> Vec<Point> {
    let mut path = vec![goal];
    let mut curr = goal;
    while let Some(prev) = came_from.get(&curr) {
        path.push(*prev);
        curr = *prev;
    }

    path.reverse();
    path
}

pub fn minify_path(path: Vec<Point>) -> Vec<Point> {
    if path.len() < 2 {
        return path;
    }

    let mut minified = Vec::new();
    let mut prev_prev = None;
    let mut prev = None;
    for curr in path {
        if prev.is_none() {
            prev = Some(curr);
            minified.push(curr);
            continue;
        }

        if prev_prev.is_none() {
            prev_prev = prev;
            prev = Some(curr);
            continue;
        }

        let d_row = prev.unwrap().row - prev_prev.unwrap().row;
        let d_col = prev.unwrap().col - prev_prev.unwrap().col;
        let d_row2 = curr.row - prev.unwrap().row;
        let d_col2 = curr.col - prev.unwrap().col;

        if d_row != d_row2 || d_col != d_col2 {
            minified.push(prev.unwrap());
        }

        prev_prev = prev;
        prev = Some(curr);
    }

    minified.push(prev.unwrap());
    minified
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, new)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(PartialEq, Eq, new)]
struct FrontierEntry {
    point: Point,
    f: i32,
    h: i32,
    g: i32,
    seq: u64,
}

impl FrontierEntry {
    fn create(point: Point, g: i32, goal: &Point, seq: u64) -> FrontierEntry {
        let h = manhattan(&point, goal);
        FrontierEntry::new(point, g + h, h, g, seq)
    }
}

//Min-first by f, then h, then insertion order.  seq is unique per push, so
//equal keys never reach the point field.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.f, other.h, other.seq).cmp(&(self.f, self.h, self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn manhattan(a: &Point, b: &Point) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}
