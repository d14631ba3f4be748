//! Border tracing for detected regions
//!
//! The outer boundary of a region is traced with Moore-neighbour border
//! following over the region-index map produced by the detector. Tracing
//! starts at the topmost-leftmost pixel and runs clockwise (in image
//! coordinates, y pointing down).

use icl_core::{Point, Rect};

/// Direction for border traversal (8-connected, clockwise from West)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// West (-1, 0)
    West = 0,
    /// Northwest (-1, -1)
    NorthWest = 1,
    /// North (0, -1)
    North = 2,
    /// Northeast (1, -1)
    NorthEast = 3,
    /// East (1, 0)
    East = 4,
    /// Southeast (1, 1)
    SouthEast = 5,
    /// South (0, 1)
    South = 6,
    /// Southwest (-1, 1)
    SouthWest = 7,
}

impl Direction {
    /// Get the x offset for this direction
    #[inline]
    pub fn dx(self) -> i32 {
        XPOSTAB[self as usize]
    }

    /// Get the y offset for this direction
    #[inline]
    pub fn dy(self) -> i32 {
        YPOSTAB[self as usize]
    }

    /// Get direction from x,y offsets
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
            return None;
        }
        let idx = DIRTAB[(1 + dy) as usize][(1 + dx) as usize];
        if idx < 0 {
            None
        } else {
            Some(Self::from_index(idx as usize))
        }
    }

    /// Create direction from index (taken modulo 8)
    #[inline]
    fn from_index(idx: usize) -> Self {
        match idx % 8 {
            0 => Direction::West,
            1 => Direction::NorthWest,
            2 => Direction::North,
            3 => Direction::NorthEast,
            4 => Direction::East,
            5 => Direction::SouthEast,
            6 => Direction::South,
            _ => Direction::SouthWest,
        }
    }

    /// Rotate clockwise by `steps` eighths of a turn
    #[inline]
    pub fn rotated(self, steps: usize) -> Self {
        Self::from_index(self as usize + steps)
    }

    /// Step from `p` in this direction
    #[inline]
    pub fn step(self, p: Point) -> Point {
        p.offset(self.dx(), self.dy())
    }

    /// Whether the step is diagonal
    #[inline]
    pub fn is_diagonal(self) -> bool {
        (self as usize) % 2 == 1
    }
}

/// X offset for each direction
const XPOSTAB: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// Y offset for each direction
const YPOSTAB: [i32; 8] = [0, -1, -1, -1, 0, 1, 1, 1];

/// Direction lookup table: DIRTAB[1+dy][1+dx] gives direction index
const DIRTAB: [[i32; 3]; 3] = [[1, 2, 3], [0, -1, 4], [7, 6, 5]];

/// Read-only view of the region-index map of one detection run
#[derive(Debug, Clone, Copy)]
pub(crate) struct LabelMap<'a> {
    pub labels: &'a [u32],
    pub roi: Rect,
}

impl LabelMap<'_> {
    /// Region index at absolute image position, `None` outside the ROI
    #[inline]
    pub fn at(&self, p: Point) -> Option<u32> {
        if !self.roi.contains_point(p.x, p.y) {
            return None;
        }
        let row = (p.y - self.roi.y) as usize * self.roi.w as usize;
        Some(self.labels[row + (p.x - self.roi.x) as usize])
    }

    #[inline]
    fn is(&self, p: Point, region: u32) -> bool {
        self.at(p) == Some(region)
    }

    /// One Moore step: search clockwise around `cur`, starting after the
    /// outside neighbour in direction `back`. Returns the next boundary pixel
    /// and the direction from it to the last outside pixel checked.
    fn moore_step(&self, cur: Point, back: Direction, region: u32) -> Option<(Point, Direction)> {
        for i in 1..8 {
            let next = back.rotated(i).step(cur);
            if self.is(next, region) {
                let outside = back.rotated(i - 1).step(cur);
                let new_back = Direction::from_offset(outside.x - next.x, outside.y - next.y)?;
                return Some((next, new_back));
            }
        }
        None
    }

    /// Trace the outer boundary of `region`, starting at its topmost-leftmost
    /// pixel `start`.
    ///
    /// Pixels where the boundary pinches are visited (and listed) once per
    /// pass. A single-pixel region yields just `start`.
    pub fn trace_boundary(&self, start: Point, region: u32) -> Vec<Point> {
        let mut points = vec![start];
        // everything left of and above the start pixel is outside
        let Some((second, mut back)) = self.moore_step(start, Direction::West, region) else {
            return points;
        };

        let mut cur = second;
        loop {
            let Some((next, next_back)) = self.moore_step(cur, back, region) else {
                break;
            };
            if cur == start && next == second {
                break;
            }
            points.push(cur);
            cur = next;
            back = next_back;
        }
        points
    }
}

/// Drop detour points from a closed boundary.
///
/// A point is skipped when its successor is still in the 8-neighbourhood of
/// the last kept point.
pub(crate) fn thin_boundary(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut thinned = Vec::with_capacity(n);
    thinned.push(points[0]);
    for i in 1..n {
        let last = thinned[thinned.len() - 1];
        let next = points[(i + 1) % n];
        if next != last && next.chessboard_distance(last) <= 1 {
            continue;
        }
        thinned.push(points[i]);
    }
    thinned
}

/// Length of the closed chain through `points`: 1 per axial step, sqrt(2)
/// per diagonal step.
pub(crate) fn chain_length(points: &[Point]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut len = 0.0f32;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let (dx, dy) = ((q.x - p.x) as f32, (q.y - p.y) as f32);
        len += (dx * dx + dy * dy).sqrt();
    }
    len
}
