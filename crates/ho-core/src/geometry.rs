use serde::{Deserialize, Serialize};

/// Edge length of one grid cell in world units.
pub const SEGMENT_SIZE: f64 = 40.0;

/// A continuous position or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// The grid cell containing this point.
    pub fn cell(self) -> Cell {
        Cell::new(
            (self.x / SEGMENT_SIZE).floor() as i32,
            (self.y / SEGMENT_SIZE).floor() as i32,
        )
    }
}

/// An axis-aligned rectangle. Containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Return `true` if the point lies inside or on the border of the rectangle.
    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.x + self.w && self.y <= p.y && p.y <= self.y + self.h
    }

    /// Distance from the point to the closest point of the rectangle (0 inside).
    pub fn edge_distance(&self, p: Point) -> f64 {
        let nearest = Point::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        );
        p.distance(nearest)
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Integer coordinate of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Cell {
    /// Create a cell coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space center of the cell.
    pub fn center(self) -> Point {
        Point::new(
            f64::from(self.x) * SEGMENT_SIZE + SEGMENT_SIZE / 2.0,
            f64::from(self.y) * SEGMENT_SIZE + SEGMENT_SIZE / 2.0,
        )
    }

    /// World-space rectangle covered by the cell.
    pub fn rect(self) -> Rect {
        Rect::new(
            f64::from(self.x) * SEGMENT_SIZE,
            f64::from(self.y) * SEGMENT_SIZE,
            SEGMENT_SIZE,
            SEGMENT_SIZE,
        )
    }

    /// The four orthogonal neighbours in fixed order: east, west, south, north.
    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x, self.y - 1),
        ]
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of a world measured in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
}

impl GridSize {
    /// Grid covering a world of the given size in world units. Partial cells are dropped.
    pub fn for_world(width: u32, height: u32) -> Self {
        Self {
            width: (f64::from(width) / SEGMENT_SIZE) as i32,
            height: (f64::from(height) / SEGMENT_SIZE) as i32,
        }
    }

    /// Return `true` if the cell lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }
}
