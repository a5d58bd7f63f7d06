//! Detection boundaries in pixel space.
//!
//! A detector reports each object either as a closed contour (`Polygon`) or as
//! an axis-aligned bounding box (`Rect`). Both formats share the same queries
//! through [`Boundary`]:
//! - area
//! - centroid (integer pixel, with a fixed fallback for degenerate shapes)
//! - point containment

use nalgebra::Point2;

/// Integer pixel coordinate as reported by a detector.
pub type Pixel = Point2<i32>;

/// Sub-pixel position stored in track histories.
pub type Position = Point2<f64>;

/// Widen a pixel coordinate into a track position.
#[inline]
pub fn to_position(pixel: Pixel) -> Position {
    Position::new(f64::from(pixel.x), f64::from(pixel.y))
}

/// Axis-aligned bounding rectangle in TLWH format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Top-left x coordinate
    pub x: i32,
    /// Top-left y coordinate
    pub y: i32,
    /// Width of the rectangle
    pub width: i32,
    /// Height of the rectangle
    pub height: i32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2.saturating_sub(x1),
            height: y2.saturating_sub(y1),
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [
            self.x,
            self.y,
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        ]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Center pixel, truncated toward zero. Coordinates saturate at the `i32` range.
    #[inline]
    pub fn center(&self) -> Pixel {
        Pixel::new(
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Whether `p` lies inside the rectangle or on its edge.
    pub fn contains(&self, p: Pixel) -> bool {
        let [x1, y1, x2, y2] = self.to_tlbr();
        p.x >= x1.min(x2) && p.x <= x1.max(x2) && p.y >= y1.min(y2) && p.y <= y1.max(y2)
    }
}

/// Closed contour traced around a segmented object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    vertices: Vec<Pixel>,
}

impl Polygon {
    pub fn new(vertices: Vec<Pixel>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Pixel] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (Pixel, Pixel)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Zeroth and first order moments `(m00, m10, m01)` by Green's theorem.
    /// `m00` is signed by winding direction.
    fn moments(&self) -> (f64, f64, f64) {
        let (mut m00, mut m10, mut m01) = (0.0, 0.0, 0.0);
        for (a, b) in self.edges() {
            let (ax, ay) = (f64::from(a.x), f64::from(a.y));
            let (bx, by) = (f64::from(b.x), f64::from(b.y));
            let cross = ax * by - bx * ay;
            m00 += cross;
            m10 += (ax + bx) * cross;
            m01 += (ay + by) * cross;
        }
        (m00 / 2.0, m10 / 6.0, m01 / 6.0)
    }

    pub fn area(&self) -> f64 {
        self.moments().0.abs()
    }

    /// Centroid truncated to integer pixels, or `None` if the contour encloses no area.
    pub fn centroid(&self) -> Option<Pixel> {
        let (m00, m10, m01) = self.moments();
        if m00.abs() < f64::EPSILON {
            return None;
        }
        Some(Pixel::new((m10 / m00) as i32, (m01 / m00) as i32))
    }

    /// Whether `p` lies inside the contour. Points on an edge count as inside.
    pub fn contains(&self, p: Pixel) -> bool {
        if self.vertices.is_empty() {
            return false;
        }
        if self.edges().any(|(a, b)| on_segment(p, a, b)) {
            return true;
        }

        // Even-odd crossing test along a horizontal ray.
        let (px, py) = (f64::from(p.x), f64::from(p.y));
        let mut inside = false;
        for (a, b) in self.edges() {
            let (ax, ay) = (f64::from(a.x), f64::from(a.y));
            let (bx, by) = (f64::from(b.x), f64::from(b.y));
            if (ay > py) != (by > py) {
                let x_cross = ax + (py - ay) * (bx - ax) / (by - ay);
                if px < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    pub fn bounding_rect(&self) -> Rect {
        let Some(first) = self.vertices.first() else {
            return Rect::default();
        };
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.x, first.y);
        for v in &self.vertices[1..] {
            x1 = x1.min(v.x);
            y1 = y1.min(v.y);
            x2 = x2.max(v.x);
            y2 = y2.max(v.y);
        }
        Rect::from_tlbr(x1, y1, x2, y2)
    }
}

fn on_segment(p: Pixel, a: Pixel, b: Pixel) -> bool {
    let cross = i64::from(b.x - a.x) * i64::from(p.y - a.y)
        - i64::from(b.y - a.y) * i64::from(p.x - a.x);
    cross == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Outline of a single detection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Boundary {
    Polygon(Polygon),
    Rect(Rect),
}

impl Boundary {
    pub fn area(&self) -> f64 {
        match self {
            Boundary::Polygon(poly) => poly.area(),
            Boundary::Rect(rect) => rect.area().abs() as f64,
        }
    }

    /// Centroid of the boundary.
    ///
    /// A degenerate boundary with zero area yields the origin instead of
    /// failing, so one malformed detection never aborts a frame.
    pub fn centroid(&self) -> Pixel {
        match self {
            Boundary::Polygon(poly) => poly.centroid().unwrap_or_else(Pixel::origin),
            Boundary::Rect(rect) if rect.area() == 0 => Pixel::origin(),
            Boundary::Rect(rect) => rect.center(),
        }
    }

    pub fn contains(&self, p: Pixel) -> bool {
        match self {
            Boundary::Polygon(poly) => poly.contains(p),
            Boundary::Rect(rect) => rect.contains(p),
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Boundary::Polygon(poly) => poly.bounding_rect(),
            Boundary::Rect(rect) => *rect,
        }
    }
}

impl From<Rect> for Boundary {
    fn from(rect: Rect) -> Self {
        Boundary::Rect(rect)
    }
}

impl From<Polygon> for Boundary {
    fn from(poly: Polygon) -> Self {
        Boundary::Polygon(poly)
    }
}
