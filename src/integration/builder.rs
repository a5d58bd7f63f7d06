//! Builder for creating Candidate objects from various boundary formats.

use crate::tracker::{Boundary, Candidate, Pixel, Polygon, Rect};

/// Builder for creating `Candidate` objects.
///
/// When no explicit position is given, the candidate sits at the centroid of
/// its boundary.
#[derive(Debug, Clone, Default)]
pub struct CandidateBuilder {
    position: Option<Pixel>,
    boundary: Option<Boundary>,
    signal: Option<f64>,
}

impl CandidateBuilder {
    /// Create a new candidate builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position explicitly.
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Pixel::new(x, y));
        self
    }

    /// Set a rectangular boundary in TLWH format (x, y, width, height).
    pub fn tlwh(mut self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.boundary = Some(Rect::new(x, y, w, h).into());
        self
    }

    /// Set a rectangular boundary in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        self.boundary = Some(Rect::from_tlbr(x1, y1, x2, y2).into());
        self
    }

    /// Set a rectangular boundary in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: i32, cy: i32, w: i32, h: i32) -> Self {
        let rect = Rect::new(cx.saturating_sub(w / 2), cy.saturating_sub(h / 2), w, h);
        self.boundary = Some(rect.into());
        self
    }

    /// Set a contour boundary from (x, y) vertices.
    pub fn polygon<I>(mut self, vertices: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let vertices = vertices.into_iter().map(|(x, y)| Pixel::new(x, y)).collect();
        self.boundary = Some(Polygon::new(vertices).into());
        self
    }

    /// Set the secondary measurement.
    pub fn signal(mut self, signal: f64) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Build the final `Candidate`.
    pub fn build(self) -> Candidate {
        let boundary = self
            .boundary
            .unwrap_or_else(|| Boundary::Polygon(Polygon::default()));
        let position = self.position.unwrap_or_else(|| boundary.centroid());
        Candidate {
            position,
            boundary,
            signal: self.signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_builder() {
        let candidate = CandidateBuilder::new()
            .tlbr(10, 20, 50, 80)
            .signal(0.95)
            .build();

        assert_eq!(candidate.position, Pixel::new(30, 50));
        assert_eq!(candidate.signal, Some(0.95));
    }

    #[test]
    fn test_polygon_centroid_position() {
        let candidate = CandidateBuilder::new()
            .polygon([(1, 1), (1, 5), (5, 5), (5, 1)])
            .build();
        assert_eq!(candidate.position, Pixel::new(3, 3));
        assert!(candidate.boundary.contains(Pixel::new(2, 2)));
    }

    #[test]
    fn test_explicit_position_wins() {
        let candidate = CandidateBuilder::new()
            .xywh(100, 100, 10, 10)
            .position(101, 99)
            .build();
        assert_eq!(candidate.position, Pixel::new(101, 99));
        assert_eq!(candidate.boundary.bounding_rect(), Rect::new(95, 95, 10, 10));
    }

    #[test]
    fn test_missing_boundary_falls_back_to_origin() {
        let candidate = CandidateBuilder::new().build();
        assert_eq!(candidate.position, Pixel::origin());
        assert_eq!(candidate.boundary.area(), 0.0);
    }
}
