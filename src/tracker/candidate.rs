//! Per-frame detection input for the tracker.

use crate::tracker::geometry::{Boundary, Pixel};

/// One object instance proposed by the detector for a single frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Object position in pixel coordinates
    pub position: Pixel,
    /// Detected outline
    pub boundary: Boundary,
    /// Optional scalar measurement carried alongside the position
    pub signal: Option<f64>,
}

impl Candidate {
    pub fn new(position: Pixel, boundary: Boundary) -> Self {
        Self {
            position,
            boundary,
            signal: None,
        }
    }

    /// Create a candidate positioned at the centroid of its boundary.
    pub fn from_boundary(boundary: Boundary) -> Self {
        Self::new(boundary.centroid(), boundary)
    }

    pub fn with_signal(mut self, signal: f64) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Helper trait for converting detector output into candidates.
pub trait IntoCandidates {
    fn into_candidates(self) -> Vec<Candidate>;
}

impl IntoCandidates for Vec<Candidate> {
    fn into_candidates(self) -> Vec<Candidate> {
        self
    }
}

impl IntoCandidates for &[Candidate] {
    fn into_candidates(self) -> Vec<Candidate> {
        self.to_vec()
    }
}

impl IntoCandidates for Vec<Boundary> {
    fn into_candidates(self) -> Vec<Candidate> {
        self.into_iter().map(Candidate::from_boundary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::geometry::Rect;

    #[test]
    fn test_boundaries_into_candidates() {
        let candidates = vec![
            Boundary::from(Rect::new(0, 0, 10, 10)),
            Boundary::from(Rect::new(20, 20, 4, 6)),
        ]
        .into_candidates();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].position, Pixel::new(5, 5));
        assert_eq!(candidates[1].position, Pixel::new(22, 23));
        assert!(candidates.iter().all(|c| c.signal.is_none()));
    }
}
