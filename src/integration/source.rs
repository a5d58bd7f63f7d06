//! Trait for per-frame detection providers.

use std::convert::Infallible;

use crate::tracker::Candidate;

/// Trait for segmentation backends feeding the tracker.
///
/// Implement this trait to connect any detector to the lineage tracker. The
/// source owns its frames; the tracker only asks for them in order.
///
/// # Example
///
/// ```ignore
/// use cell_lineage::{Candidate, CandidateSource};
///
/// struct MySegmenter {
///     // Your movie and model here
/// }
///
/// impl CandidateSource for MySegmenter {
///     type Error = std::io::Error;
///
///     fn frame_count(&self) -> usize {
///         0
///     }
///
///     fn candidates(&mut self, frame: usize) -> Result<Vec<Candidate>, Self::Error> {
///         // Segment the frame and return one candidate per object
///         Ok(vec![])
///     }
/// }
/// ```
pub trait CandidateSource {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of frames the source can produce.
    fn frame_count(&self) -> usize;

    /// Detect the candidates of one frame.
    fn candidates(&mut self, frame: usize) -> Result<Vec<Candidate>, Self::Error>;
}

/// Pre-segmented frames held in memory.
impl CandidateSource for Vec<Vec<Candidate>> {
    type Error = Infallible;

    fn frame_count(&self) -> usize {
        self.len()
    }

    fn candidates(&mut self, frame: usize) -> Result<Vec<Candidate>, Self::Error> {
        Ok(self.get(frame).cloned().unwrap_or_default())
    }
}
