//! Cell lineage tracking across time-lapse microscopy frames.
//!
//! Each frame's detections are linked to the existing tracks by proximity.
//! A track whose second-closest detection is unclaimed becomes the parent of a
//! new child track. After linking, collisions and implausible jumps are
//! detected; a suspect track gets one frame to be healed before it is culled.
//!
//! ```ignore
//! use cell_lineage::{CandidateBuilder, LineageTracker, TrackerConfig};
//!
//! let mut tracker = LineageTracker::new(TrackerConfig::default())?;
//! for frame in frames {
//!     let candidates: Vec<_> = frame
//!         .iter()
//!         .map(|b| CandidateBuilder::new().tlbr(b.x1, b.y1, b.x2, b.y2).build())
//!         .collect();
//!     tracker.update(candidates)?;
//! }
//! let tracks = tracker.finish();
//! for row in tracks.rows() {
//!     println!("{} {} {} {}", row.track, row.frame, row.x, row.y);
//! }
//! ```

mod error;
pub mod integration;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{CandidateBuilder, CandidateSource, LineageEdge, TrackRow, TrackerPipeline};
pub use tracker::{
    Boundary, Candidate, HealthState, IntoCandidates, LineageTracker, Pixel, Polygon, Position,
    Rect, Sample, Track, TrackId, TrackSet, TrackerConfig,
};
