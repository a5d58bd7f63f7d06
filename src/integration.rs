//! Integration module for connecting segmentation backends with the tracker.
//!
//! This module provides the source trait a detector implements, a builder for
//! candidates, the end-to-end pipeline, and flat views of the final tracks.

mod builder;
mod export;
mod pipeline;
mod source;

pub use builder::CandidateBuilder;
pub use export::{LineageEdge, TrackRow};
pub use pipeline::TrackerPipeline;
pub use source::CandidateSource;
