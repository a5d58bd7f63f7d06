//! TrackerPipeline for driving the tracker from a candidate source.

use crate::error::{Error, Result};
use crate::tracker::{FrameReport, LineageTracker, TrackSet, TrackerConfig};

use super::CandidateSource;

/// Runs a [`LineageTracker`] over every frame of a [`CandidateSource`].
///
/// Frames are processed strictly in order. A run either completes over all
/// frames or stops at the first error.
pub struct TrackerPipeline<S: CandidateSource> {
    source: S,
    tracker: LineageTracker,
}

impl<S: CandidateSource> TrackerPipeline<S> {
    /// Create a new pipeline with the given source and tracker config.
    pub fn new(source: S, config: TrackerConfig) -> Result<Self> {
        Ok(Self {
            source,
            tracker: LineageTracker::new(config)?,
        })
    }

    /// Create a new pipeline with default tracker configuration.
    pub fn with_default_config(source: S) -> Self {
        Self {
            source,
            tracker: LineageTracker::default(),
        }
    }

    /// Process the next frame of the source.
    ///
    /// Returns `None` once every frame has been consumed.
    pub fn process_frame(&mut self) -> Result<Option<FrameReport>> {
        let frame = self.tracker.frame_count();
        if frame >= self.source.frame_count() {
            return Ok(None);
        }
        let candidates = self
            .source
            .candidates(frame)
            .map_err(|e| Error::CandidateSource {
                frame,
                source: Box::new(e),
            })?;
        self.tracker.update(candidates).map(Some)
    }

    /// Process all remaining frames and return the final track set.
    pub fn run(mut self) -> Result<TrackSet> {
        while self.process_frame()?.is_some() {}
        Ok(self.tracker.finish())
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &LineageTracker {
        &self.tracker
    }
}
