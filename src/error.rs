//! Error types for the lineage tracker.

use thiserror::Error;

use crate::tracker::TrackId;

/// Errors that can occur while linking frames.
#[derive(Debug, Error)]
pub enum Error {
    /// A track was asked for its latest position but holds no known position.
    #[error("track {0} has no recorded positions")]
    EmptyHistory(TrackId),

    /// A handle did not resolve to a live track in the arena.
    #[error("track {0} is not in the arena")]
    UnknownTrack(TrackId),

    /// A track tried to record a second division in the same frame.
    #[error("track {track} already divided at frame {frame}")]
    DuplicateDivision { track: TrackId, frame: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The candidate source failed to produce detections for a frame.
    #[error("candidate source failed at frame {frame}")]
    CandidateSource {
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
