//! Flat views of a finished run for downstream tables and lineage trees.

use crate::tracker::{Sample, TrackId, TrackSet};

/// One known position of one track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackRow {
    pub track: TrackId,
    pub frame: usize,
    pub x: f64,
    pub y: f64,
    pub signal: Option<f64>,
    /// Position was written by healing rather than detected
    pub interpolated: bool,
}

/// A division event: `child` split off `parent` at `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineageEdge {
    pub parent: TrackId,
    pub child: TrackId,
    pub frame: usize,
}

impl TrackSet {
    /// All known positions, grouped by track in active order, then by frame.
    /// Backfilled and missed frames produce no row.
    pub fn rows(&self) -> Vec<TrackRow> {
        let mut rows = Vec::new();
        for track in self.tracks() {
            for (frame, (sample, signal)) in track.positions().iter().zip(track.signals()).enumerate()
            {
                let Some(p) = sample.position() else {
                    continue;
                };
                rows.push(TrackRow {
                    track: track.id(),
                    frame,
                    x: p.x,
                    y: p.y,
                    signal: *signal,
                    interpolated: matches!(sample, Sample::Interpolated(_)),
                });
            }
        }
        rows
    }

    /// Parent-child edges among the active tracks, ordered by division frame.
    pub fn lineage(&self) -> Vec<LineageEdge> {
        let mut edges: Vec<LineageEdge> = self
            .tracks()
            .filter_map(|child| {
                let parent = child.parent()?;
                self.get(parent).map(|_| LineageEdge {
                    parent,
                    child: child.id(),
                    frame: child.birth_frame(),
                })
            })
            .collect();
        edges.sort_by_key(|e| (e.frame, e.parent, e.child));
        edges
    }
}
