//! Single cell trajectory with lineage metadata.

use std::fmt;

use crate::error::{Error, Result};
use crate::tracker::candidate::Candidate;
use crate::tracker::geometry::{Boundary, Position, to_position};
use crate::tracker::health_state::{HealthEvent, HealthState};

/// Stable handle of a track inside a [`TrackArena`](crate::tracker::TrackArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackId(pub(crate) usize);

impl TrackId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One frame's entry in a track history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sample {
    /// Placeholder before a division child existed
    Backfill,
    /// No candidate was assigned this frame
    Missed,
    /// Position of an assigned detection
    Observed(Position),
    /// Position rewritten while healing a single bad frame
    Interpolated(Position),
}

impl Sample {
    /// Known position, if any.
    pub fn position(&self) -> Option<Position> {
        match *self {
            Sample::Observed(p) | Sample::Interpolated(p) => Some(p),
            Sample::Backfill | Sample::Missed => None,
        }
    }
}

/// Displacement into a track's newest known position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Newest position
    pub position: Position,
    /// Distance from the previous known position, `0.0` if there is none
    pub distance: f64,
}

/// Trajectory of a single cell.
///
/// `positions`, `boundaries` and `signals` are parallel: entry `k` of each
/// describes global frame `k`. Every write goes through [`Track::push`] so
/// the three always have the same length.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    positions: Vec<Sample>,
    boundaries: Vec<Option<Boundary>>,
    signals: Vec<Option<f64>>,
    parent: Option<TrackId>,
    children: Vec<TrackId>,
    last_division: Option<usize>,
    birth_frame: usize,
    health: HealthState,
}

impl Track {
    pub(crate) fn empty(id: TrackId, parent: Option<TrackId>, birth_frame: usize) -> Self {
        Self {
            id,
            positions: Vec::new(),
            boundaries: Vec::new(),
            signals: Vec::new(),
            parent,
            children: Vec::new(),
            last_division: None,
            birth_frame,
            health: HealthState::Healthy,
        }
    }

    /// Create a root track from a first-frame detection.
    pub(crate) fn root(id: TrackId, candidate: &Candidate, frame: usize) -> Self {
        let mut track = Self::empty(id, None, frame);
        track.extend(candidate);
        track
    }

    /// Create a division child whose history is backfilled to `backfill` entries
    /// before its first real detection.
    pub(crate) fn child(
        id: TrackId,
        parent: TrackId,
        backfill: usize,
        candidate: &Candidate,
        frame: usize,
    ) -> Self {
        let mut track = Self::empty(id, Some(parent), frame);
        for _ in 0..backfill {
            track.push(Sample::Backfill, None, None);
        }
        track.extend(candidate);
        track
    }

    fn push(&mut self, sample: Sample, boundary: Option<Boundary>, signal: Option<f64>) {
        self.positions.push(sample);
        self.boundaries.push(boundary);
        self.signals.push(signal);
    }

    /// Append the detection assigned to this track in the newest frame.
    pub(crate) fn extend(&mut self, candidate: &Candidate) {
        self.push(
            Sample::Observed(to_position(candidate.position)),
            Some(candidate.boundary.clone()),
            candidate.signal,
        );
    }

    /// Append a lost-detection entry for the newest frame.
    pub(crate) fn mark_missed(&mut self) {
        self.push(Sample::Missed, None, None);
    }

    pub(crate) fn record_child(&mut self, child: TrackId, frame: usize) -> Result<()> {
        if self.last_division == Some(frame) {
            return Err(Error::DuplicateDivision {
                track: self.id,
                frame,
            });
        }
        self.children.push(child);
        self.last_division = Some(frame);
        Ok(())
    }

    /// Replace the sample at `index` with a healed position.
    pub(crate) fn interpolate(&mut self, index: usize, position: Position) {
        if let Some(sample) = self.positions.get_mut(index) {
            *sample = Sample::Interpolated(position);
        }
    }

    pub(crate) fn apply(&mut self, event: HealthEvent) -> HealthState {
        self.health = self.health.transition(event);
        self.health
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Sample] {
        &self.positions
    }

    pub fn boundaries(&self) -> &[Option<Boundary>] {
        &self.boundaries
    }

    pub fn signals(&self) -> &[Option<f64>] {
        &self.signals
    }

    pub fn parent(&self) -> Option<TrackId> {
        self.parent
    }

    pub fn children(&self) -> &[TrackId] {
        &self.children
    }

    pub fn birth_frame(&self) -> usize {
        self.birth_frame
    }

    pub fn health(&self) -> HealthState {
        self.health
    }

    /// Number of leading placeholder entries inherited from the parent.
    pub fn backfill_len(&self) -> usize {
        self.positions
            .iter()
            .take_while(|s| matches!(s, Sample::Backfill))
            .count()
    }

    /// Sample recorded for a global frame index.
    pub fn sample_at(&self, frame: usize) -> Option<&Sample> {
        self.positions.get(frame)
    }

    /// Most recent known position.
    pub fn latest_position(&self) -> Result<Position> {
        self.positions
            .iter()
            .rev()
            .find_map(Sample::position)
            .ok_or(Error::EmptyHistory(self.id))
    }

    /// Step into the newest sample, or `None` if the newest frame has no position.
    pub fn last_step(&self) -> Result<Option<Step>> {
        let Some(newest) = self.positions.last() else {
            return Err(Error::EmptyHistory(self.id));
        };
        let Some(position) = newest.position() else {
            return Ok(None);
        };
        let distance = self.positions[..self.positions.len() - 1]
            .iter()
            .rev()
            .find_map(Sample::position)
            .map_or(0.0, |prev| nalgebra::distance(&prev, &position));
        Ok(Some(Step { position, distance }))
    }
}
