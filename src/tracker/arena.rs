//! Exclusive owner of every track, addressed by stable [`TrackId`] handles.

use crate::error::{Error, Result};
use crate::tracker::candidate::Candidate;
use crate::tracker::track::{Track, TrackId};

/// Slot storage for tracks.
///
/// Parent and child links are plain handles, so the lineage graph can be
/// walked in both directions without shared ownership. Removing a track frees
/// its slot but never reuses the index.
#[derive(Debug, Clone, Default)]
pub struct TrackArena {
    slots: Vec<Option<Track>>,
}

impl TrackArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> TrackId {
        TrackId(self.slots.len())
    }

    /// Insert a root track for a first-frame detection.
    pub fn spawn_root(&mut self, candidate: &Candidate, frame: usize) -> TrackId {
        let id = self.next_id();
        self.slots.push(Some(Track::root(id, candidate, frame)));
        id
    }

    /// Insert a division child of `parent`.
    ///
    /// Must run before the parent is extended for `frame`, so the child's
    /// backfill matches the parent's history length at the division.
    pub fn spawn_child(
        &mut self,
        parent: TrackId,
        candidate: &Candidate,
        frame: usize,
    ) -> Result<TrackId> {
        let id = self.next_id();
        let parent_track = self.get_mut(parent).ok_or(Error::UnknownTrack(parent))?;
        let backfill = parent_track.len();
        parent_track.record_child(id, frame)?;
        self.slots
            .push(Some(Track::child(id, parent, backfill, candidate, frame)));
        Ok(id)
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub(crate) fn track(&self, id: TrackId) -> Result<&Track> {
        self.get(id).ok_or(Error::UnknownTrack(id))
    }

    pub(crate) fn track_mut(&mut self, id: TrackId) -> Result<&mut Track> {
        self.get_mut(id).ok_or(Error::UnknownTrack(id))
    }

    /// Drop a track from the arena, handing it back to the caller.
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Number of live tracks.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.slots.iter().flatten()
    }

    /// Handles of live ancestors, nearest first. The walk stops at a root or
    /// at the first ancestor that has been removed.
    pub fn ancestors(&self, id: TrackId) -> Vec<TrackId> {
        let mut lineage = Vec::new();
        let mut current = self.get(id).and_then(Track::parent);
        while let Some(parent) = current {
            let Some(track) = self.get(parent) else { break };
            lineage.push(parent);
            current = track.parent();
        }
        lineage
    }

    /// Handles of all live descendants in depth-first order.
    pub fn descendants(&self, id: TrackId) -> Vec<TrackId> {
        let mut out = Vec::new();
        let mut stack: Vec<TrackId> = self
            .get(id)
            .map(|t| t.children().iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if let Some(track) = self.get(next) {
                out.push(next);
                stack.extend(track.children().iter().rev().copied());
            }
        }
        out
    }
}
