//! Frame-by-frame lineage tracker.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::tracker::arena::TrackArena;
use crate::tracker::candidate::IntoCandidates;
use crate::tracker::health_state::HealthState;
use crate::tracker::healing::correct_links;
use crate::tracker::linker::{FrameContext, link_frame};
use crate::tracker::track::{Track, TrackId};

/// Configuration for the LineageTracker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Maximum distance between a track and a candidate it may claim as a child
    pub child_distance_threshold: f64,
    /// Largest plausible displacement over two frames; halved for one-frame checks
    pub jump_threshold: f64,
    /// Maximum distance between the positions around a bad frame for it to be healed
    pub healing_threshold: f64,
    /// Drop tracks still suspect when the run is finished
    pub cull_suspects_on_finish: bool,
    /// Keep culled tracks so their lineage can still be inspected
    pub retain_culled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            child_distance_threshold: 50.0,
            jump_threshold: 30.0,
            healing_threshold: 30.0,
            cull_suspects_on_finish: true,
            retain_culled: false,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("child_distance_threshold", self.child_distance_threshold),
            ("jump_threshold", self.jump_threshold),
            ("healing_threshold", self.healing_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive finite distance, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Summary of one processed frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: usize,
    pub candidates: usize,
    /// Active tracks after the frame
    pub active: usize,
    pub spawned: Vec<TrackId>,
    pub missed: Vec<TrackId>,
    pub healed: Vec<TrackId>,
    pub quarantined: Vec<TrackId>,
    /// Collision losers and condemned tracks removed this frame
    pub culled: Vec<TrackId>,
}

pub struct LineageTracker {
    arena: TrackArena,
    active: Vec<TrackId>,
    graveyard: Vec<Track>,
    frame_id: usize,
    config: TrackerConfig,
}

impl Default for LineageTracker {
    fn default() -> Self {
        Self::with_config(TrackerConfig::default())
    }
}

impl LineageTracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: TrackerConfig) -> Self {
        Self {
            arena: TrackArena::new(),
            active: Vec::new(),
            graveyard: Vec::new(),
            frame_id: 0,
            config,
        }
    }

    /// Feed the next frame's detections.
    ///
    /// The first frame seeds one root track per candidate. Every later frame
    /// is linked to the active tracks and then corrected.
    pub fn update<C: IntoCandidates>(&mut self, candidates: C) -> Result<FrameReport> {
        let candidates = candidates.into_candidates();
        let frame = self.frame_id;

        let mut report = FrameReport {
            frame,
            candidates: candidates.len(),
            ..Default::default()
        };

        if frame == 0 {
            self.active = candidates
                .iter()
                .map(|c| self.arena.spawn_root(c, frame))
                .collect();
        } else {
            let ctx = FrameContext {
                frame,
                candidates: &candidates,
                config: &self.config,
            };
            let linked = link_frame(&mut self.arena, &self.active, &ctx)?;
            let healing = correct_links(&mut self.arena, linked.active, &ctx)?;

            for id in healing.culled() {
                self.retire(id);
            }
            report.spawned = linked.spawned;
            report.missed = linked.missed;
            report.culled = healing.culled().collect();
            report.healed = healing.healed;
            report.quarantined = healing.quarantined;
            self.active = healing.active;
        }

        self.frame_id += 1;
        report.active = self.active.len();
        debug!(
            "frame {}: {} candidates, {} active, {} spawned, {} healed, {} culled",
            frame,
            report.candidates,
            report.active,
            report.spawned.len(),
            report.healed.len(),
            report.culled.len()
        );
        Ok(report)
    }

    fn retire(&mut self, id: TrackId) {
        if let Some(track) = self.arena.remove(id) {
            if self.config.retain_culled {
                self.graveyard.push(track);
            }
        }
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> usize {
        self.frame_id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn arena(&self) -> &TrackArena {
        &self.arena
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.arena.get(id)
    }

    pub fn active_ids(&self) -> &[TrackId] {
        &self.active
    }

    pub fn active_tracks(&self) -> impl Iterator<Item = &Track> {
        self.active.iter().filter_map(|&id| self.arena.get(id))
    }

    /// End the run and hand the tracks to downstream consumers.
    pub fn finish(mut self) -> TrackSet {
        if self.config.cull_suspects_on_finish {
            let suspects: Vec<TrackId> = self
                .active_tracks()
                .filter(|t| t.health() == HealthState::Suspect)
                .map(Track::id)
                .collect();
            if !suspects.is_empty() {
                warn!("culling {} unresolved suspect tracks", suspects.len());
            }
            for &id in &suspects {
                self.retire(id);
            }
            self.active.retain(|id| !suspects.contains(id));
        }

        TrackSet {
            arena: self.arena,
            active: self.active,
            culled: self.graveyard,
            frames: self.frame_id,
        }
    }
}

/// Final tracks of a run with their lineage.
#[derive(Debug, Clone)]
pub struct TrackSet {
    pub(crate) arena: TrackArena,
    pub(crate) active: Vec<TrackId>,
    pub(crate) culled: Vec<Track>,
    pub(crate) frames: usize,
}

impl TrackSet {
    /// Number of frames the tracks span.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.arena.get(id)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.active
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.active.iter().filter_map(|&id| self.arena.get(id))
    }

    /// Culled tracks, kept only when `retain_culled` is set.
    pub fn culled(&self) -> &[Track] {
        &self.culled
    }

    pub fn parent(&self, id: TrackId) -> Option<TrackId> {
        self.arena.get(id).and_then(Track::parent)
    }

    pub fn children(&self, id: TrackId) -> &[TrackId] {
        self.arena.get(id).map(Track::children).unwrap_or_default()
    }

    pub fn ancestors(&self, id: TrackId) -> Vec<TrackId> {
        self.arena.ancestors(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::candidate::Candidate;
    use crate::tracker::geometry::{Pixel, Position, Rect};
    use crate::tracker::track::Sample;

    fn candidate(x: i32, y: i32) -> Candidate {
        Candidate::new(Pixel::new(x, y), Rect::new(x - 3, y - 3, 6, 6).into())
    }

    #[test]
    fn test_invalid_config() {
        let config = TrackerConfig {
            jump_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            LineageTracker::new(config),
            Err(Error::InvalidConfig(_))
        ));
        let config = TrackerConfig {
            child_distance_threshold: 0.0,
            ..Default::default()
        };
        assert!(LineageTracker::new(config).is_err());
    }

    #[test]
    fn test_first_frame_seeds_roots() {
        let mut tracker = LineageTracker::new(TrackerConfig::default()).unwrap();
        let report = tracker
            .update(vec![candidate(10, 10), candidate(200, 200)])
            .unwrap();

        assert_eq!(report.frame, 0);
        assert_eq!(report.active, 2);
        assert!(tracker.active_tracks().all(|t| t.parent().is_none() && t.birth_frame() == 0));
    }

    #[test]
    fn test_missed_frame_is_healed() {
        let mut tracker = LineageTracker::new(TrackerConfig::default()).unwrap();
        tracker.update(vec![candidate(40, 40)]).unwrap();
        tracker.update(vec![candidate(42, 40)]).unwrap();

        let report = tracker.update(Vec::<Candidate>::new()).unwrap();
        assert_eq!(report.missed.len(), 1);
        assert_eq!(report.quarantined, report.missed);

        let report = tracker.update(vec![candidate(46, 40)]).unwrap();
        assert_eq!(report.healed.len(), 1);

        let track = tracker.active_tracks().next().unwrap();
        assert_eq!(track.health(), HealthState::Healthy);
        assert_eq!(
            track.positions()[2],
            Sample::Interpolated(Position::new(44.0, 40.0))
        );
    }

    #[test]
    fn test_finish_culls_unresolved_suspects() {
        let config = TrackerConfig {
            retain_culled: true,
            ..Default::default()
        };
        let mut tracker = LineageTracker::new(config).unwrap();
        tracker.update(vec![candidate(10, 10), candidate(300, 300)]).unwrap();
        tracker.update(vec![candidate(10, 10), candidate(320, 300)]).unwrap();

        let set = tracker.finish();
        assert_eq!(set.len(), 1);
        assert_eq!(set.frames(), 2);
        assert_eq!(set.culled().len(), 1);
        assert_eq!(
            set.culled()[0].latest_position().unwrap(),
            Position::new(320.0, 300.0)
        );
    }
}
