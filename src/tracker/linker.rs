//! One frame transition: match, resolve divisions, extend or fork tracks.

use log::trace;

use crate::error::Result;
use crate::tracker::arena::TrackArena;
use crate::tracker::candidate::Candidate;
use crate::tracker::division::{Assignment, resolve_divisions};
use crate::tracker::geometry::Position;
use crate::tracker::lineage_tracker::TrackerConfig;
use crate::tracker::matching::match_tracks;
use crate::tracker::track::TrackId;

/// Everything a stage needs to know about the frame being processed.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Global index of the frame
    pub frame: usize,
    /// Detections of the frame
    pub candidates: &'a [Candidate],
    pub config: &'a TrackerConfig,
}

/// Changes made to the track set by [`link_frame`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Next active set: every input track followed by its new child, if any
    pub active: Vec<TrackId>,
    /// Tracks extended with a detection
    pub extended: Vec<TrackId>,
    /// Division children created this frame
    pub spawned: Vec<TrackId>,
    /// Tracks that received no detection
    pub missed: Vec<TrackId>,
}

/// Link the active tracks to the frame's candidates.
///
/// All matches are computed before any track is touched, so an error leaves
/// the arena unchanged.
pub fn link_frame(
    arena: &mut TrackArena,
    active: &[TrackId],
    ctx: &FrameContext<'_>,
) -> Result<LinkOutcome> {
    let origins = active
        .iter()
        .map(|&id| arena.track(id)?.latest_position())
        .collect::<Result<Vec<Position>>>()?;

    let pairs = match_tracks(&origins, ctx.candidates);
    let assignments = resolve_divisions(&pairs, ctx.config.child_distance_threshold);

    let mut outcome = LinkOutcome::default();
    for (&id, assignment) in active.iter().zip(assignments) {
        outcome.active.push(id);
        match assignment {
            Assignment::Lost => {
                arena.track_mut(id)?.mark_missed();
                outcome.missed.push(id);
            }
            Assignment::Continue(primary) => {
                arena.track_mut(id)?.extend(&ctx.candidates[primary]);
                outcome.extended.push(id);
            }
            Assignment::Divide { primary, child } => {
                // Spawn first so the backfill sees the parent's pre-frame length.
                let child_id = arena.spawn_child(id, &ctx.candidates[child], ctx.frame)?;
                arena.track_mut(id)?.extend(&ctx.candidates[primary]);
                trace!("frame {}: track {} divided into {}", ctx.frame, id, child_id);
                outcome.extended.push(id);
                outcome.active.push(child_id);
                outcome.spawned.push(child_id);
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tracker::geometry::{Pixel, Rect};
    use crate::tracker::track::Sample;

    fn candidate(x: i32, y: i32) -> Candidate {
        Candidate::new(Pixel::new(x, y), Rect::new(x - 3, y - 3, 6, 6).into())
    }

    #[test]
    fn test_division_spawns_backfilled_child() {
        let config = TrackerConfig::default();
        let mut arena = TrackArena::new();
        let root = arena.spawn_root(&candidate(100, 100), 0);

        let frame1 = [candidate(98, 100), candidate(103, 100)];
        let ctx = FrameContext {
            frame: 1,
            candidates: &frame1,
            config: &config,
        };
        let outcome = link_frame(&mut arena, &[root], &ctx).unwrap();

        assert_eq!(outcome.spawned.len(), 1);
        let child = outcome.spawned[0];
        assert_eq!(outcome.active, vec![root, child]);

        let parent = arena.get(root).unwrap();
        let child = arena.get(child).unwrap();
        assert_eq!(child.backfill_len(), 1);
        assert_eq!(child.len(), parent.len());
        assert_eq!(child.parent(), Some(root));
        assert_eq!(child.birth_frame(), 1);
        assert_eq!(parent.positions()[1], Sample::Observed(Position::new(98.0, 100.0)));
        assert_eq!(child.positions()[1], Sample::Observed(Position::new(103.0, 100.0)));
    }

    #[test]
    fn test_empty_frame_marks_every_track_missed() {
        let config = TrackerConfig::default();
        let mut arena = TrackArena::new();
        let a = arena.spawn_root(&candidate(10, 10), 0);
        let b = arena.spawn_root(&candidate(90, 90), 0);

        let ctx = FrameContext {
            frame: 1,
            candidates: &[],
            config: &config,
        };
        let outcome = link_frame(&mut arena, &[a, b], &ctx).unwrap();

        assert_eq!(outcome.missed, vec![a, b]);
        assert!(outcome.extended.is_empty());
        for id in [a, b] {
            let track = arena.get(id).unwrap();
            assert_eq!(track.len(), 2);
            assert_eq!(track.boundaries().len(), 2);
            assert_eq!(track.positions()[1], Sample::Missed);
        }
    }

    #[test]
    fn test_unknown_track_leaves_arena_untouched() {
        let config = TrackerConfig::default();
        let mut arena = TrackArena::new();
        let a = arena.spawn_root(&candidate(10, 10), 0);
        let frame1 = [candidate(11, 10)];
        let ctx = FrameContext {
            frame: 1,
            candidates: &frame1,
            config: &config,
        };

        let err = link_frame(&mut arena, &[a, TrackId(9)], &ctx).unwrap_err();
        assert!(matches!(err, Error::UnknownTrack(TrackId(9))));
        assert_eq!(arena.get(a).unwrap().len(), 1);
    }
}
