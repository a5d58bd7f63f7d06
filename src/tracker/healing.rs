//! Quarantine-and-heal correction pass run after every linked frame.
//!
//! A flagged track becomes `Suspect` and is re-examined on the next frame. If
//! its position two frames back and its current position are close, the frame
//! in between is treated as a segmentation glitch: it is replaced by the
//! midpoint and the track becomes `Healthy` again. Otherwise the track goes to
//! `DeathRow` and is culled in the same pass.

use log::{trace, warn};

use crate::error::Result;
use crate::tracker::anomaly::{Anomaly, detect_anomalies};
use crate::tracker::arena::TrackArena;
use crate::tracker::geometry::Position;
use crate::tracker::health_state::{HealthEvent, HealthState};
use crate::tracker::linker::FrameContext;
use crate::tracker::track::{Track, TrackId};

/// Result of a repair attempt on a suspect track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repair {
    /// The one-frame-back sample was replaced by this midpoint
    Healed(Position),
    /// The track drifted again and is now on death row
    Condemned,
}

/// Try to smooth over a single bad frame.
///
/// Compares the sample two frames back with the newest one; both must be
/// known positions closer than `healing_threshold`.
pub fn attempt_repair(track: &mut Track, healing_threshold: f64) -> Repair {
    let n = track.len();
    let endpoints = match n {
        0..=2 => None,
        _ => track.positions()[n - 3]
            .position()
            .zip(track.positions()[n - 1].position()),
    };

    match endpoints {
        Some((before, after)) if nalgebra::distance(&before, &after) < healing_threshold => {
            let midpoint = nalgebra::center(&before, &after);
            track.interpolate(n - 2, midpoint);
            track.apply(HealthEvent::Repaired);
            Repair::Healed(midpoint)
        }
        _ => {
            track.apply(HealthEvent::RepairFailed);
            Repair::Condemned
        }
    }
}

/// Explicit diff produced by [`correct_links`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealingOutcome {
    /// Frame the correction ran on
    pub frame: usize,
    /// Corrected active set
    pub active: Vec<TrackId>,
    /// Lost a same-position conflict, to be removed
    pub collided: Vec<TrackId>,
    /// Repaired and reset to healthy
    pub healed: Vec<TrackId>,
    /// Failed repair, to be removed
    pub condemned: Vec<TrackId>,
    /// Newly moved from healthy to suspect
    pub quarantined: Vec<TrackId>,
}

impl HealingOutcome {
    /// Every track that must leave the arena.
    pub fn culled(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.collided.iter().chain(&self.condemned).copied()
    }
}

fn flag(arena: &mut TrackArena, id: TrackId, outcome: &mut HealingOutcome) -> Result<()> {
    let track = arena.track_mut(id)?;
    let before = track.health();
    if track.apply(HealthEvent::Flagged) != before {
        outcome.quarantined.push(id);
    }
    Ok(())
}

/// Run the anomaly and healing passes over a freshly linked track set.
///
/// 1. Anomaly pass at `jump_threshold`: collision losers are culled, other
///    flagged tracks are quarantined.
/// 2. Tracks that were already suspect before this frame get a repair attempt.
/// 3. Condemned tracks leave the active set.
/// 4. Second anomaly pass at half the threshold. Flags are resolved next frame.
///
/// Tracks are mutated in place; removals are returned in the outcome and left
/// to the caller.
pub fn correct_links(
    arena: &mut TrackArena,
    active: Vec<TrackId>,
    ctx: &FrameContext<'_>,
) -> Result<HealingOutcome> {
    let config = ctx.config;
    let mut prior_suspects = Vec::new();
    for &id in &active {
        if arena.track(id)?.health() == HealthState::Suspect {
            prior_suspects.push(id);
        }
    }

    let mut outcome = HealingOutcome {
        frame: ctx.frame,
        active,
        ..Default::default()
    };

    if let Some(report) = detect_anomalies(arena, &outcome.active, config.jump_threshold)? {
        for f in report.flags() {
            match f.anomaly {
                Anomaly::Collision { kept } => {
                    trace!("frame {}: track {} collides with {}", ctx.frame, f.track, kept);
                    outcome.collided.push(f.track);
                }
                Anomaly::Jump { .. } | Anomaly::Lost => flag(arena, f.track, &mut outcome)?,
            }
        }
    }
    let collided = outcome.collided.clone();
    outcome.active.retain(|id| !collided.contains(id));

    for id in prior_suspects {
        if collided.contains(&id) {
            continue;
        }
        match attempt_repair(arena.track_mut(id)?, config.healing_threshold) {
            Repair::Healed(midpoint) => {
                trace!("frame {}: track {} healed at {}", ctx.frame, id, midpoint);
                outcome.healed.push(id);
            }
            Repair::Condemned => {
                warn!("frame {}: track {} failed repair and is culled", ctx.frame, id);
                outcome.condemned.push(id);
            }
        }
    }
    let condemned = outcome.condemned.clone();
    outcome.active.retain(|id| !condemned.contains(id));

    if let Some(report) = detect_anomalies(arena, &outcome.active, config.jump_threshold / 2.0)? {
        for id in report.tracks() {
            flag(arena, id, &mut outcome)?;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::candidate::Candidate;
    use crate::tracker::geometry::{Pixel, Rect};
    use crate::tracker::lineage_tracker::TrackerConfig;
    use crate::tracker::track::Sample;

    fn candidate(x: i32, y: i32) -> Candidate {
        Candidate::new(Pixel::new(x, y), Rect::new(x - 2, y - 2, 4, 4).into())
    }

    fn suspect(arena: &mut TrackArena, history: &[(i32, i32)]) -> TrackId {
        let id = arena.spawn_root(&candidate(history[0].0, history[0].1), 0);
        let track = arena.track_mut(id).unwrap();
        for &(x, y) in &history[1..] {
            track.extend(&candidate(x, y));
        }
        track.apply(HealthEvent::Flagged);
        id
    }

    #[test]
    fn test_repair_writes_midpoint() {
        let mut arena = TrackArena::new();
        let id = suspect(&mut arena, &[(50, 50), (90, 10), (52, 51)]);
        let track = arena.track_mut(id).unwrap();

        assert_eq!(
            attempt_repair(track, 10.0),
            Repair::Healed(Position::new(51.0, 50.5))
        );
        assert_eq!(track.health(), HealthState::Healthy);
        assert_eq!(
            track.positions()[1],
            Sample::Interpolated(Position::new(51.0, 50.5))
        );
    }

    #[test]
    fn test_repair_fails_on_second_drift() {
        let mut arena = TrackArena::new();
        let id = suspect(&mut arena, &[(50, 50), (120, 50), (200, 50)]);
        let track = arena.track_mut(id).unwrap();

        assert_eq!(attempt_repair(track, 10.0), Repair::Condemned);
        assert_eq!(track.health(), HealthState::DeathRow);
        assert_eq!(track.positions()[1], Sample::Observed(Position::new(120.0, 50.0)));
    }

    #[test]
    fn test_repair_needs_known_endpoints() {
        let mut arena = TrackArena::new();
        let id = suspect(&mut arena, &[(50, 50), (51, 50)]);
        arena.track_mut(id).unwrap().mark_missed();
        assert_eq!(
            attempt_repair(arena.track_mut(id).unwrap(), 10.0),
            Repair::Condemned
        );

        let short = suspect(&mut arena, &[(50, 50), (51, 50)]);
        assert_eq!(
            attempt_repair(arena.track_mut(short).unwrap(), 10.0),
            Repair::Condemned
        );
    }

    #[test]
    fn test_correct_links_culls_death_row() {
        let config = TrackerConfig {
            healing_threshold: 10.0,
            ..Default::default()
        };
        let mut arena = TrackArena::new();
        let healed = suspect(&mut arena, &[(50, 50), (60, 40), (52, 51)]);
        let doomed = suspect(&mut arena, &[(300, 300), (320, 300), (450, 300)]);

        let ctx = FrameContext {
            frame: 2,
            candidates: &[],
            config: &config,
        };
        let outcome = correct_links(&mut arena, vec![healed, doomed], &ctx).unwrap();

        assert_eq!(outcome.frame, 2);

        assert_eq!(outcome.healed, vec![healed]);
        assert_eq!(outcome.condemned, vec![doomed]);
        assert_eq!(outcome.active, vec![healed]);
        assert_eq!(outcome.culled().collect::<Vec<_>>(), vec![doomed]);
        assert_eq!(arena.get(healed).unwrap().health(), HealthState::Healthy);
        assert_eq!(arena.get(doomed).unwrap().health(), HealthState::DeathRow);
    }

    #[test]
    fn test_correct_links_culls_collision_loser_and_quarantines_jumps() {
        let config = TrackerConfig::default();
        let mut arena = TrackArena::new();
        let steady = arena.spawn_root(&candidate(9, 10), 0);
        arena.track_mut(steady).unwrap().extend(&candidate(10, 10));
        let intruder = arena.spawn_root(&candidate(5, 10), 0);
        arena.track_mut(intruder).unwrap().extend(&candidate(10, 10));
        let jumper = arena.spawn_root(&candidate(100, 100), 0);
        arena.track_mut(jumper).unwrap().extend(&candidate(120, 100));

        let ctx = FrameContext {
            frame: 1,
            candidates: &[],
            config: &config,
        };
        let outcome = correct_links(&mut arena, vec![steady, intruder, jumper], &ctx).unwrap();

        assert_eq!(outcome.frame, 1);
        assert_eq!(outcome.collided, vec![intruder]);
        assert_eq!(outcome.active, vec![steady, jumper]);
        // 20 px is fine over two frames but not over one.
        assert_eq!(outcome.quarantined, vec![jumper]);
        assert_eq!(arena.get(jumper).unwrap().health(), HealthState::Suspect);
        assert_eq!(arena.get(steady).unwrap().health(), HealthState::Healthy);
    }
}
