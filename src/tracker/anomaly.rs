//! Detection of implausible track states after linking.

use crate::error::Result;
use crate::tracker::arena::TrackArena;
use crate::tracker::geometry::Position;
use crate::tracker::track::TrackId;

/// Why a track was flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anomaly {
    /// Shares its newest position with `kept`, which moved no further to get there
    Collision { kept: TrackId },
    /// Newest step is longer than the jump threshold
    Jump { distance: f64 },
    /// No detection was assigned in the newest frame
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flag {
    pub track: TrackId,
    pub anomaly: Anomaly,
}

/// Flagged tracks of one anomaly pass, in active-set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnomalyReport {
    flags: Vec<Flag>,
}

impl AnomalyReport {
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn tracks(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.flags.iter().map(|f| f.track)
    }

    /// Tracks that lost a same-position conflict.
    pub fn collisions(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.flags
            .iter()
            .filter(|f| matches!(f.anomaly, Anomaly::Collision { .. }))
            .map(|f| f.track)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.flags.iter().any(|f| f.track == id)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

struct Holder {
    track: TrackId,
    position: Position,
    distance: f64,
}

/// Scan the active tracks for collisions, jumps and lost detections.
///
/// Tracks sharing a newest position keep only the one with the shortest
/// preceding step; on equal steps the one later in `active` is kept.
/// Collision losers are not checked for jumps. Returns `None` if nothing
/// was flagged.
pub fn detect_anomalies(
    arena: &TrackArena,
    active: &[TrackId],
    jump_threshold: f64,
) -> Result<Option<AnomalyReport>> {
    let mut flags = Vec::new();
    let mut holders: Vec<Holder> = Vec::with_capacity(active.len());
    let mut losers: Vec<(TrackId, Position)> = Vec::new();

    for &id in active {
        let Some(step) = arena.track(id)?.last_step()? else {
            flags.push(Flag {
                track: id,
                anomaly: Anomaly::Lost,
            });
            continue;
        };

        match holders.iter_mut().find(|h| h.position == step.position) {
            Some(holder) if step.distance <= holder.distance => {
                losers.push((holder.track, holder.position));
                holder.track = id;
                holder.distance = step.distance;
            }
            Some(_) => losers.push((id, step.position)),
            None => holders.push(Holder {
                track: id,
                position: step.position,
                distance: step.distance,
            }),
        }
    }

    // Losers name the final survivor at their position.
    for (track, position) in losers {
        if let Some(holder) = holders.iter().find(|h| h.position == position) {
            flags.push(Flag {
                track,
                anomaly: Anomaly::Collision { kept: holder.track },
            });
        }
    }

    for holder in &holders {
        if holder.distance > jump_threshold {
            flags.push(Flag {
                track: holder.track,
                anomaly: Anomaly::Jump {
                    distance: holder.distance,
                },
            });
        }
    }

    // Keep report order aligned with the active set.
    let rank = |id: TrackId| active.iter().position(|&a| a == id);
    flags.sort_by_key(|f| rank(f.track));

    Ok((!flags.is_empty()).then_some(AnomalyReport { flags }))
}
