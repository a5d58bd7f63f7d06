//! Decides which tracks divide in a frame.
//!
//! Every track proposes its closest candidate as a continuation and its second
//! closest as a potential child. A track keeps the child only if it is within
//! `child_distance_threshold`, no other track continues into it, and no other
//! track proposes the same child from a distance that is equal or shorter.
//! Equal distances therefore make both claimants lose the child.

use crate::tracker::matching::CandidatePair;

/// Outcome of resolution for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// No candidate available, the detection was lost this frame
    Lost,
    /// Extend the track with this candidate
    Continue(usize),
    /// Extend with `primary` and spawn a child track on `child`
    Divide { primary: usize, child: usize },
}

impl Assignment {
    /// Number of candidates assigned (0, 1 or 2).
    pub fn len(&self) -> usize {
        match self {
            Assignment::Lost => 0,
            Assignment::Continue(_) => 1,
            Assignment::Divide { .. } => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Assignment::Lost)
    }
}

/// Resolve shared-candidate conflicts across all tracks of one frame.
///
/// The result is index-aligned with `pairs` and does not depend on their order.
/// Runs in O(n²) over tracks.
pub fn resolve_divisions(pairs: &[CandidatePair], child_distance_threshold: f64) -> Vec<Assignment> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| match (pair.best, pair.child) {
            (None, _) => Assignment::Lost,
            (Some(best), Some(child))
                if child.distance <= child_distance_threshold && owns_child(i, pairs) =>
            {
                Assignment::Divide {
                    primary: best.candidate,
                    child: child.candidate,
                }
            }
            (Some(best), _) => Assignment::Continue(best.candidate),
        })
        .collect()
}

fn owns_child(i: usize, pairs: &[CandidatePair]) -> bool {
    let Some(child) = pairs[i].child else {
        return false;
    };

    pairs
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .all(|(_, other)| {
            if other.best.is_some_and(|b| b.candidate == child.candidate) {
                return false;
            }
            match other.child {
                Some(c) if c.candidate == child.candidate => child.distance < c.distance,
                _ => true,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::matching::Link;

    fn pair(best: (usize, f64), child: (usize, f64)) -> CandidatePair {
        CandidatePair::new(
            Link {
                candidate: best.0,
                distance: best.1,
            },
            Some(Link {
                candidate: child.0,
                distance: child.1,
            }),
        )
    }

    // Candidates: 0 = A, 1 = B, 2 = C, 3 = D.

    #[test]
    fn test_no_conflicts() {
        let pairs = [pair((0, 2.0), (3, 10.0)), pair((1, 3.0), (2, 5.0))];
        let resolved = resolve_divisions(&pairs, 50.0);
        assert_eq!(
            resolved,
            vec![
                Assignment::Divide {
                    primary: 0,
                    child: 3
                },
                Assignment::Divide {
                    primary: 1,
                    child: 2
                },
            ]
        );
    }

    #[test]
    fn test_shared_child_goes_to_closer_track() {
        let pairs = [pair((0, 2.0), (2, 10.0)), pair((1, 3.0), (2, 5.0))];
        let resolved = resolve_divisions(&pairs, 50.0);
        assert_eq!(resolved[0], Assignment::Continue(0));
        assert_eq!(
            resolved[1],
            Assignment::Divide {
                primary: 1,
                child: 2
            }
        );
    }

    #[test]
    fn test_child_already_continues_another_track() {
        let pairs = [pair((0, 2.0), (1, 10.0)), pair((1, 3.0), (2, 5.0))];
        let resolved = resolve_divisions(&pairs, 50.0);
        assert_eq!(resolved[0], Assignment::Continue(0));
        assert_eq!(
            resolved[1],
            Assignment::Divide {
                primary: 1,
                child: 2
            }
        );
    }

    #[test]
    fn test_equal_child_distance_both_lose() {
        let forward = [pair((0, 2.0), (2, 10.0)), pair((1, 3.0), (2, 10.0))];
        let resolved = resolve_divisions(&forward, 50.0);
        assert_eq!(resolved, vec![Assignment::Continue(0), Assignment::Continue(1)]);

        let reversed = [forward[1], forward[0]];
        let resolved = resolve_divisions(&reversed, 50.0);
        assert_eq!(resolved, vec![Assignment::Continue(1), Assignment::Continue(0)]);
    }

    #[test]
    fn test_child_beyond_threshold_is_rejected() {
        let pairs = [pair((0, 2.0), (1, 51.0))];
        assert_eq!(resolve_divisions(&pairs, 50.0), vec![Assignment::Continue(0)]);

        let at_threshold = [pair((0, 2.0), (1, 50.0))];
        assert_eq!(resolve_divisions(&at_threshold, 50.0)[0].len(), 2);
    }

    #[test]
    fn test_missing_candidates() {
        let single = CandidatePair::new(
            Link {
                candidate: 4,
                distance: 1.0,
            },
            None,
        );
        let resolved = resolve_divisions(&[single, CandidatePair::default()], 50.0);
        assert_eq!(resolved, vec![Assignment::Continue(4), Assignment::Lost]);
        assert!(resolved[1].is_empty());
    }
}
