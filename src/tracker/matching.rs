//! Nearest-candidate matching between track histories and a new frame.

use ndarray::{Array2, ArrayView1};

use crate::error::Result;
use crate::tracker::candidate::Candidate;
use crate::tracker::geometry::{Position, to_position};
use crate::tracker::track::Track;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A candidate index paired with its distance from a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Index into the frame's candidate list
    pub candidate: usize,
    /// Euclidean distance from the track's latest position
    pub distance: f64,
}

/// The two closest candidates for one track.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CandidatePair {
    /// Closest candidate, the track's continuation
    pub best: Option<Link>,
    /// Second closest candidate, a potential division child
    pub child: Option<Link>,
}

impl CandidatePair {
    pub fn new(best: Link, child: Option<Link>) -> Self {
        Self {
            best: Some(best),
            child,
        }
    }

    /// Number of links found (0, 1 or 2).
    pub fn len(&self) -> usize {
        usize::from(self.best.is_some()) + usize::from(self.child.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }
}

/// Compute the Euclidean distance matrix between track origins and candidates.
///
/// Returns a matrix of shape (M, N) where M is the length of `origins`
/// and N is the length of `candidates`.
pub fn distance_matrix(origins: &[Position], candidates: &[Candidate]) -> Array2<f64> {
    let targets: Vec<Position> = candidates.iter().map(|c| to_position(c.position)).collect();

    #[cfg(not(feature = "parallel"))]
    let dists = Array2::from_shape_fn((origins.len(), targets.len()), |(i, j)| {
        nalgebra::distance(&origins[i], &targets[j])
    });

    #[cfg(feature = "parallel")]
    let dists = {
        let mut dists = Array2::<f64>::zeros((origins.len(), targets.len()));
        ndarray::Zip::indexed(&mut dists).par_for_each(|(i, j), d| {
            *d = nalgebra::distance(&origins[i], &targets[j]);
        });
        dists
    };

    dists
}

/// Select the two smallest entries of one distance row.
///
/// Comparisons are strict, so on equal distances the candidate that comes
/// first in the row wins.
pub fn nearest_two(row: ArrayView1<'_, f64>) -> CandidatePair {
    let mut pair = CandidatePair::default();
    for (candidate, &distance) in row.iter().enumerate() {
        let link = Link {
            candidate,
            distance,
        };
        match pair.best {
            Some(best) if distance >= best.distance => {
                if pair.child.is_none_or(|child| distance < child.distance) {
                    pair.child = Some(link);
                }
            }
            _ => {
                pair.child = pair.best;
                pair.best = Some(link);
            }
        }
    }
    pair
}

/// Find the two closest candidates for every origin, row for row.
pub fn match_tracks(origins: &[Position], candidates: &[Candidate]) -> Vec<CandidatePair> {
    let dists = distance_matrix(origins, candidates);

    #[cfg(not(feature = "parallel"))]
    let pairs = dists.outer_iter().map(nearest_two).collect();

    #[cfg(feature = "parallel")]
    let pairs = (0..dists.nrows())
        .into_par_iter()
        .map(|i| nearest_two(dists.row(i)))
        .collect();

    pairs
}

/// Find the two candidates closest to a single track's latest known position.
pub fn closest_candidates(track: &Track, candidates: &[Candidate]) -> Result<CandidatePair> {
    let origin = track.latest_position()?;
    let dists = distance_matrix(&[origin], candidates);
    Ok(nearest_two(dists.row(0)))
}
