mod anomaly;
mod arena;
mod candidate;
mod division;
mod geometry;
mod healing;
mod health_state;
mod linker;
mod lineage_tracker;
mod matching;
mod track;

pub use anomaly::{Anomaly, AnomalyReport, Flag, detect_anomalies};
pub use arena::TrackArena;
pub use candidate::{Candidate, IntoCandidates};
pub use division::{Assignment, resolve_divisions};
pub use geometry::{Boundary, Pixel, Polygon, Position, Rect};
pub use healing::{HealingOutcome, Repair, attempt_repair, correct_links};
pub use health_state::{HealthEvent, HealthState};
pub use lineage_tracker::{FrameReport, LineageTracker, TrackSet, TrackerConfig};
pub use linker::{FrameContext, LinkOutcome, link_frame};
pub use matching::{CandidatePair, Link, closest_candidates, distance_matrix, match_tracks, nearest_two};
pub use track::{Sample, Step, Track, TrackId};
