/// Quarantine status of a track.
///
/// A track flagged as anomalous becomes `Suspect` and gets exactly one frame
/// to be repaired. A failed repair sends it to `DeathRow`, which is terminal.
///
/// | state \ event | Flagged  | Repaired | RepairFailed |
/// |---------------|----------|----------|--------------|
/// | Healthy       | Suspect  | Healthy  | Healthy      |
/// | Suspect       | Suspect  | Healthy  | DeathRow     |
/// | DeathRow      | DeathRow | DeathRow | DeathRow     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthState {
    /// Track is trusted
    #[default]
    Healthy,
    /// Track was flagged last frame and awaits a repair attempt
    Suspect,
    /// Track failed repair and will be culled
    DeathRow,
}

/// Events driving [`HealthState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEvent {
    /// The anomaly detector flagged the track
    Flagged,
    /// The bad frame was smoothed over
    Repaired,
    /// The track drifted again and could not be smoothed
    RepairFailed,
}

impl HealthState {
    pub fn transition(self, event: HealthEvent) -> Self {
        use HealthEvent::*;
        use HealthState::*;

        match (self, event) {
            (DeathRow, _) => DeathRow,
            (Healthy, Flagged) | (Suspect, Flagged) => Suspect,
            (Suspect, Repaired) => Healthy,
            (Suspect, RepairFailed) => DeathRow,
            (Healthy, Repaired) | (Healthy, RepairFailed) => Healthy,
        }
    }

    /// Numeric level (0, 1, 2) for tabular output.
    pub fn level(self) -> u8 {
        match self {
            HealthState::Healthy => 0,
            HealthState::Suspect => 1,
            HealthState::DeathRow => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarantine_then_heal() {
        let state = HealthState::default().transition(HealthEvent::Flagged);
        assert_eq!(state, HealthState::Suspect);
        assert_eq!(state.transition(HealthEvent::Repaired), HealthState::Healthy);
    }

    #[test]
    fn test_death_row_is_terminal() {
        let state = HealthState::Suspect.transition(HealthEvent::RepairFailed);
        assert_eq!(state, HealthState::DeathRow);
        for event in [
            HealthEvent::Flagged,
            HealthEvent::Repaired,
            HealthEvent::RepairFailed,
        ] {
            assert_eq!(state.transition(event), HealthState::DeathRow);
        }
    }

    #[test]
    fn test_healthy_never_skips_to_death_row() {
        assert_eq!(
            HealthState::Healthy.transition(HealthEvent::RepairFailed),
            HealthState::Healthy
        );
        assert_eq!(HealthState::Suspect.level(), 1);
    }
}
