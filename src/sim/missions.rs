//! Per-session missions
//!
//! Progress only ever moves forward, clamps at the target, and each mission
//! pays its reward exactly once.

use serde::{Deserialize, Serialize};

/// What a mission measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionKind {
    /// Coins picked up
    CollectCoins,
    /// Completed superman combos
    TrickCombo,
    /// Meters traveled before the crash that ends the run
    CrashDistance,
    /// Meters spent grinding
    GrindDistance,
    /// Seconds survived
    SurviveTime,
    /// Ramps launched from
    RampJumps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub kind: MissionKind,
    pub description: String,
    pub target: f32,
    pub progress: f32,
    pub reward: u32,
    pub completed: bool,
}

impl Mission {
    pub fn new(id: u32, kind: MissionKind, description: &str, target: f32, reward: u32) -> Self {
        Self {
            id,
            kind,
            description: description.to_string(),
            target,
            progress: 0.0,
            reward,
            completed: false,
        }
    }

    /// Add progress; returns the reward if this call completed the mission
    fn advance(&mut self, delta: f32) -> Option<u32> {
        if self.completed || delta <= 0.0 {
            return None;
        }
        self.progress = (self.progress + delta).min(self.target);
        if self.progress >= self.target {
            self.completed = true;
            log::info!("Mission complete: {} (+{})", self.description, self.reward);
            return Some(self.reward);
        }
        None
    }
}

/// Outcome of a typed mission update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionProgress {
    /// Whether any mission changed
    pub changed: bool,
    /// Currency earned by missions completed in this update
    pub reward: u32,
}

/// The session's mission list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionBoard {
    pub missions: Vec<Mission>,
}

impl Default for MissionBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionBoard {
    /// Fresh catalog for a new session
    pub fn new() -> Self {
        Self {
            missions: vec![
                Mission::new(1, MissionKind::CollectCoins, "Collect 50 coins", 50.0, 100),
                Mission::new(2, MissionKind::TrickCombo, "Land 3 supermans in a row", 1.0, 150),
                Mission::new(3, MissionKind::CrashDistance, "Crash after 500m", 500.0, 200),
                Mission::new(4, MissionKind::GrindDistance, "Grind 50m in total", 50.0, 150),
                Mission::new(5, MissionKind::SurviveTime, "Survive 60 seconds", 60.0, 100),
                Mission::new(6, MissionKind::RampJumps, "Launch off 5 ramps", 5.0, 120),
            ],
        }
    }

    /// Add `delta` to every incomplete mission of `kind`
    pub fn update(&mut self, kind: MissionKind, delta: f32) -> MissionProgress {
        let mut result = MissionProgress::default();
        for mission in self.missions.iter_mut().filter(|m| m.kind == kind && !m.completed) {
            if delta > 0.0 {
                result.changed = true;
            }
            if let Some(reward) = mission.advance(delta) {
                result.reward += reward;
            }
        }
        result
    }

    pub fn completed_count(&self) -> usize {
        self.missions.iter().filter(|m| m.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reward_paid_once() {
        let mut board = MissionBoard::new();
        let first = board.update(MissionKind::RampJumps, 4.0);
        assert_eq!(first.reward, 0);
        assert!(first.changed);

        let done = board.update(MissionKind::RampJumps, 3.0);
        assert_eq!(done.reward, 120);

        let again = board.update(MissionKind::RampJumps, 1.0);
        assert_eq!(again, MissionProgress::default());

        let mission = board.missions.iter().find(|m| m.kind == MissionKind::RampJumps).unwrap();
        assert!(mission.completed);
        assert!((mission.progress - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_other_kinds_untouched() {
        let mut board = MissionBoard::new();
        board.update(MissionKind::CollectCoins, 10.0);
        for mission in &board.missions {
            if mission.kind != MissionKind::CollectCoins {
                assert_eq!(mission.progress, 0.0);
            }
        }
    }

    #[test]
    fn test_non_positive_delta_is_ignored() {
        let mut board = MissionBoard::new();
        let result = board.update(MissionKind::SurviveTime, 0.0);
        assert!(!result.changed);
        board.update(MissionKind::SurviveTime, -5.0);
        assert!(board.missions.iter().all(|m| m.progress == 0.0));
    }

    proptest! {
        #[test]
        fn progress_is_monotonic_and_pays_once(deltas in prop::collection::vec(0.0f32..30.0, 1..40)) {
            let mut board = MissionBoard::new();
            let mut last = 0.0f32;
            let mut paid = 0u32;
            for delta in deltas {
                let result = board.update(MissionKind::CollectCoins, delta);
                paid += result.reward;
                let mission = &board.missions[0];
                prop_assert!(mission.progress >= last);
                prop_assert!(mission.progress <= mission.target);
                last = mission.progress;
            }
            let mission = &board.missions[0];
            prop_assert_eq!(paid, if mission.completed { mission.reward } else { 0 });
        }
    }
}
