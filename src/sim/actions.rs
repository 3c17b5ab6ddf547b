//! Entry points for the outside world
//!
//! Actions apply immediately at the point of call. Anything asked of a
//! session that is not running, or of a crashed player, is a silent no-op;
//! the returned `bool` only says whether the action took effect.

use super::events::{Cue, GameEvent};
use super::missions::MissionKind;
use super::state::{GamePhase, GameState, TrickKind};

impl GameState {
    /// Whether actions are currently honored
    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Running && !self.player.crashed
    }

    /// Start or stop the session clock. A finished run stays finished.
    pub fn set_active(&mut self, active: bool) {
        self.phase = match (self.phase, active) {
            (GamePhase::GameOver, _) => GamePhase::GameOver,
            (GamePhase::Idle, true) => {
                log::info!("Session started");
                GamePhase::Running
            }
            (phase, true) => phase,
            (_, false) => GamePhase::Idle,
        };
    }

    /// Freeze or resume. Resuming never simulates the time spent paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (GamePhase::Running, true) => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Running,
            (phase, _) => phase,
        };
    }

    /// Throw the run away and start over with the same tuning and loadout
    pub fn restart(&mut self, seed: u64) {
        *self = GameState::new(seed, self.tuning.clone(), self.loadout);
    }

    pub fn jump(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let physics = self.tuning.physics.clone();
        let double = !self.player.grounded && !self.player.grinding;
        if !self.player.jump(&physics) {
            return false;
        }
        self.push_event(GameEvent::Feedback(Cue::Jump { double }));
        let feet = glam::Vec2::new(self.player.center_x(), self.player.feet());
        let count = self.loadout.jump_particles();
        let color = self.loadout.cosmetic.particle_color();
        self.emit_particles(feet, count, color);
        true
    }

    pub fn slide(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let physics = self.tuning.physics.clone();
        if !self.player.start_slide(&physics) {
            return false;
        }
        self.push_event(GameEvent::Feedback(Cue::Slide));
        true
    }

    /// Air trick. Points double off a ramp and again with the double power-up.
    pub fn perform_trick(&mut self, kind: TrickKind) -> bool {
        if !self.accepts_input() || !self.player.start_trick(kind) {
            return false;
        }

        let mut points = kind.base_points(&self.tuning);
        if self.player.ramp_boosted {
            points *= 2.0;
        }
        points *= self.double_factor();
        self.score += points as f64;
        log::debug!("{:?} for {} points", kind, points);
        self.push_event(GameEvent::Feedback(Cue::Trick { kind, points }));

        if kind == TrickKind::Superman {
            self.superman_streak += 1;
            if self.superman_streak >= self.tuning.scoring.superman_combo {
                self.superman_streak = 0;
                self.update_missions(MissionKind::TrickCombo, 1.0);
            }
        } else {
            self.superman_streak = 0;
        }

        self.report_score();
        true
    }
}
