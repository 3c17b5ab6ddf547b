//! Player state machine and physics
//!
//! Sub-states are flags on [`PlayerState`]; `crashed` is absorbing. Per-frame
//! order inside [`update_player`]: slide/flash timers, grind support check,
//! gravity integration, landing. Collisions run afterwards in the spawners,
//! so a ramp touched on the landing frame launches from the ground.

use super::events::{Cue, GameEvent};
use super::missions::MissionKind;
use super::state::{GameState, Obstacle, PlayerState, TrickKind};
use crate::Rect;
use crate::tuning::{PhysicsTuning, Tuning};

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        let p = &tuning.physics;
        Self {
            rect: Rect::new(
                p.player_x,
                tuning.world.ground_y - p.player_height,
                p.player_width,
                p.player_height,
            ),
            vy: 0.0,
            grounded: true,
            grinding: false,
            sliding: false,
            tricking: false,
            crashed: false,
            trick: None,
            body_rotation: 0.0,
            board_rotation: 0.0,
            jump_count: 0,
            ramp_boosted: false,
            grind_distance: 0.0,
            crash_ticks: 0,
            slide_ticks: 0,
            flash_ticks: 0,
            carrying: None,
            has_charity_shield: false,
        }
    }

    /// Y of the board's underside
    #[inline]
    pub fn feet(&self) -> f32 {
        self.rect.bottom()
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.rect.center().x
    }

    pub fn is_carrying(&self) -> bool {
        self.carrying.is_some()
    }

    pub fn can_jump(&self, max_jumps: u8) -> bool {
        !self.crashed && (self.grounded || self.grinding || self.jump_count < max_jumps)
    }

    /// Jump (or double jump). Returns false when the jump is not allowed.
    pub fn jump(&mut self, physics: &PhysicsTuning) -> bool {
        if !self.can_jump(physics.max_jumps) {
            return false;
        }
        if self.sliding {
            self.end_slide(physics);
        }
        if self.grounded || self.grinding {
            self.jump_count = 0;
        }
        self.vy = -physics.jump_impulse;
        self.grounded = false;
        self.grinding = false;
        self.jump_count = (self.jump_count + 1).min(physics.max_jumps);
        true
    }

    /// Duck under high obstacles for a fixed number of frames
    pub fn start_slide(&mut self, physics: &PhysicsTuning) -> bool {
        if self.crashed || !self.grounded || self.grinding || self.sliding {
            return false;
        }
        let drop = self.rect.size.y - physics.slide_height;
        self.rect.pos.y += drop;
        self.rect.size.y = physics.slide_height;
        self.sliding = true;
        self.slide_ticks = physics.slide_frames;
        true
    }

    /// Stand back up, keeping the feet where they are
    pub fn end_slide(&mut self, physics: &PhysicsTuning) {
        if !self.sliding {
            return;
        }
        let rise = physics.player_height - self.rect.size.y;
        self.rect.pos.y -= rise;
        self.rect.size.y = physics.player_height;
        self.sliding = false;
        self.slide_ticks = 0;
    }

    /// Begin an air trick. Only allowed airborne and between tricks.
    pub fn start_trick(&mut self, kind: TrickKind) -> bool {
        if self.crashed || self.grounded || self.grinding || self.tricking {
            return false;
        }
        self.tricking = true;
        self.trick = Some(kind);
        true
    }

    /// Touch down on the ground line
    pub fn land(&mut self, ground_y: f32) {
        self.rect.pos.y = ground_y - self.rect.size.y;
        self.vy = 0.0;
        self.grounded = true;
        self.jump_count = 0;
        self.tricking = false;
        self.trick = None;
        self.ramp_boosted = false;
        self.grinding = false;
        self.body_rotation = 0.0;
        self.board_rotation = 0.0;
    }

    /// Snap onto a grind surface. Returns true only for a fresh attachment.
    pub fn attach_grind(&mut self, surface_y: f32) -> bool {
        self.rect.pos.y = surface_y - self.rect.size.y;
        self.vy = 0.0;
        self.grounded = true;
        self.jump_count = 0;
        self.tricking = false;
        self.trick = None;
        self.board_rotation = 0.0;
        let fresh = !self.grinding;
        self.grinding = true;
        fresh
    }

    /// Leave a grind with a small hop so the next frame does not re-attach
    pub fn detach_grind(&mut self, nudge: f32) {
        self.grinding = false;
        self.grounded = false;
        self.vy = -nudge;
    }

    /// Enter the terminal crashed state
    pub fn crash(&mut self, crash_frames: u32) {
        self.crashed = true;
        self.grounded = true;
        self.grinding = false;
        self.tricking = false;
        self.trick = None;
        self.vy = 0.0;
        self.crash_ticks = crash_frames;
    }

    /// Surface Y of a grindable obstacle still under the player, if any
    fn grind_support(&self, obstacles: &[Obstacle], tolerance: f32) -> Option<f32> {
        let cx = self.center_x();
        let feet = self.feet();
        obstacles
            .iter()
            .filter(|o| !o.removed && o.kind.is_grindable())
            .filter(|o| cx >= o.rect.left() && cx <= o.rect.right())
            .map(|o| o.rect.top())
            .find(|top| (top - feet).abs() <= tolerance)
    }
}

/// Advance the player one frame (timers, grind, gravity, landing)
pub fn update_player(state: &mut GameState) {
    if state.player.crashed {
        return;
    }

    let physics = state.tuning.physics.clone();
    let ground_y = state.tuning.world.ground_y;
    let meters_per_frame = state.world_speed() * state.tuning.world.meters_per_px;

    let player = &mut state.player;

    if player.sliding {
        player.slide_ticks = player.slide_ticks.saturating_sub(1);
        if player.slide_ticks == 0 {
            player.end_slide(&physics);
        }
    }
    player.flash_ticks = player.flash_ticks.saturating_sub(1);

    let mut grind_meters = 0.0;
    let mut grind_ended = false;
    if player.grinding {
        let support = player.rect.size.y * state.tuning.world.grind_support_ratio;
        match player.grind_support(&state.obstacles, support) {
            Some(surface) => {
                player.rect.pos.y = surface - player.rect.size.y;
                player.vy = 0.0;
                player.grind_distance += meters_per_frame;
                grind_meters = meters_per_frame;
            }
            None => {
                player.detach_grind(physics.grind_exit_nudge);
                grind_ended = true;
            }
        }
    }

    if !player.grinding {
        player.vy += physics.gravity;
        player.rect.pos.y += player.vy;
        if player.feet() >= ground_y {
            player.land(ground_y);
        } else {
            player.grounded = false;
        }
    }

    if player.tricking {
        match player.trick {
            Some(TrickKind::Basic) => player.board_rotation += physics.trick_spin * 0.5,
            Some(TrickKind::Kickflip) => player.board_rotation += physics.trick_spin,
            Some(TrickKind::Superman) => {
                player.body_rotation = (player.body_rotation + 0.05).min(0.6);
            }
            None => {}
        }
    }

    if grind_ended {
        log::debug!("Grind ended at frame {}", state.frame);
        state.push_event(GameEvent::Feedback(Cue::GrindEnd));
    }
    if grind_meters > 0.0 {
        state.accumulate_missions(MissionKind::GrindDistance, grind_meters);
    }
}

/// Descending, feet within `tolerance` of the top edge, and centered over the span
pub fn grind_geometry_ok(player: &PlayerState, obstacle: &Rect, tolerance: f32) -> bool {
    let feet = player.feet();
    let cx = player.center_x();
    player.vy >= 0.0
        && feet >= obstacle.top() - tolerance
        && feet <= obstacle.top() + tolerance
        && cx >= obstacle.left()
        && cx <= obstacle.right()
}
