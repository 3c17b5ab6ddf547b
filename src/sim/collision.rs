//! Collision and interaction resolution
//!
//! Obstacles and the boss are tested with inset boxes so grazing contact is
//! forgiven. Pickups use a circular radius around box centers, which is more
//! forgiving still. Deciding an outcome is separate from applying it so the
//! priority order can be tested on its own.

use super::events::{Cue, GameEvent};
use super::missions::MissionKind;
use super::player::grind_geometry_ok;
use super::state::{GameState, Obstacle, PowerupKind};
use crate::{Rect, within_radius};

/// Outcome of the player touching an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Boxes do not overlap
    NoContact,
    /// Overlap with no effect (launched ramp, invulnerable, already grinding)
    PassThrough,
    RampLaunch,
    ShieldAbsorbed,
    CharityShieldAbsorbed,
    /// Land on the grind surface at this Y
    Grind { surface: f32 },
    Crash,
}

/// Outcome of the player touching the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossContact {
    NoContact,
    /// Shield spent, boss loses one health
    ShieldHit,
    /// Shield spent and the boss is out of health
    Defeated,
    Crash,
}

/// Inset-box overlap between two entities
#[inline]
pub fn boxes_overlap(a: &Rect, b: &Rect, inset_ratio: f32) -> bool {
    a.inset(inset_ratio).intersects(&b.inset(inset_ratio))
}

/// Circular pickup test around box centers
#[inline]
pub fn pickup_in_reach(player: &Rect, item: &Rect, radius: f32) -> bool {
    within_radius(player, item, radius)
}

/// Decide what touching `obstacle` does, first match wins
pub fn decide_obstacle(state: &GameState, obstacle: &Obstacle) -> Interaction {
    let player = &state.player;
    let world = &state.tuning.world;

    if player.crashed || !boxes_overlap(&player.rect, &obstacle.rect, world.hitbox_inset_ratio) {
        return Interaction::NoContact;
    }

    if obstacle.kind.is_ramp() {
        // Each instance launches at most once
        let launched = state.launched_ramps.contains(&obstacle.id);
        if !launched && !player.ramp_boosted {
            return Interaction::RampLaunch;
        }
        if launched {
            return Interaction::PassThrough;
        }
        // A fresh ramp hit mid-boost is a solid obstacle
    }

    let invulnerable = player.flash_ticks > 0;
    if !invulnerable && state.effects.is_active(PowerupKind::Shield) {
        return Interaction::ShieldAbsorbed;
    }
    if !invulnerable && player.has_charity_shield {
        return Interaction::CharityShieldAbsorbed;
    }

    if obstacle.kind.is_grindable() {
        let tolerance = player.rect.size.y * world.grind_tolerance_ratio;
        if grind_geometry_ok(player, &obstacle.rect, tolerance) {
            return Interaction::Grind {
                surface: obstacle.rect.top(),
            };
        }
    }

    if player.grinding || invulnerable {
        return Interaction::PassThrough;
    }
    Interaction::Crash
}

/// Apply a decided interaction to the session
pub fn apply_interaction(state: &mut GameState, obstacle: &Obstacle, interaction: Interaction) {
    match interaction {
        Interaction::NoContact | Interaction::PassThrough => {}
        Interaction::RampLaunch => {
            let physics = state.tuning.physics.clone();
            let player = &mut state.player;
            player.end_slide(&physics);
            player.vy = -physics.jump_impulse * physics.ramp_boost_multiplier;
            player.grounded = false;
            player.grinding = false;
            player.ramp_boosted = true;
            if state.launched_ramps.insert(obstacle.id) {
                state.update_missions(MissionKind::RampJumps, 1.0);
            }
            log::debug!("Ramp launch off obstacle {}", obstacle.id);
            state.push_event(GameEvent::Feedback(Cue::RampLaunch));
        }
        Interaction::ShieldAbsorbed => {
            state.consume_powerup(PowerupKind::Shield);
            state.player.flash_ticks = state.tuning.physics.flash_frames;
            log::debug!("Shield absorbed {:?}", obstacle.kind);
            state.push_event(GameEvent::Feedback(Cue::ShieldBreak));
            state.emit_particles(obstacle.rect.center(), 12, 0x66ccff);
        }
        Interaction::CharityShieldAbsorbed => {
            state.player.has_charity_shield = false;
            state.player.flash_ticks = state.tuning.physics.flash_frames;
            log::debug!("Charity shield absorbed {:?}", obstacle.kind);
            state.push_event(GameEvent::Feedback(Cue::CharityShieldBreak));
            state.report_score();
        }
        Interaction::Grind { surface } => {
            if state.player.attach_grind(surface) {
                state.score += state.tuning.scoring.grind_bonus as f64;
                log::debug!("Grind start on {:?}", obstacle.kind);
                state.push_event(GameEvent::Feedback(Cue::GrindStart));
                state.report_score();
                let sparks = glam::Vec2::new(state.player.center_x(), surface);
                state.emit_particles(sparks, 6, 0xffe066);
            }
        }
        Interaction::Crash => crash(state),
    }
}

/// Decide and apply in one step
pub fn resolve_obstacle(state: &mut GameState, obstacle: &Obstacle) -> Interaction {
    let interaction = decide_obstacle(state, obstacle);
    apply_interaction(state, obstacle, interaction);
    interaction
}

/// Boss contact: a shield trades for one point of boss health, anything else is fatal
pub fn resolve_boss(state: &mut GameState) -> BossContact {
    let Some(boss) = state.boss.filter(|b| !b.removed) else {
        return BossContact::NoContact;
    };
    let inset = state.tuning.world.hitbox_inset_ratio;
    if state.player.crashed || !boxes_overlap(&state.player.rect, &boss.rect, inset) {
        return BossContact::NoContact;
    }

    if !state.consume_powerup(PowerupKind::Shield) {
        crash(state);
        return BossContact::Crash;
    }

    state.player.flash_ticks = state.tuning.physics.flash_frames;
    let knockback = state.tuning.boss.knockback;
    let defeat_bonus = state.tuning.boss.defeat_bonus;
    let Some(boss) = state.boss.as_mut() else {
        return BossContact::NoContact;
    };
    boss.health = boss.health.saturating_sub(1);
    if boss.health == 0 {
        boss.removed = true;
        state.score += defeat_bonus as f64;
        log::info!("Boss defeated at {:.0}m", state.distance);
        state.push_event(GameEvent::Feedback(Cue::BossDefeated));
        state.report_score();
        BossContact::Defeated
    } else {
        boss.rect.pos.x += knockback;
        let health_left = boss.health;
        log::debug!("Boss hit, {health_left} health left");
        state.push_event(GameEvent::Feedback(Cue::BossHit { health_left }));
        BossContact::ShieldHit
    }
}

/// Terminal crash: freeze the player and report the final result once
pub fn crash(state: &mut GameState) {
    if state.player.crashed {
        return;
    }
    let crash_frames = state.tuning.physics.crash_frames;
    state.player.crash(crash_frames);
    log::info!(
        "Crash at {:.0}m, score {}",
        state.distance,
        state.snapshot().score
    );
    state.push_event(GameEvent::Feedback(Cue::Crash));

    if state.distance >= state.tuning.scoring.crash_distance_min {
        let distance = state.distance;
        state.update_missions(MissionKind::CrashDistance, distance);
    }

    if !state.game_over_reported {
        state.game_over_reported = true;
        let snapshot = state.snapshot();
        state.push_event(GameEvent::GameOver {
            final_score: snapshot.score,
            final_coins: snapshot.coins,
        });
    }
}
