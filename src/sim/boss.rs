//! Boss encounters
//!
//! A pursuing van shows up every `boss.distance_interval` meters. It is
//! faster and tougher the further the run has gone. Without a shield, touching
//! it ends the run; with one, each hit costs it one health.

use super::collision::{BossContact, resolve_boss};
use super::events::{Cue, GameEvent};
use super::state::{Boss, BossKind, GameState};
use crate::Rect;
use crate::tuning::BossTuning;

/// True once the run has covered another full interval since the last boss
pub fn should_spawn_boss(distance: f32, last_boss_distance: f32, interval: f32) -> bool {
    distance - last_boss_distance >= interval
}

/// Leftward boss speed for the current world speed and distance
pub fn boss_speed(tuning: &BossTuning, world_speed: f32, distance: f32) -> f32 {
    let factor = (tuning.speed_factor + distance * tuning.speed_factor_per_meter)
        .min(tuning.max_speed_factor);
    world_speed * factor
}

/// Starting health for a boss met at `distance`
pub fn boss_health(tuning: &BossTuning, distance: f32) -> u8 {
    let extra = (distance.max(0.0) / tuning.health_step).floor();
    let health = tuning.base_health as f32 + extra;
    health.min(tuning.max_health as f32).max(1.0) as u8
}

/// Bring a boss in from the right edge
pub fn spawn_boss(state: &mut GameState) {
    let boss_tuning = &state.tuning.boss;
    let speed = boss_speed(boss_tuning, state.speed, state.distance);
    let health = boss_health(boss_tuning, state.distance);
    let rect = Rect::new(
        state.tuning.world.width,
        state.tuning.world.ground_y - boss_tuning.height,
        boss_tuning.width,
        boss_tuning.height,
    );
    let id = state.next_entity_id();
    state.boss = Some(Boss {
        id,
        kind: BossKind::Pursuer,
        rect,
        speed,
        health,
        anim: 0,
        removed: false,
    });
    state.last_boss_distance = state.distance;
    log::info!(
        "Boss #{} incoming at {:.0}m (health {}, speed {:.1})",
        id,
        state.distance,
        health,
        speed
    );
    state.push_event(GameEvent::Feedback(Cue::BossIncoming));
}

/// Spawn, move and collide the boss for one frame
pub fn update_boss(state: &mut GameState) -> BossContact {
    if state.boss.is_none()
        && should_spawn_boss(
            state.distance,
            state.last_boss_distance,
            state.tuning.boss.distance_interval,
        )
    {
        spawn_boss(state);
    }

    // Slow-motion scales the boss like everything else
    let slow = if state.speed > 0.0 {
        state.world_speed() / state.speed
    } else {
        1.0
    };
    if let Some(boss) = state.boss.as_mut() {
        boss.rect.pos.x -= boss.speed * slow;
        boss.anim = boss.anim.wrapping_add(1);
        if boss.rect.is_off_left() {
            boss.removed = true;
            log::debug!("Boss #{} drove off", boss.id);
        }
    }

    resolve_boss(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::Loadout;
    use crate::tuning::Tuning;

    #[test]
    fn test_should_spawn_boss_retriggers() {
        assert!(!should_spawn_boss(499.0, 0.0, 500.0));
        assert!(should_spawn_boss(500.0, 0.0, 500.0));
        assert!(!should_spawn_boss(900.0, 500.0, 500.0));
        assert!(should_spawn_boss(10_500.0, 10_000.0, 500.0));
    }

    #[test]
    fn test_boss_gets_harder_with_distance() {
        let tuning = BossTuning::default();
        assert_eq!(boss_health(&tuning, 500.0), 3);
        assert_eq!(boss_health(&tuning, 4100.0), 5);
        assert_eq!(boss_health(&tuning, 1_000_000.0), tuning.max_health);
        assert!(boss_speed(&tuning, 10.0, 5000.0) > boss_speed(&tuning, 10.0, 500.0));
        assert!(boss_speed(&tuning, 10.0, 1_000_000.0) <= 10.0 * tuning.max_speed_factor);
    }

    #[test]
    fn test_boss_spawns_drives_off_and_respawns_later() {
        let mut state = GameState::new(1, Tuning::default(), Loadout::default());
        state.distance = 500.0;
        update_boss(&mut state);
        let boss = state.boss.expect("boss should spawn");
        assert_eq!(state.last_boss_distance, 500.0);
        assert!(boss.rect.left() < state.tuning.world.width);

        // Teleport past the player and let it leave
        state.boss.as_mut().unwrap().rect.pos.x = -boss.rect.size.x + 1.0;
        update_boss(&mut state);
        assert!(state.boss.unwrap().removed);
        crate::sim::spawn::sweep(&mut state);
        assert!(state.boss.is_none());

        // Not yet another full interval
        state.distance = 900.0;
        update_boss(&mut state);
        assert!(state.boss.is_none());
        state.distance = 1000.0;
        update_boss(&mut state);
        assert!(state.boss.is_some());
    }
}
