//! Entity spawners
//!
//! Each spawner runs once per frame: maybe spawn, scroll everything left at
//! world speed, resolve contact with the player, and flag anything that left
//! the screen. Flagged entities are dropped by [`sweep`] at the end of the
//! frame, never while iterating.

use rand::Rng;

use super::collision::{Interaction, pickup_in_reach, resolve_obstacle};
use super::events::{Cue, GameEvent};
use super::missions::MissionKind;
use super::state::{
    Coin, GameState, LostObject, LostObjectKind, NpcState, Obstacle, ObstacleKind, OwnerNpc,
    PowerupKind,
};
use crate::Rect;

/// Obstacles: interval shrinks with distance, uniform kind
pub fn update_obstacles(state: &mut GameState) {
    state.spawn_clock.obstacle += 1;
    if state.spawn_clock.obstacle >= state.tuning.obstacle_interval(state.distance) {
        state.spawn_clock.obstacle = 0;
        let index = state.rng.random_range(0..ObstacleKind::ALL.len());
        spawn_obstacle(state, ObstacleKind::ALL[index]);
    }

    let speed = state.world_speed();
    let car_speed = speed * state.tuning.world.car_speed_multiplier;
    for obstacle in &mut state.obstacles {
        obstacle.rect.pos.x -= match obstacle.kind {
            ObstacleKind::Car => car_speed,
            _ => speed,
        };
        obstacle.anim = obstacle.anim.wrapping_add(1);
        if obstacle.rect.is_off_left() {
            obstacle.removed = true;
        }
    }

    for i in 0..state.obstacles.len() {
        if state.player.crashed {
            break;
        }
        let obstacle = state.obstacles[i];
        if obstacle.removed {
            continue;
        }
        let interaction = resolve_obstacle(state, &obstacle);
        if matches!(
            interaction,
            Interaction::ShieldAbsorbed | Interaction::CharityShieldAbsorbed
        ) {
            // Smashed by the shield
            state.obstacles[i].removed = true;
        }
    }
}

/// Place a new obstacle of `kind` at the right edge, resting on the ground
pub fn spawn_obstacle(state: &mut GameState, kind: ObstacleKind) -> u32 {
    let id = state.next_entity_id();
    let size = kind.size();
    let x = state.tuning.world.width;
    let y = state.tuning.world.ground_y - size.y - kind.ground_offset();
    state.obstacles.push(Obstacle {
        id,
        kind,
        rect: Rect::new(x, y, size.x, size.y),
        anim: 0,
        removed: false,
    });
    log::debug!("Spawned {:?} #{} at {:.0}m", kind, id, state.distance);
    id
}

/// Coins: fixed-interval chance, magnet pull, circular pickup
pub fn update_coins(state: &mut GameState) {
    let spawn = state.tuning.spawn.clone();
    state.spawn_clock.coin += 1;
    if state.spawn_clock.coin >= spawn.coin_interval {
        state.spawn_clock.coin = 0;
        if state.rng.random_bool(spawn.coin_chance) {
            let lift = state.rng.random_range(0.0..spawn.coin_band);
            let y = state.tuning.world.ground_y - spawn.coin_size - lift;
            let x = state.tuning.world.width;
            spawn_coin(state, x, y);
        }
    }

    let speed = state.world_speed();
    let magnet = state.effects.is_active(PowerupKind::Magnet);
    let magnet_radius = state.tuning.powerups.magnet_radius;
    let magnet_pull = state.tuning.powerups.magnet_pull;
    let target = state.player.rect.center();
    for coin in &mut state.coins {
        coin.rect.pos.x -= speed;
        coin.rotation += 0.1;
        if magnet {
            let to_player = target - coin.rect.center();
            let dist = to_player.length();
            if dist > 0.0 && dist < magnet_radius {
                coin.rect.pos += to_player / dist * magnet_pull.min(dist);
            }
        }
        if coin.rect.is_off_left() {
            coin.removed = true;
        }
    }

    if state.player.crashed {
        return;
    }
    for i in 0..state.coins.len() {
        let coin = state.coins[i];
        if !coin.removed && pickup_in_reach(&state.player.rect, &coin.rect, spawn.pickup_radius) {
            state.coins[i].removed = true;
            collect_coin(state);
        }
    }
}

pub fn spawn_coin(state: &mut GameState, x: f32, y: f32) -> u32 {
    let id = state.next_entity_id();
    let size = state.tuning.spawn.coin_size;
    state.coins.push(Coin {
        id,
        rect: Rect::new(x, y, size, size),
        rotation: 0.0,
        removed: false,
    });
    id
}

/// Credit one coin; every Nth coin grants a charity shield
pub fn collect_coin(state: &mut GameState) {
    let scoring = &state.tuning.scoring;
    let per_shield = scoring.charity_coins_per_shield;
    let message_frames = scoring.charity_message_frames;
    state.coin_count += 1;
    state.score += (scoring.coin_score * state.double_factor()) as f64;
    state.push_event(GameEvent::Feedback(Cue::Coin));

    state.charity_coins += 1;
    if state.charity_coins >= per_shield {
        state.charity_coins = 0;
        state.player.has_charity_shield = true;
        state.charity_message_ticks = message_frames;
        log::info!("Charity shield granted at {} coins", state.coin_count);
        state.push_event(GameEvent::Feedback(Cue::CharityShieldGranted));
    }

    state.update_missions(MissionKind::CollectCoins, 1.0);
    state.report_score();
}

/// Lost objects: only offered while the player's hands are free
pub fn update_lost_objects(state: &mut GameState) {
    let spawn = state.tuning.spawn.clone();
    state.spawn_clock.lost_object += 1;
    if state.spawn_clock.lost_object >= spawn.lost_object_interval {
        state.spawn_clock.lost_object = 0;
        let on_screen = state.lost_objects.iter().any(|o| !o.removed);
        if !state.player.is_carrying()
            && !on_screen
            && state.rng.random_bool(spawn.lost_object_chance)
        {
            let index = state.rng.random_range(0..LostObjectKind::ALL.len());
            let lift = state.rng.random_range(0.0..spawn.coin_band * 0.5);
            let y = state.tuning.world.ground_y - spawn.lost_object_size - lift;
            let x = state.tuning.world.width;
            spawn_lost_object(state, LostObjectKind::ALL[index], x, y);
        }
    }

    let speed = state.world_speed();
    for object in &mut state.lost_objects {
        object.rect.pos.x -= speed;
        object.rotation += 0.05;
        if object.rect.is_off_left() {
            object.removed = true;
        }
    }

    if state.player.crashed || state.player.is_carrying() {
        return;
    }
    for i in 0..state.lost_objects.len() {
        let object = state.lost_objects[i];
        if !object.removed && pickup_in_reach(&state.player.rect, &object.rect, spawn.pickup_radius)
        {
            state.lost_objects[i].removed = true;
            state.player.carrying = Some(object.kind);
            log::debug!("Picked up lost {:?}", object.kind);
            state.push_event(GameEvent::Feedback(Cue::LostObjectPickup(object.kind)));
            break;
        }
    }
}

pub fn spawn_lost_object(state: &mut GameState, kind: LostObjectKind, x: f32, y: f32) -> u32 {
    let id = state.next_entity_id();
    let size = state.tuning.spawn.lost_object_size;
    state.lost_objects.push(LostObject {
        id,
        kind,
        rect: Rect::new(x, y, size, size),
        rotation: 0.0,
        removed: false,
    });
    id
}

/// Owners: one waiting owner at a time, only while something is carried
pub fn update_npcs(state: &mut GameState) {
    let spawn = state.tuning.spawn.clone();
    state.spawn_clock.npc += 1;
    if state.spawn_clock.npc >= spawn.npc_interval {
        state.spawn_clock.npc = 0;
        let waiting = state
            .npcs
            .iter()
            .any(|n| !n.removed && n.state == NpcState::Waiting);
        if state.player.is_carrying() && !waiting && state.rng.random_bool(spawn.npc_chance) {
            let x = state.tuning.world.width;
            spawn_npc(state, x);
        }
    }

    let speed = state.world_speed();
    for npc in &mut state.npcs {
        npc.rect.pos.x -= speed;
        if npc.rect.is_off_left() {
            npc.removed = true;
        }
    }

    if state.player.crashed {
        return;
    }
    for i in 0..state.npcs.len() {
        let npc = state.npcs[i];
        if npc.removed || npc.state != NpcState::Waiting {
            continue;
        }
        if !pickup_in_reach(&state.player.rect, &npc.rect, spawn.npc_contact_radius) {
            continue;
        }
        let Some(kind) = state.player.carrying.take() else {
            break;
        };
        state.npcs[i].state = NpcState::Happy;
        state.score += (kind.value() * 2.0) as f64;
        state.coin_count += state.tuning.scoring.return_coin_bonus;
        log::debug!("Returned {:?} to owner #{}", kind, npc.id);
        state.push_event(GameEvent::Feedback(Cue::LostObjectReturned(kind)));
        state.report_score();
        break;
    }
}

pub fn spawn_npc(state: &mut GameState, x: f32) -> u32 {
    let id = state.next_entity_id();
    let spawn = &state.tuning.spawn;
    let rect = Rect::new(
        x,
        state.tuning.world.ground_y - spawn.npc_height,
        spawn.npc_width,
        spawn.npc_height,
    );
    state.npcs.push(OwnerNpc {
        id,
        rect,
        state: NpcState::Waiting,
        removed: false,
    });
    id
}

/// End-of-frame removal pass
pub fn sweep(state: &mut GameState) {
    state.obstacles.retain(|o| !o.removed);
    state.coins.retain(|c| !c.removed);
    state.lost_objects.retain(|o| !o.removed);
    state.npcs.retain(|n| !n.removed);
    if state.boss.is_some_and(|b| b.removed) {
        state.boss = None;
    }
    state.particles.retain(|p| p.life > 0.0);

    // Forget launched ramps that have scrolled away
    let obstacles = &state.obstacles;
    state
        .launched_ramps
        .retain(|id| obstacles.iter().any(|o| o.id == *id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::Loadout;
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        GameState::new(11, Tuning::default(), Loadout::default())
    }

    #[test]
    fn test_obstacles_scroll_and_get_swept() {
        let mut state = new_state();
        let id = spawn_obstacle(&mut state, ObstacleKind::Bush);
        state.obstacles[0].rect.pos.x = -45.0;
        update_obstacles(&mut state);
        assert!(state.obstacles.iter().find(|o| o.id == id).unwrap().removed);
        sweep(&mut state);
        assert!(state.obstacles.iter().all(|o| o.id != id));
    }

    #[test]
    fn test_cars_move_faster() {
        let mut state = new_state();
        spawn_obstacle(&mut state, ObstacleKind::Car);
        spawn_obstacle(&mut state, ObstacleKind::Dog);
        let start = state.tuning.world.width;
        update_obstacles(&mut state);
        let car = state.obstacles.iter().find(|o| o.kind == ObstacleKind::Car).unwrap();
        let dog = state.obstacles.iter().find(|o| o.kind == ObstacleKind::Dog).unwrap();
        assert!(start - car.rect.left() > start - dog.rect.left());
    }

    #[test]
    fn test_obstacles_rest_on_ground() {
        let mut state = new_state();
        let ground_y = state.tuning.world.ground_y;
        for kind in ObstacleKind::ALL {
            spawn_obstacle(&mut state, kind);
        }
        for obstacle in &state.obstacles {
            let expected = ground_y - obstacle.kind.ground_offset();
            assert!((obstacle.rect.bottom() - expected).abs() < 0.001);
        }
    }

    #[test]
    fn test_launched_ramp_forgotten_after_sweep() {
        let mut state = new_state();
        let id = spawn_obstacle(&mut state, ObstacleKind::SmallRamp);
        state.launched_ramps.insert(id);
        sweep(&mut state);
        assert!(state.launched_ramps.contains(&id));
        state.obstacles[0].removed = true;
        sweep(&mut state);
        assert!(state.launched_ramps.is_empty());
    }

    #[test]
    fn test_coin_pickup_is_circular() {
        let mut state = new_state();
        let center = state.player.rect.center();
        let right = state.player.rect.right();
        let size = state.tuning.spawn.coin_size;
        let speed = state.world_speed();

        // Diagonally away from the player: out of reach
        spawn_coin(&mut state, right + 20.0 + speed, center.y - 60.0);
        update_coins(&mut state);
        assert_eq!(state.coin_count, 0);

        // Just past the player's box edge but close to its center: collected
        spawn_coin(&mut state, right + 2.0 + speed, center.y - size / 2.0);
        update_coins(&mut state);
        assert_eq!(state.coin_count, 1);
        assert_eq!(state.coins.iter().filter(|c| !c.removed).count(), 1);
    }

    #[test]
    fn test_magnet_pulls_coins() {
        let mut state = new_state();
        state.grant_powerup(PowerupKind::Magnet);
        let center = state.player.rect.center();
        spawn_coin(&mut state, center.x + 150.0, center.y - 60.0);
        let before = state.coins[0].rect.center().distance(center);
        update_coins(&mut state);
        let after = state.coins[0].rect.center().distance(center);
        assert!(after < before - state.world_speed() * 0.5);
    }

    #[test]
    fn test_twenty_coins_grant_charity_shield() {
        let mut state = new_state();
        for _ in 0..19 {
            collect_coin(&mut state);
        }
        assert!(!state.player.has_charity_shield);
        assert_eq!(state.charity_coins, 19);
        collect_coin(&mut state);
        assert!(state.player.has_charity_shield);
        assert_eq!(state.charity_coins, 0);
        assert_eq!(state.coin_count, 20);
        assert!(state.charity_message_ticks > 0);
    }

    #[test]
    fn test_no_lost_object_spawn_while_carrying() {
        let mut tuning = Tuning::default();
        tuning.spawn.lost_object_interval = 1;
        tuning.spawn.lost_object_chance = 1.0;
        let mut state = GameState::new(5, tuning, Loadout::default());
        state.player.carrying = Some(LostObjectKind::Keys);
        for _ in 0..10 {
            update_lost_objects(&mut state);
        }
        assert!(state.lost_objects.is_empty());

        state.player.carrying = None;
        update_lost_objects(&mut state);
        assert_eq!(state.lost_objects.len(), 1);
    }

    #[test]
    fn test_single_waiting_owner() {
        let mut tuning = Tuning::default();
        tuning.spawn.npc_interval = 1;
        tuning.spawn.npc_chance = 1.0;
        let mut state = GameState::new(5, tuning, Loadout::default());
        for _ in 0..10 {
            update_npcs(&mut state);
        }
        assert!(state.npcs.is_empty());

        state.player.carrying = Some(LostObjectKind::Book);
        for _ in 0..10 {
            update_npcs(&mut state);
        }
        assert_eq!(state.npcs.len(), 1);
    }
}
