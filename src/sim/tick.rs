//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session one frame. Order within a frame:
//! input actions, power-up timers, player physics, obstacle/coin/lost-object/
//! owner spawners (each resolving its own contacts), boss, score and distance
//! bookkeeping, periodic report, particles, removal sweep.

use super::boss::update_boss;
use super::events::GameEvent;
use super::missions::MissionKind;
use super::player::update_player;
use super::spawn;
use super::stage::select_stage;
use super::state::{GamePhase, GameState, ObstacleKind, PowerupKind, TrickKind};
use crate::consts::*;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump: bool,
    pub slide: bool,
    pub trick: Option<TrickKind>,
    /// Pause toggle
    pub pause: bool,
    /// Let the built-in bot play (demo mode, headless runs)
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        let paused = state.phase == GamePhase::Running;
        state.set_paused(paused);
    }

    // Paused, idle and finished sessions are read-only
    if state.phase != GamePhase::Running {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    if input.jump {
        state.jump();
    }
    if input.slide {
        state.slide();
    }
    if let Some(kind) = input.trick {
        state.perform_trick(kind);
    }

    state.frame += 1;

    if state.player.crashed {
        advance_crash(state);
        return;
    }

    for kind in state.effects.tick() {
        state.push_event(GameEvent::PowerupExpired(kind));
    }
    state.charity_message_ticks = state.charity_message_ticks.saturating_sub(1);

    update_player(state);
    spawn::update_obstacles(state);
    spawn::update_coins(state);
    spawn::update_lost_objects(state);
    spawn::update_npcs(state);
    update_boss(state);

    if !state.player.crashed {
        advance_progress(state);
    }

    if state.frame % REPORT_INTERVAL_FRAMES == 0 {
        state.report_score();
        let missions = state.missions.missions.clone();
        state.push_event(GameEvent::MissionsUpdated(missions));
    }

    update_particles(state);
    spawn::sweep(state);
}

/// Score, distance, speed, stage and continuous missions
fn advance_progress(state: &mut GameState) {
    let world = &state.tuning.world;
    let scoring = &state.tuning.scoring;

    let speed_ratio = state.speed / world.base_speed;
    let speed_bonus = if world.max_speed > world.base_speed {
        (state.speed - world.base_speed) / (world.max_speed - world.base_speed) * scoring.speed_bonus
    } else {
        0.0
    };
    state.score +=
        (speed_ratio * state.combo * (1.0 + speed_bonus) * scoring.score_per_frame) as f64;

    state.distance += state.world_speed() * world.meters_per_px;
    // Never slow down within a run
    state.speed = state.tuning.speed_for_distance(state.distance).max(state.speed);

    let stage = select_stage(state.distance, &state.tuning.stages);
    if stage != state.stage {
        state.stage = stage;
        if let Some(name) = state.stage_name().map(str::to_string) {
            log::info!("Entering {} at {:.0}m", name, state.distance);
            state.push_event(GameEvent::StageChanged(name));
        }
    }

    state.accumulate_missions(MissionKind::SurviveTime, FRAME_SECS);
}

/// Crash tumble; the world stands still until the run is over
fn advance_crash(state: &mut GameState) {
    let player = &mut state.player;
    player.crash_ticks = player.crash_ticks.saturating_sub(1);
    player.body_rotation += 0.25;
    if player.crash_ticks == 0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {} frames, final score {}",
            state.frame,
            state.snapshot().score
        );
    }
    update_particles(state);
    spawn::sweep(state);
}

fn update_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += 0.15;
        particle.life -= 1.0 / 40.0;
        particle.size *= 0.98;
    }
}

/// Simple bot: ride ramps and low rails, jump everything else, trick at the apex
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    if player.crashed {
        return;
    }

    let lookahead = state.world_speed() * 14.0;
    let tolerance = player.rect.size.y * state.tuning.world.grind_tolerance_ratio;
    let ground_y = state.tuning.world.ground_y;

    let threat_ahead = state.obstacles.iter().any(|o| {
        let gap = o.rect.left() - player.rect.right();
        let reach = if o.kind == ObstacleKind::Car {
            lookahead * state.tuning.world.car_speed_multiplier
        } else {
            lookahead
        };
        let rideable_ramp = o.kind.is_ramp()
            && (!player.ramp_boosted || state.launched_ramps.contains(&o.id));
        let harmless =
            rideable_ramp || (o.kind.is_grindable() && ground_y - o.rect.top() <= tolerance);
        !o.removed && !harmless && gap > 0.0 && gap < reach
    });
    let boss_ahead = state.boss.is_some_and(|b| {
        let gap = b.rect.left() - player.rect.right();
        gap > 0.0 && gap < b.speed * 16.0
    }) && !state.effects.is_active(PowerupKind::Shield);

    if (threat_ahead || boss_ahead) && (player.grounded || player.grinding) {
        input.jump = true;
    } else if !player.grounded && !player.tricking && player.vy > -1.5 && player.vy < 0.0 {
        input.trick = Some(if player.ramp_boosted {
            TrickKind::Superman
        } else {
            TrickKind::Kickflip
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::{Loadout, StartPowerups};
    use crate::sim::spawn::spawn_obstacle;
    use crate::tuning::Tuning;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), Loadout::default());
        state.set_active(true);
        state
    }

    #[test]
    fn test_idle_session_does_not_tick() {
        let mut state = GameState::new(1, Tuning::default(), Loadout::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 0);
        assert_eq!(state.distance, 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = running(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 1);

        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle);
        assert_eq!(state.phase, GamePhase::Paused);
        let (frame, distance, score) = (state.frame, state.distance, state.score);

        // Paused ticks change nothing, and resuming does not catch up
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!((state.frame, state.distance, state.score), (frame, distance, score));

        tick(&mut state, &toggle);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.frame, frame + 1);
    }

    #[test]
    fn test_distance_speed_and_score_advance() {
        let mut state = running(2);
        let mut last_speed = state.speed;
        for _ in 0..600 {
            state.obstacles.clear();
            state.boss = None;
            tick(&mut state, &TickInput::default());
            assert!(state.speed >= last_speed);
            last_speed = state.speed;
        }
        assert!(state.distance > 0.0);
        assert!(state.score > 0.0);
        assert!(state.speed > state.tuning.world.base_speed);
    }

    #[test]
    fn test_start_powerups_expire_with_event() {
        let mut tuning = Tuning::default();
        tuning.powerups.magnet_frames = 3;
        let loadout = Loadout {
            powerups: StartPowerups {
                magnet: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = GameState::new(4, tuning, loadout);
        state.set_active(true);
        assert!(state.effects.is_active(PowerupKind::Magnet));
        for _ in 0..3 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.effects.is_active(PowerupKind::Magnet));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PowerupExpired(PowerupKind::Magnet)));
    }

    #[test]
    fn test_stage_change_reported() {
        let mut state = running(5);
        state.distance = 299.99;
        state.obstacles.clear();
        tick(&mut state, &TickInput::default());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::StageChanged("Market Street".to_string())));
        assert_eq!(state.stage_name(), Some("Market Street"));
    }

    #[test]
    fn test_crash_plays_out_then_game_over() {
        let mut state = running(6);
        spawn_obstacle(&mut state, ObstacleKind::TrashCan);
        state.obstacles[0].rect.pos.x = state.player.rect.left();
        tick(&mut state, &TickInput::default());
        assert!(state.player.crashed);
        assert_eq!(state.phase, GamePhase::Running);

        let distance = state.distance;
        let crash_frames = state.tuning.physics.crash_frames;
        for _ in 0..crash_frames {
            tick(&mut state, &TickInput { jump: true, ..Default::default() });
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.distance, distance);

        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_ramp_on_landing_frame_launches() {
        let mut state = running(8);
        // Falling onto the ground this frame with a ramp underfoot
        state.jump();
        state.player.vy = 5.0;
        state.player.ramp_boosted = true;
        state.player.rect.pos.y = state.tuning.world.ground_y - state.player.rect.size.y - 1.0;
        let id = spawn_obstacle(&mut state, ObstacleKind::BigRamp);
        state.obstacles[0].rect.pos.x = state.player.rect.left() - 10.0 + state.world_speed();
        tick(&mut state, &TickInput::default());
        // Landing cleared the old boost, then the ramp launched again
        assert!(state.player.ramp_boosted);
        assert!(state.player.vy < 0.0);
        assert!(state.launched_ramps.contains(&id));
    }

    #[test]
    fn test_out_of_range_tuning_runs_cleanly() {
        let json = r#"{
            "world": { "base_speed": 0.0 },
            "spawn": {
                "coin_chance": 1.5, "coin_interval": 1, "coin_band": 0.0,
                "lost_object_chance": 2.0, "lost_object_interval": 1
            }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        let mut state = GameState::new(3, tuning, Loadout::default());
        state.set_active(true);
        for _ in 0..300 {
            tick(&mut state, &TickInput { autopilot: true, ..Default::default() });
        }
        assert!(state.score.is_finite());
        assert!(state.distance.is_finite());
        assert!(state.frame > 0);
    }

    #[test]
    fn test_session_sanitizes_hand_built_tuning() {
        let mut tuning = Tuning::default();
        tuning.spawn.coin_chance = -1.0;
        tuning.spawn.coin_band = -10.0;
        tuning.world.base_speed = f32::NAN;
        let mut state = GameState::new(4, tuning, Loadout::default());
        assert_eq!(state.tuning.spawn.coin_chance, 0.0);
        assert!(state.tuning.spawn.coin_band > 0.0);
        assert!(state.tuning.world.base_speed > 0.0);
        state.set_active(true);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.score.is_finite());
    }

    #[test]
    fn test_determinism() {
        let mut a = running(99999);
        let mut b = running(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.score, b.score);
        assert_eq!(a.coin_count, b.coin_count);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.crashed, b.player.crashed);
    }

    #[test]
    fn test_entity_lists_stay_bounded() {
        let mut state = running(77);
        state.grant_powerup(PowerupKind::Shield);
        for _ in 0..5000 {
            if state.player.crashed {
                break;
            }
            state.grant_powerup(PowerupKind::Shield);
            tick(&mut state, &TickInput { autopilot: true, ..Default::default() });
            assert!(state.obstacles.len() < 40);
            assert!(state.coins.len() < 60);
        }
    }
}
