//! Session state and core simulation types
//!
//! One `GameState` holds everything a run needs. Every subsystem takes it as
//! an explicit `&mut` parameter; there are no globals.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, ScoreSnapshot};
use super::missions::{MissionBoard, MissionKind};
use crate::Rect;
use crate::loadout::Loadout;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initialized but not started (menu still up)
    Idle,
    /// Active gameplay
    Running,
    /// Frozen; state can be read but nothing advances
    Paused,
    /// Run ended
    GameOver,
}

/// Timed power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Shield,
    Magnet,
    Double,
    Slow,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Shield,
        PowerupKind::Magnet,
        PowerupKind::Double,
        PowerupKind::Slow,
    ];
}

/// Air tricks, in ascending value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrickKind {
    Basic,
    Kickflip,
    Superman,
}

impl TrickKind {
    pub fn base_points(&self, tuning: &Tuning) -> f32 {
        match self {
            TrickKind::Basic => tuning.scoring.basic_trick,
            TrickKind::Kickflip => tuning.scoring.kickflip_trick,
            TrickKind::Superman => tuning.scoring.superman_trick,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    WoodBench,
    MetalBench,
    ParkBench,
    Bush,
    Dog,
    Cat,
    SmallRamp,
    BigRamp,
    FireHydrant,
    TrashCan,
    Rail,
    Car,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 12] = [
        ObstacleKind::WoodBench,
        ObstacleKind::MetalBench,
        ObstacleKind::ParkBench,
        ObstacleKind::Bush,
        ObstacleKind::Dog,
        ObstacleKind::Cat,
        ObstacleKind::SmallRamp,
        ObstacleKind::BigRamp,
        ObstacleKind::FireHydrant,
        ObstacleKind::TrashCan,
        ObstacleKind::Rail,
        ObstacleKind::Car,
    ];

    pub fn is_ramp(&self) -> bool {
        matches!(self, ObstacleKind::SmallRamp | ObstacleKind::BigRamp)
    }

    /// Rails and benches can be ground along their top edge
    pub fn is_grindable(&self) -> bool {
        matches!(
            self,
            ObstacleKind::Rail
                | ObstacleKind::WoodBench
                | ObstacleKind::MetalBench
                | ObstacleKind::ParkBench
        )
    }

    /// Width and height in world pixels
    pub fn size(&self) -> Vec2 {
        let (w, h) = match self {
            ObstacleKind::WoodBench => (90.0, 36.0),
            ObstacleKind::MetalBench => (100.0, 34.0),
            ObstacleKind::ParkBench => (120.0, 38.0),
            ObstacleKind::Bush => (50.0, 40.0),
            ObstacleKind::Dog => (44.0, 32.0),
            ObstacleKind::Cat => (30.0, 24.0),
            ObstacleKind::SmallRamp => (70.0, 30.0),
            ObstacleKind::BigRamp => (100.0, 45.0),
            ObstacleKind::FireHydrant => (24.0, 40.0),
            ObstacleKind::TrashCan => (34.0, 48.0),
            ObstacleKind::Rail => (160.0, 16.0),
            ObstacleKind::Car => (120.0, 50.0),
        };
        Vec2::new(w, h)
    }

    /// Gap between the ground line and the obstacle's underside.
    ///
    /// Rails stand on short posts; everything else rests on the sidewalk.
    pub fn ground_offset(&self) -> f32 {
        match self {
            ObstacleKind::Rail => 4.0,
            _ => 0.0,
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Animation frame counter (cosmetic)
    pub anim: u32,
    pub removed: bool,
}

/// A collectible coin
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub rect: Rect,
    pub rotation: f32,
    pub removed: bool,
}

/// Items the player can return to their owners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LostObjectKind {
    Book,
    Keys,
    Wallet,
}

impl LostObjectKind {
    pub const ALL: [LostObjectKind; 3] = [
        LostObjectKind::Book,
        LostObjectKind::Keys,
        LostObjectKind::Wallet,
    ];

    /// Base score value; returning it pays double
    pub fn value(&self) -> f32 {
        match self {
            LostObjectKind::Book => 50.0,
            LostObjectKind::Keys => 75.0,
            LostObjectKind::Wallet => 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LostObject {
    pub id: u32,
    pub kind: LostObjectKind,
    pub rect: Rect,
    pub rotation: f32,
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcState {
    /// Waiting for their lost object
    Waiting,
    /// Got it back
    Happy,
}

/// A pedestrian who lost something
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OwnerNpc {
    pub id: u32,
    pub rect: Rect,
    pub state: NpcState,
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    /// A delivery van barreling down the street
    Pursuer,
}

/// Periodic high-threat encounter
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub kind: BossKind,
    pub rect: Rect,
    /// Leftward speed (px/frame)
    pub speed: f32,
    /// Shielded hits left before defeat
    pub health: u8,
    pub anim: u32,
    pub removed: bool,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Position and current size (height shrinks while sliding)
    pub rect: Rect,
    /// Vertical velocity (positive is downward)
    pub vy: f32,
    pub grounded: bool,
    pub grinding: bool,
    pub sliding: bool,
    pub tricking: bool,
    pub crashed: bool,
    pub trick: Option<TrickKind>,
    pub body_rotation: f32,
    pub board_rotation: f32,
    /// Jumps since last landing
    pub jump_count: u8,
    pub ramp_boosted: bool,
    /// Meters ground this session
    pub grind_distance: f32,
    pub crash_ticks: u32,
    pub slide_ticks: u32,
    /// Invulnerability/flash frames left
    pub flash_ticks: u32,
    /// Lost object currently carried, if any
    pub carrying: Option<LostObjectKind>,
    pub has_charity_shield: bool,
}

/// Active power-up countdowns (frames left)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield_ticks: u32,
    pub magnet_ticks: u32,
    pub double_ticks: u32,
    pub slow_ticks: u32,
}

impl ActiveEffects {
    fn ticks_mut(&mut self, kind: PowerupKind) -> &mut u32 {
        match kind {
            PowerupKind::Shield => &mut self.shield_ticks,
            PowerupKind::Magnet => &mut self.magnet_ticks,
            PowerupKind::Double => &mut self.double_ticks,
            PowerupKind::Slow => &mut self.slow_ticks,
        }
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        match kind {
            PowerupKind::Shield => self.shield_ticks > 0,
            PowerupKind::Magnet => self.magnet_ticks > 0,
            PowerupKind::Double => self.double_ticks > 0,
            PowerupKind::Slow => self.slow_ticks > 0,
        }
    }

    pub fn set(&mut self, kind: PowerupKind, ticks: u32) {
        *self.ticks_mut(kind) = ticks;
    }

    /// Turn an effect off early; returns whether it was on
    pub fn consume(&mut self, kind: PowerupKind) -> bool {
        let ticks = self.ticks_mut(kind);
        let was_active = *ticks > 0;
        *ticks = 0;
        was_active
    }

    /// Count every effect down one frame, returning the ones that ran out
    pub fn tick(&mut self) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        for kind in PowerupKind::ALL {
            let ticks = self.ticks_mut(kind);
            if *ticks > 0 {
                *ticks -= 1;
                if *ticks == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Packed RGB
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Frames since each spawner last fired or checked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnClock {
    pub obstacle: u32,
    pub coin: u32,
    pub lost_object: u32,
    pub npc: u32,
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub loadout: Loadout,
    pub phase: GamePhase,
    /// Simulated frames
    pub frame: u64,
    /// Raw score (floored for display)
    pub score: f64,
    pub coin_count: u32,
    /// External scoring multiplier
    pub combo: f32,
    /// Meters traveled
    pub distance: f32,
    /// World speed derived from distance (before slow-motion)
    pub speed: f32,
    /// Index into `tuning.stages`
    pub stage: Option<usize>,
    pub effects: ActiveEffects,
    /// Coins toward the next charity shield
    pub charity_coins: u32,
    /// Frames left to show the charity message
    pub charity_message_ticks: u32,
    pub player: PlayerState,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub lost_objects: Vec<LostObject>,
    pub npcs: Vec<OwnerNpc>,
    pub boss: Option<Boss>,
    /// Distance at which the last boss appeared
    pub last_boss_distance: f32,
    /// Ramp obstacle ids that already launched the player
    pub launched_ramps: BTreeSet<u32>,
    pub missions: MissionBoard,
    /// Consecutive superman tricks
    pub superman_streak: u32,
    pub spawn_clock: SpawnClock,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    pub(crate) game_over_reported: bool,
    next_id: u32,
}

impl GameState {
    /// Start a new session. The session stays `Idle` until `set_active(true)`.
    pub fn new(seed: u64, mut tuning: Tuning, loadout: Loadout) -> Self {
        tuning.sanitize();
        let speed = tuning.speed_for_distance(0.0);
        let stage = super::stage::select_stage(0.0, &tuning.stages);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: PlayerState::new(&tuning),
            tuning,
            loadout,
            phase: GamePhase::Idle,
            frame: 0,
            score: 0.0,
            coin_count: 0,
            combo: 1.0,
            distance: 0.0,
            speed,
            stage,
            effects: ActiveEffects::default(),
            charity_coins: 0,
            charity_message_ticks: 0,
            obstacles: Vec::new(),
            coins: Vec::new(),
            lost_objects: Vec::new(),
            npcs: Vec::new(),
            boss: None,
            last_boss_distance: 0.0,
            launched_ramps: BTreeSet::new(),
            missions: MissionBoard::new(),
            superman_streak: 0,
            spawn_clock: SpawnClock::default(),
            particles: Vec::new(),
            events: Vec::new(),
            game_over_reported: false,
            next_id: 1,
        };

        let start = state.loadout.powerups;
        for (kind, on) in [
            (PowerupKind::Shield, start.shield),
            (PowerupKind::Magnet, start.magnet),
            (PowerupKind::Double, start.double),
            (PowerupKind::Slow, start.slow),
        ] {
            if on {
                state.grant_powerup(kind);
            }
        }

        log::info!(
            "Session initialized: seed={}, cosmetic={}, gadget={}",
            seed,
            state.loadout.cosmetic.as_str(),
            state.loadout.gadget.as_str()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start (or restart) a power-up countdown
    pub fn grant_powerup(&mut self, kind: PowerupKind) {
        let p = &self.tuning.powerups;
        let ticks = match kind {
            PowerupKind::Shield => p.shield_frames,
            PowerupKind::Magnet => p.magnet_frames,
            PowerupKind::Double => p.double_frames,
            PowerupKind::Slow => p.slow_frames,
        };
        self.effects.set(kind, ticks);
    }

    /// Turn a power-up off early (shield hits). Fires the expiry event if it was on.
    pub fn consume_powerup(&mut self, kind: PowerupKind) -> bool {
        let was_active = self.effects.consume(kind);
        if was_active {
            self.events.push(GameEvent::PowerupExpired(kind));
        }
        was_active
    }

    /// Set the external combo multiplier
    pub fn set_combo(&mut self, combo: f32) {
        self.combo = combo.max(0.0);
    }

    /// World scroll speed this frame, including slow-motion
    pub fn world_speed(&self) -> f32 {
        if self.effects.is_active(PowerupKind::Slow) {
            self.speed * self.tuning.powerups.slow_factor
        } else {
            self.speed
        }
    }

    /// Multiplier from the double-score power-up
    pub fn double_factor(&self) -> f32 {
        if self.effects.is_active(PowerupKind::Double) {
            2.0
        } else {
            1.0
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score.max(0.0).floor() as u64,
            coins: self.coin_count,
            combo: self.combo,
            charity_coins: self.charity_coins,
            has_charity_shield: self.player.has_charity_shield,
        }
    }

    /// Name of the current stage
    pub fn stage_name(&self) -> Option<&str> {
        self.stage.and_then(|i| self.tuning.stages.get(i)).map(|s| s.name.as_str())
    }

    pub fn is_crashed(&self) -> bool {
        self.player.crashed
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn report_score(&mut self) {
        let snapshot = self.snapshot();
        self.events.push(GameEvent::ScoreUpdate(snapshot));
    }

    /// Credit continuous mission progress; only completions are reported right away
    pub(crate) fn accumulate_missions(&mut self, kind: MissionKind, delta: f32) {
        let result = self.missions.update(kind, delta);
        if result.reward > 0 {
            self.events.push(GameEvent::Reward(result.reward));
            self.events
                .push(GameEvent::MissionsUpdated(self.missions.missions.clone()));
        }
    }

    /// Credit mission progress and report any change immediately
    pub(crate) fn update_missions(&mut self, kind: MissionKind, delta: f32) {
        let result = self.missions.update(kind, delta);
        if result.reward > 0 {
            self.events.push(GameEvent::Reward(result.reward));
        }
        if result.changed {
            self.events
                .push(GameEvent::MissionsUpdated(self.missions.missions.clone()));
        }
    }

    /// Spawn a burst of particles (capped)
    pub(crate) fn emit_particles(&mut self, origin: Vec2, count: usize, color: u32) {
        use rand::Rng;
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let vel = Vec2::new(
                self.rng.random_range(-3.0..0.5),
                self.rng.random_range(-3.0..-0.5),
            );
            self.particles.push(Particle {
                pos: origin,
                vel,
                color,
                life: 1.0,
                size: self.rng.random_range(2.0..5.0),
            });
        }
    }
}
