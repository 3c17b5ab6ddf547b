//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be re-tuned from JSON
//! without touching simulation code. Values are expressed per frame at the
//! nominal rate in [`crate::consts::FRAMES_PER_SECOND`]. Geometry tolerances
//! are ratios of entity dimensions so collision feel does not depend on the
//! display resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Player physics and state machine timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Fixed horizontal position of the player
    pub player_x: f32,
    pub player_width: f32,
    /// Standing height
    pub player_height: f32,
    /// Height while sliding
    pub slide_height: f32,
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Upward speed applied on jump (px/frame)
    pub jump_impulse: f32,
    /// Ramp launch impulse as a multiple of `jump_impulse`
    pub ramp_boost_multiplier: f32,
    /// Maximum jumps before landing
    pub max_jumps: u8,
    pub slide_frames: u32,
    pub crash_frames: u32,
    /// Invulnerability window after a shield absorbs a hit
    pub flash_frames: u32,
    /// Upward speed applied when a grind ends
    pub grind_exit_nudge: f32,
    /// Board spin per frame during a trick (radians)
    pub trick_spin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            player_x: 100.0,
            player_width: 40.0,
            player_height: 60.0,
            slide_height: 30.0,
            gravity: 0.8,
            jump_impulse: 15.0,
            ramp_boost_multiplier: 1.4,
            max_jumps: 2,
            slide_frames: 30,
            crash_frames: 60,
            flash_frames: 60,
            grind_exit_nudge: 2.0,
            trick_spin: 0.35,
        }
    }
}

/// World dimensions and speed progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    /// Y coordinate of the road/sidewalk boundary
    pub ground_y: f32,
    /// Starting world speed (px/frame)
    pub base_speed: f32,
    pub max_speed: f32,
    /// Speed gained per meter traveled
    pub speed_per_meter: f32,
    /// Meters traveled per px of world speed
    pub meters_per_px: f32,
    /// Multiplier for cars, which drive toward the player
    pub car_speed_multiplier: f32,
    /// Share of each box trimmed per side before obstacle overlap tests
    pub hitbox_inset_ratio: f32,
    /// How far (as a share of player height) feet may sit from a rail top and still grind
    pub grind_tolerance_ratio: f32,
    /// How far (as a share of player height) feet may drift from a rail top mid-grind
    pub grind_support_ratio: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            ground_y: 340.0,
            base_speed: 6.0,
            max_speed: 14.0,
            speed_per_meter: 0.01,
            meters_per_px: 0.02,
            car_speed_multiplier: 1.5,
            hitbox_inset_ratio: 0.1,
            grind_tolerance_ratio: 0.4,
            grind_support_ratio: 0.02,
        }
    }
}

/// Spawn rates for every spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Frames between obstacles at the start of a run
    pub obstacle_interval: u32,
    /// Floor for the obstacle interval
    pub obstacle_min_interval: u32,
    /// Frames removed from the interval per meter traveled
    pub obstacle_interval_per_meter: f32,
    pub coin_interval: u32,
    pub coin_chance: f64,
    pub coin_size: f32,
    /// Height band above the ground coins may float in
    pub coin_band: f32,
    pub lost_object_interval: u32,
    pub lost_object_chance: f64,
    pub lost_object_size: f32,
    pub npc_interval: u32,
    pub npc_chance: f64,
    pub npc_width: f32,
    pub npc_height: f32,
    /// Center distance for coin and lost-object pickup
    pub pickup_radius: f32,
    /// Center distance for handing an object to its owner
    pub npc_contact_radius: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            obstacle_interval: 90,
            obstacle_min_interval: 40,
            obstacle_interval_per_meter: 0.05,
            coin_interval: 20,
            coin_chance: 0.4,
            coin_size: 24.0,
            coin_band: 140.0,
            lost_object_interval: 180,
            lost_object_chance: 0.35,
            lost_object_size: 28.0,
            npc_interval: 60,
            npc_chance: 0.5,
            npc_width: 36.0,
            npc_height: 64.0,
            pickup_radius: 45.0,
            npc_contact_radius: 50.0,
        }
    }
}

/// Score and currency values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Score per frame at base speed with a combo of 1
    pub score_per_frame: f32,
    /// Extra score share at max speed
    pub speed_bonus: f32,
    pub coin_score: f32,
    pub grind_bonus: f32,
    pub basic_trick: f32,
    pub kickflip_trick: f32,
    pub superman_trick: f32,
    /// Consecutive supermans that complete a trick combo
    pub superman_combo: u32,
    /// Coins per charity shield
    pub charity_coins_per_shield: u32,
    pub charity_message_frames: u32,
    /// Coins paid when a lost object reaches its owner
    pub return_coin_bonus: u32,
    /// Minimum distance for a crash to count toward the crash-distance mission
    pub crash_distance_min: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            score_per_frame: 0.1,
            speed_bonus: 0.5,
            coin_score: 10.0,
            grind_bonus: 50.0,
            basic_trick: 100.0,
            kickflip_trick: 200.0,
            superman_trick: 300.0,
            superman_combo: 3,
            charity_coins_per_shield: 20,
            charity_message_frames: 180,
            return_coin_bonus: 5,
            crash_distance_min: 100.0,
        }
    }
}

/// Power-up durations and strengths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub shield_frames: u32,
    pub magnet_frames: u32,
    pub double_frames: u32,
    pub slow_frames: u32,
    pub magnet_radius: f32,
    /// Pull speed toward the player (px/frame)
    pub magnet_pull: f32,
    /// World speed multiplier while slow is active
    pub slow_factor: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            shield_frames: 600,
            magnet_frames: 600,
            double_frames: 600,
            slow_frames: 600,
            magnet_radius: 220.0,
            magnet_pull: 9.0,
            slow_factor: 0.6,
        }
    }
}

/// Boss encounter cadence and difficulty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Meters between encounters
    pub distance_interval: f32,
    pub width: f32,
    pub height: f32,
    /// Boss speed as a multiple of world speed
    pub speed_factor: f32,
    /// Extra speed factor per meter traveled
    pub speed_factor_per_meter: f32,
    pub max_speed_factor: f32,
    pub base_health: u8,
    /// Meters per extra point of health
    pub health_step: f32,
    pub max_health: u8,
    /// Distance a shielded hit pushes the boss back
    pub knockback: f32,
    pub defeat_bonus: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            distance_interval: 500.0,
            width: 150.0,
            height: 70.0,
            speed_factor: 1.25,
            speed_factor_per_meter: 0.0002,
            max_speed_factor: 2.0,
            base_health: 3,
            health_step: 2000.0,
            max_health: 6,
            knockback: 260.0,
            defeat_bonus: 1000.0,
        }
    }
}

/// A named environment phase starting at `threshold` meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    pub threshold: f32,
    pub name: String,
}

impl StageDef {
    pub fn new(threshold: f32, name: &str) -> Self {
        Self {
            threshold,
            name: name.to_string(),
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub world: WorldTuning,
    pub spawn: SpawnTuning,
    pub scoring: ScoringTuning,
    pub powerups: PowerupTuning,
    pub boss: BossTuning,
    /// Ordered by ascending threshold
    pub stages: Vec<StageDef>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            world: WorldTuning::default(),
            spawn: SpawnTuning::default(),
            scoring: ScoringTuning::default(),
            powerups: PowerupTuning::default(),
            boss: BossTuning::default(),
            stages: vec![
                StageDef::new(0.0, "Neighborhood"),
                StageDef::new(300.0, "Market Street"),
                StageDef::new(800.0, "Downtown"),
                StageDef::new(1500.0, "Boardwalk"),
                StageDef::new(2500.0, "Night City"),
            ],
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Pull every value into its usable range, warning about each fix.
    ///
    /// Chances become probabilities, sizes and bands become positive, and the
    /// speed curve gets a positive base with `max_speed >= base_speed`.
    pub fn sanitize(&mut self) {
        let world = &mut self.world;
        clamp_setting("world.width", &mut world.width, 1.0, f32::MAX);
        clamp_setting("world.base_speed", &mut world.base_speed, 0.1, f32::MAX);
        let base_speed = world.base_speed;
        clamp_setting("world.max_speed", &mut world.max_speed, base_speed, f32::MAX);
        clamp_setting("world.speed_per_meter", &mut world.speed_per_meter, 0.0, f32::MAX);
        clamp_setting("world.meters_per_px", &mut world.meters_per_px, 0.0, f32::MAX);
        clamp_setting("world.car_speed_multiplier", &mut world.car_speed_multiplier, 0.0, f32::MAX);
        clamp_setting("world.hitbox_inset_ratio", &mut world.hitbox_inset_ratio, 0.0, 0.45);
        clamp_setting("world.grind_tolerance_ratio", &mut world.grind_tolerance_ratio, 0.0, 1.0);
        clamp_setting("world.grind_support_ratio", &mut world.grind_support_ratio, 0.0, 1.0);

        let physics = &mut self.physics;
        clamp_setting("physics.player_width", &mut physics.player_width, 1.0, f32::MAX);
        clamp_setting("physics.player_height", &mut physics.player_height, 1.0, f32::MAX);
        let height = physics.player_height;
        clamp_setting("physics.slide_height", &mut physics.slide_height, 1.0, height);
        if physics.max_jumps == 0 {
            log::warn!("Tuning physics.max_jumps=0 out of range, using 1");
            physics.max_jumps = 1;
        }

        let spawn = &mut self.spawn;
        clamp_chance("spawn.coin_chance", &mut spawn.coin_chance);
        clamp_chance("spawn.lost_object_chance", &mut spawn.lost_object_chance);
        clamp_chance("spawn.npc_chance", &mut spawn.npc_chance);
        clamp_setting("spawn.coin_size", &mut spawn.coin_size, 1.0, f32::MAX);
        clamp_setting("spawn.coin_band", &mut spawn.coin_band, 1.0, f32::MAX);
        clamp_setting("spawn.lost_object_size", &mut spawn.lost_object_size, 1.0, f32::MAX);
        clamp_setting("spawn.npc_width", &mut spawn.npc_width, 1.0, f32::MAX);
        clamp_setting("spawn.npc_height", &mut spawn.npc_height, 1.0, f32::MAX);
        clamp_setting("spawn.pickup_radius", &mut spawn.pickup_radius, 0.0, f32::MAX);
        clamp_setting("spawn.npc_contact_radius", &mut spawn.npc_contact_radius, 0.0, f32::MAX);

        let powerups = &mut self.powerups;
        clamp_setting("powerups.slow_factor", &mut powerups.slow_factor, 0.0, 1.0);
        clamp_setting("powerups.magnet_radius", &mut powerups.magnet_radius, 0.0, f32::MAX);
        clamp_setting("powerups.magnet_pull", &mut powerups.magnet_pull, 0.0, f32::MAX);

        let boss = &mut self.boss;
        clamp_setting("boss.width", &mut boss.width, 1.0, f32::MAX);
        clamp_setting("boss.height", &mut boss.height, 1.0, f32::MAX);
        clamp_setting("boss.health_step", &mut boss.health_step, 1.0, f32::MAX);

        self.stages.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
    }

    /// Load a tuning file, falling back to defaults when it is missing or malformed
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read tuning file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// World speed for a cumulative distance: capped linear ramp
    pub fn speed_for_distance(&self, distance: f32) -> f32 {
        let world = &self.world;
        (world.base_speed + distance.max(0.0) * world.speed_per_meter).min(world.max_speed)
    }

    /// Frames between obstacles at a given distance
    pub fn obstacle_interval(&self, distance: f32) -> u32 {
        let spawn = &self.spawn;
        let shrink = (distance.max(0.0) * spawn.obstacle_interval_per_meter) as u32;
        spawn
            .obstacle_interval
            .saturating_sub(shrink)
            .max(spawn.obstacle_min_interval)
    }
}

/// Pull `value` into `[min, max]`; NaN becomes `min`
fn clamp_setting(name: &str, value: &mut f32, min: f32, max: f32) {
    if *value >= min && *value <= max {
        return;
    }
    let fixed = if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    };
    log::warn!("Tuning {name}={value} out of range, using {fixed}");
    *value = fixed;
}

/// Pull a spawn chance into `[0, 1]`; NaN becomes 0
fn clamp_chance(name: &str, chance: &mut f64) {
    if (0.0..=1.0).contains(&*chance) {
        return;
    }
    let fixed = if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    };
    log::warn!("Tuning {name}={chance} out of range, using {fixed}");
    *chance = fixed;
}
