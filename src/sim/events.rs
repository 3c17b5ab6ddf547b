//! Events produced by the simulation
//!
//! Ticks and actions push events into the session queue; the presentation
//! layer drains them after each call. Nothing here can call back into the core.

use serde::{Deserialize, Serialize};

use super::missions::Mission;
use super::state::{LostObjectKind, PowerupKind, TrickKind};

/// Read-only score view for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Score floored for display
    pub score: u64,
    pub coins: u32,
    pub combo: f32,
    pub charity_coins: u32,
    pub has_charity_shield: bool,
}

/// Audio/visual feedback hooks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    Jump { double: bool },
    Slide,
    Trick { kind: TrickKind, points: f32 },
    RampLaunch,
    GrindStart,
    GrindEnd,
    Coin,
    ShieldBreak,
    CharityShieldBreak,
    CharityShieldGranted,
    LostObjectPickup(LostObjectKind),
    LostObjectReturned(LostObjectKind),
    BossIncoming,
    BossHit { health_left: u8 },
    BossDefeated,
    Crash,
}

/// Something the outside world should know about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Periodic and on every coin/bonus event
    ScoreUpdate(ScoreSnapshot),
    /// Exactly once per session
    GameOver { final_score: u64, final_coins: u32 },
    PowerupExpired(PowerupKind),
    MissionsUpdated(Vec<Mission>),
    StageChanged(String),
    /// Currency paid for completed missions
    Reward(u32),
    Feedback(Cue),
}
