//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities are kept in spawn order)
//! - No rendering, audio or platform dependencies
//!
//! Presentation layers read [`GameState`] after each [`tick`] and drain its
//! event queue with [`GameState::drain_events`].

pub mod actions;
pub mod boss;
pub mod collision;
pub mod events;
pub mod missions;
pub mod player;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;

pub use collision::{BossContact, Interaction};
pub use events::{Cue, GameEvent, ScoreSnapshot};
pub use missions::{Mission, MissionBoard, MissionKind};
pub use state::{
    ActiveEffects, Boss, BossKind, Coin, GamePhase, GameState, LostObject, LostObjectKind,
    NpcState, Obstacle, ObstacleKind, OwnerNpc, Particle, PlayerState, PowerupKind, TrickKind,
};
pub use tick::{TickInput, tick};
