//! Session loadout: equipped cosmetics and pre-session power-ups
//!
//! Chosen in the shop/menu layer and handed to the core when a session starts.
//! Cosmetics and gadgets only change particle and feedback choices. They never
//! touch physics or scoring.

use serde::{Deserialize, Serialize};

/// Equipped board/character cosmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Cosmetic {
    #[default]
    Classic,
    Flame,
    Neon,
    Gold,
}

impl Cosmetic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cosmetic::Classic => "Classic",
            Cosmetic::Flame => "Flame",
            Cosmetic::Neon => "Neon",
            Cosmetic::Gold => "Gold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Some(Cosmetic::Classic),
            "flame" | "fire" => Some(Cosmetic::Flame),
            "neon" => Some(Cosmetic::Neon),
            "gold" | "golden" => Some(Cosmetic::Gold),
            _ => None,
        }
    }

    /// Particles emitted when jumping
    pub fn jump_particles(&self) -> usize {
        match self {
            Cosmetic::Classic => 4,
            Cosmetic::Flame => 10,
            Cosmetic::Neon => 8,
            Cosmetic::Gold => 12,
        }
    }

    /// Packed RGB for jump particles
    pub fn particle_color(&self) -> u32 {
        match self {
            Cosmetic::Classic => 0xb0a89c, // dust
            Cosmetic::Flame => 0xff6a1a,
            Cosmetic::Neon => 0x39ff14,
            Cosmetic::Gold => 0xffd700,
        }
    }
}

/// Equipped gadget (purely cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gadget {
    #[default]
    None,
    Headphones,
    Cape,
    LightUpWheels,
}

impl Gadget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gadget::None => "None",
            Gadget::Headphones => "Headphones",
            Gadget::Cape => "Cape",
            Gadget::LightUpWheels => "Light-Up Wheels",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "none" | "" => Some(Gadget::None),
            "headphones" => Some(Gadget::Headphones),
            "cape" => Some(Gadget::Cape),
            "lightupwheels" | "wheels" => Some(Gadget::LightUpWheels),
            _ => None,
        }
    }

    /// Extra particles added on top of the cosmetic's jump burst
    pub fn extra_jump_particles(&self) -> usize {
        match self {
            Gadget::LightUpWheels => 4,
            Gadget::Cape => 2,
            Gadget::None | Gadget::Headphones => 0,
        }
    }
}

/// Power-ups bought before the run; each becomes a countdown at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StartPowerups {
    pub shield: bool,
    pub magnet: bool,
    pub double: bool,
    pub slow: bool,
}

/// Everything the core needs to know about the player's equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Loadout {
    pub cosmetic: Cosmetic,
    pub gadget: Gadget,
    pub powerups: StartPowerups,
}

impl Loadout {
    pub fn new(cosmetic: Cosmetic, gadget: Gadget, powerups: StartPowerups) -> Self {
        Self {
            cosmetic,
            gadget,
            powerups,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Total particles for one jump burst
    pub fn jump_particles(&self) -> usize {
        self.cosmetic.jump_particles() + self.gadget.extra_jump_particles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosmetic_names_round_trip() {
        for cosmetic in [Cosmetic::Classic, Cosmetic::Flame, Cosmetic::Neon, Cosmetic::Gold] {
            assert_eq!(Cosmetic::from_str(cosmetic.as_str()), Some(cosmetic));
        }
        assert_eq!(Cosmetic::from_str("FIRE"), Some(Cosmetic::Flame));
        assert_eq!(Cosmetic::from_str("plaid"), None);
    }

    #[test]
    fn test_gadget_parse_is_lenient() {
        assert_eq!(Gadget::from_str("light_up_wheels"), Some(Gadget::LightUpWheels));
        assert_eq!(Gadget::from_str("Light-Up Wheels"), Some(Gadget::LightUpWheels));
        assert_eq!(Gadget::from_str("jetpack"), None);
    }

    #[test]
    fn test_loadout_json_defaults_missing_fields() {
        let loadout = Loadout::from_json(r#"{ "powerups": { "shield": true } }"#).unwrap();
        assert_eq!(loadout.cosmetic, Cosmetic::Classic);
        assert!(loadout.powerups.shield);
        assert!(!loadout.powerups.magnet);
    }

    #[test]
    fn test_jump_particles_combine() {
        let loadout = Loadout::new(Cosmetic::Gold, Gadget::LightUpWheels, StartPowerups::default());
        assert_eq!(loadout.jump_particles(), 16);
    }
}
