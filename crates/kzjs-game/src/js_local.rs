// js_local.rs: local definitions for the jumpstats module

pub use kzjs_common::q_shared::*;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================
// Tuning constants
// ============================================================

/// Window around an engine "ignore ladder jump" mark in which a jump press
/// makes a ladder takeoff unusable.
pub const IGNORE_JUMP_TIME: f32 = 0.2;
/// Speed and height deltas at or below this are float noise.
pub const JS_EPSILON: f32 = 0.03125;
pub const JS_MAX_BHOP_GROUND_TIME: f32 = 0.05;
pub const JS_MAX_DUCKBUG_RESET_TIME: f32 = 0.05;
pub const JS_MAX_NOCLIP_RESET_TIME: f32 = 0.4;
pub const JS_MAX_WEIRDJUMP_FALL_OFFSET: f32 = 64.0 + JS_EPSILON;
pub const JS_TOUCH_GRACE_PERIOD: f32 = 0.04;
pub const JS_SPEED_MODIFICATION_TOLERANCE: f32 = 0.1;
pub const JS_TELEPORT_DISTANCE_SQUARED: f32 = 4096.0 * 4096.0 * ENGINE_FIXED_TICK_INTERVAL;

/// Airtime ceilings used when validating a finished jump.
pub const JS_MAX_LADDERJUMP_AIRTIME: f32 = 1.04;
pub const JS_MAX_JUMP_AIRTIME: f32 = 0.8;

/// Distance added to every non-ladder jump for the player's bounding box.
pub const JS_PLAYER_WIDTH_ADD_DIST: f32 = 32.0;

/// Style short name whose jumps may be broadcast to other players.
pub const JS_BROADCAST_STYLE: &str = "NRM";

// ============================================================
// Jump types
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum JumpType {
    #[default]
    LongJump,
    Bhop,
    MultiBhop,
    WeirdJump,
    LadderJump,
    Ladderhop,
    Jumpbug,
    Fall,
    Other,
    Invalid,
    FullInvalid,
}

impl JumpType {
    pub fn name(self) -> &'static str {
        match self {
            JumpType::LongJump => "Long Jump",
            JumpType::Bhop => "Bunnyhop",
            JumpType::MultiBhop => "Multi Bunnyhop",
            JumpType::WeirdJump => "Weird Jump",
            JumpType::LadderJump => "Ladder Jump",
            JumpType::Ladderhop => "Ladderhop",
            JumpType::Jumpbug => "Jumpbug",
            JumpType::Fall => "Fall",
            JumpType::Other => "Unknown Jump",
            JumpType::Invalid | JumpType::FullInvalid => "Invalid Jump",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            JumpType::LongJump => "LJ",
            JumpType::Bhop => "BH",
            JumpType::MultiBhop => "MBH",
            JumpType::WeirdJump => "WJ",
            JumpType::LadderJump => "LAJ",
            JumpType::Ladderhop => "LAH",
            JumpType::Jumpbug => "JB",
            JumpType::Fall => "FL",
            JumpType::Other => "UNK",
            JumpType::Invalid | JumpType::FullInvalid => "INV",
        }
    }

    /// Longest airtime a jump of this type may have before it is downgraded.
    /// `None` for types that are never airtime-checked.
    pub fn max_airtime(self) -> Option<f32> {
        match self {
            JumpType::LadderJump => Some(JS_MAX_LADDERJUMP_AIRTIME),
            JumpType::LongJump
            | JumpType::Bhop
            | JumpType::MultiBhop
            | JumpType::WeirdJump
            | JumpType::Ladderhop
            | JumpType::Jumpbug => Some(JS_MAX_JUMP_AIRTIME),
            _ => None,
        }
    }
}

impl fmt::Display for JumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================
// Distance tiers
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[repr(u8)]
pub enum DistanceTier {
    #[default]
    None = 0,
    Meh = 1,
    Impressive = 2,
    Perfect = 3,
    Godlike = 4,
    Ownage = 5,
    Wrecker = 6,
}

pub const DISTANCE_TIERS: [DistanceTier; 7] = [
    DistanceTier::None,
    DistanceTier::Meh,
    DistanceTier::Impressive,
    DistanceTier::Perfect,
    DistanceTier::Godlike,
    DistanceTier::Ownage,
    DistanceTier::Wrecker,
];

impl DistanceTier {
    pub fn name(self) -> &'static str {
        match self {
            DistanceTier::None => "None",
            DistanceTier::Meh => "Meh",
            DistanceTier::Impressive => "Impressive",
            DistanceTier::Perfect => "Perfect",
            DistanceTier::Godlike => "Godlike",
            DistanceTier::Ownage => "Ownage",
            DistanceTier::Wrecker => "Wrecker",
        }
    }

    /// Sound played to the jumper for this tier, if any.
    pub fn sound(self) -> Option<&'static str> {
        match self {
            DistanceTier::None | DistanceTier::Meh => None,
            DistanceTier::Impressive => Some("kz.impressive"),
            DistanceTier::Perfect => Some("kz.perfect"),
            DistanceTier::Godlike => Some("kz.godlike"),
            DistanceTier::Ownage => Some("kz.ownage"),
            DistanceTier::Wrecker => Some("kz.wrecker"),
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| DISTANCE_TIERS.get(i).copied())
    }
}

impl fmt::Display for DistanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierParseError {
    #[error("empty tier argument")]
    Empty,
    #[error("unknown distance tier \"{0}\"")]
    Unknown(String),
    #[error("distance tier index {0} out of range 0-6")]
    OutOfRange(i64),
}

impl FromStr for DistanceTier {
    type Err = TierParseError;

    /// Accepts a tier name (case-insensitive) or its index 0-6.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TierParseError::Empty);
        }
        if let Some(tier) = DISTANCE_TIERS.iter().find(|t| t.name().eq_ignore_ascii_case(s)) {
            return Ok(*tier);
        }
        let index: i64 = s.parse().map_err(|_| TierParseError::Unknown(s.to_string()))?;
        DistanceTier::from_index(index).ok_or(TierParseError::OutOfRange(index))
    }
}
