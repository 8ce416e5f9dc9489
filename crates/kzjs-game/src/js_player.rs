// js_player.rs: per-tick view of the movement player, filled in by the host

use crate::js_local::*;

/// Stable identifier of a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlayerSlot(pub usize);

/// Origin and velocity at one point of the movement step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveData {
    pub origin: Vec3,
    pub velocity: Vec3,
}

/// Everything the jumpstats core reads from the host for one player and tick.
///
/// `current` is the live move data, `pre` the snapshot taken before this
/// tick's movement ran and `post` the snapshot left by last tick's movement.
#[derive(Debug, Clone, Default)]
pub struct MovementPlayer {
    // Globals
    pub curtime: f32,
    pub tickcount: i32,
    pub frametime: f32,

    // Pawn state
    pub move_type: MoveType,
    pub actual_move_type: MoveType,
    pub flags: PlayerFlags,
    pub base_velocity: Vec3,
    pub angles: Vec3,
    pub old_angles: Vec3,
    pub buttons: Buttons,
    pub ducked: bool,
    pub max_speed: f32,
    pub surface_friction: f32,
    pub turning: TurnState,
    pub colliding_with_world: bool,
    /// Engine mark set when a ladder dismount should not count as a jump.
    pub ignore_ladder_jump_time: f32,

    // Move data
    pub current: MoveData,
    pub pre: MoveData,
    pub post: MoveData,

    // Takeoff / landing bookkeeping
    pub takeoff_origin: Vec3,
    pub takeoff_ground_origin: Vec3,
    pub takeoff_velocity: Vec3,
    pub takeoff_time: f32,
    pub takeoff_from_ladder: bool,
    pub landing_origin: Vec3,
    pub landing_origin_actual: Vec3,
    pub landing_time: f32,
    pub landing_time_actual: f32,

    // Per-tick movement events
    pub jumped: bool,
    pub duck_bugged: bool,
    /// Ground movement ran and capped speed this tick.
    pub walk_moved: bool,
}

impl MovementPlayer {
    pub fn is_button_pressed(&self, button: Buttons) -> bool {
        self.buttons.intersects(button)
    }

    pub fn on_ground(&self) -> bool {
        self.flags.contains(FL_ONGROUND)
    }

    pub fn has_base_velocity(&self) -> bool {
        vector_length(&self.base_velocity) > 0.0 || self.flags.contains(FL_BASEVELOCITY)
    }

    pub fn is_noclipping(&self) -> bool {
        self.move_type == MoveType::Noclip || self.actual_move_type == MoveType::Noclip
    }
}
