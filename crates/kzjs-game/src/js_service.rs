// js_service.rs: per-player jumpstats session and its tick entry points
//
// The host calls, for each simulated tick:
//   on_process_movement
//   on_try_player_move / on_try_player_move_post      (pre/post-move snapshot)
//   on_air_accelerate / on_air_accelerate_post        (zero or more pairs)
//   add_jump on takeoff, end_jump on landing          (as they happen)
//   update_jump, on_process_movement_post             (movement end)
// and on_change_move_type whenever the pawn's move type changes.

use crate::aacall::AACall;
use crate::js_classify::{determine_jump_type, PreviousJump, TakeoffContext};
use crate::js_local::*;
use crate::js_player::MovementPlayer;
use crate::jump::Jump;

/// Server-wide defaults applied when a player's session is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDefaults {
    pub broadcast_min_tier: DistanceTier,
    pub sound_min_tier: DistanceTier,
}

impl Default for TierDefaults {
    fn default() -> Self {
        Self {
            broadcast_min_tier: DistanceTier::Godlike,
            sound_min_tier: DistanceTier::Godlike,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JumpstatsService {
    /// Append-only history; the current jump is the last element.
    pub(crate) jumps: Vec<Jump>,

    broadcast_min_tier: DistanceTier,
    sound_min_tier: DistanceTier,
    show_jumpstats: bool,
    js_always: bool,

    pub(crate) last_jump_button_time: f32,
    pub(crate) last_noclip_time: f32,
    pub(crate) last_duckbug_time: f32,
    pub(crate) last_ground_speed_capped_time: f32,
    pub(crate) last_movement_processed_time: f32,
    /// Velocity before the collision move of this tick.
    pub(crate) tpm_velocity: Vec3,
    pub(crate) possible_edgebug: bool,
}

impl Default for JumpstatsService {
    fn default() -> Self {
        Self::new(TierDefaults::default())
    }
}

impl JumpstatsService {
    pub fn new(defaults: TierDefaults) -> Self {
        Self {
            jumps: Vec::new(),
            broadcast_min_tier: defaults.broadcast_min_tier,
            sound_min_tier: defaults.sound_min_tier,
            show_jumpstats: true,
            js_always: false,
            last_jump_button_time: 0.0,
            last_noclip_time: 0.0,
            last_duckbug_time: 0.0,
            last_ground_speed_capped_time: 0.0,
            last_movement_processed_time: 0.0,
            tpm_velocity: VEC3_ORIGIN,
            possible_edgebug: false,
        }
    }

    /// Drop the history and restore every setting to the server defaults.
    pub fn reset(&mut self, defaults: TierDefaults) {
        *self = Self::new(defaults);
    }

    // ============================================================
    // Settings
    // ============================================================

    pub fn broadcast_min_tier(&self) -> DistanceTier {
        self.broadcast_min_tier
    }

    pub fn sound_min_tier(&self) -> DistanceTier {
        self.sound_min_tier
    }

    pub fn show_jumpstats(&self) -> bool {
        self.show_jumpstats
    }

    pub fn js_always(&self) -> bool {
        self.js_always
    }

    /// Returns false when the tier was already set.
    pub fn set_broadcast_min_tier(&mut self, tier: DistanceTier) -> bool {
        if tier == self.broadcast_min_tier {
            return false;
        }
        log::debug!("broadcast min tier {} -> {}", self.broadcast_min_tier, tier);
        self.broadcast_min_tier = tier;
        true
    }

    /// Returns false when the tier was already set.
    pub fn set_sound_min_tier(&mut self, tier: DistanceTier) -> bool {
        if tier == self.sound_min_tier {
            return false;
        }
        log::debug!("sound min tier {} -> {}", self.sound_min_tier, tier);
        self.sound_min_tier = tier;
        true
    }

    pub fn toggle_jumpstats_reporting(&mut self) -> bool {
        self.show_jumpstats = !self.show_jumpstats;
        log::debug!("show jumpstats = {}", self.show_jumpstats);
        self.show_jumpstats
    }

    pub fn toggle_js_always(&mut self) -> bool {
        self.js_always = !self.js_always;
        log::debug!("js always = {}", self.js_always);
        self.js_always
    }

    // ============================================================
    // History
    // ============================================================

    pub fn jumps(&self) -> &[Jump] {
        &self.jumps
    }

    pub fn last_jump(&self) -> Option<&Jump> {
        self.jumps.last()
    }

    /// Current jump, if it is still accumulating.
    pub(crate) fn active_jump_mut(&mut self) -> Option<&mut Jump> {
        self.jumps.last_mut().filter(|jump| !jump.is_ended())
    }

    /// Invalidate the current jump. Finished jumps are left alone.
    pub fn invalidate_jumpstats(&mut self, reason: &str) {
        if let Some(jump) = self.active_jump_mut() {
            jump.invalidate(reason);
        }
    }

    fn takeoff_context(&self, player: &MovementPlayer) -> TakeoffContext {
        TakeoffContext {
            curtime: player.curtime,
            takeoff_from_ladder: player.takeoff_from_ladder,
            ignore_ladder_jump_time: player.ignore_ladder_jump_time,
            last_jump_button_time: self.last_jump_button_time,
            jumped: player.jumped,
            duck_bugged: player.duck_bugged,
            hit_bhop: player.takeoff_time - player.landing_time < JS_MAX_BHOP_GROUND_TIME,
            duck_bugged_recently: player.curtime - self.last_duckbug_time <= JS_MAX_DUCKBUG_RESET_TIME,
            ground_speed_capped_recently: self.last_ground_speed_capped_time == self.last_movement_processed_time,
        }
    }

    /// Start a new jump at takeoff, classified against the previous one.
    pub fn add_jump(&mut self, player: &MovementPlayer) {
        let previous = self.jumps.last().map(PreviousJump::from);
        let jump_type = determine_jump_type(&self.takeoff_context(player), previous);
        log::debug!("jump started: {} at {:.3}", jump_type.short_name(), player.curtime);
        self.jumps.push(Jump::new(player, jump_type));
    }

    /// Per-tick accumulation plus the airborne checks.
    pub fn update_jump(&mut self, player: &MovementPlayer) {
        if let Some(jump) = self.jumps.last_mut() {
            jump.update(player);
        }
        self.detect_invalid_collisions(player);
        self.detect_invalid_gains(player);
        self.detect_noclip(player);
    }

    /// Finalize the current jump at landing. Returns true when the jump
    /// should be reported.
    pub fn end_jump(&mut self, player: &MovementPlayer) -> bool {
        let js_always = self.js_always;
        let Some(jump) = self.active_jump_mut() else {
            return false;
        };
        jump.end(player);
        if jump.jump_type() == JumpType::FullInvalid {
            return false;
        }
        (jump.offset() > -JS_EPSILON && jump.is_valid()) || js_always
    }

    // ============================================================
    // Tick entry points
    // ============================================================

    pub fn on_process_movement(&mut self, player: &MovementPlayer) {
        // Always keep an ongoing jump; this one is never reported.
        if self.jumps.is_empty() {
            self.add_jump(player);
            self.invalidate_jumpstats("First jump");
            return;
        }
        self.check_valid_move_type(player);
        self.detect_external_modifications(player);
    }

    /// Returns true when the change ended a jump that should be reported.
    pub fn on_change_move_type(&mut self, old_move_type: MoveType, player: &MovementPlayer) -> bool {
        match (old_move_type, player.move_type) {
            (MoveType::Ladder, MoveType::Walk) => {
                self.add_jump(player);
                false
            }
            (MoveType::Walk, MoveType::Ladder) => {
                self.invalidate_jumpstats("Invalid movetype change");
                self.end_jump(player)
            }
            _ => false,
        }
    }

    pub fn on_air_accelerate(&mut self, player: &MovementPlayer) {
        if player.frametime == 0.0 {
            return;
        }
        let Some(jump) = self.active_jump_mut() else {
            log::warn!("air accelerate without an active jump, ignoring");
            return;
        };
        let velocity_pre = player.current.velocity;
        let call = AACall {
            velocity_pre,
            // post still holds last tick's move data here
            external_speed_diff: vector_length_2d(&velocity_pre) - vector_length_2d(&player.post.velocity),
            prev_yaw: player.old_angles[YAW],
            curtime: player.curtime,
            tickcount: player.tickcount,
            ..Default::default()
        };
        jump.current_strafe(player.turning).push_call(call);
    }

    pub fn on_air_accelerate_post(&mut self, player: &MovementPlayer, wishdir: Vec3, wishspeed: f32, accel: f32) {
        if player.frametime == 0.0 {
            return;
        }
        let call = self
            .active_jump_mut()
            .and_then(|jump| jump.last_strafe_mut())
            .and_then(|strafe| strafe.last_call_mut());
        let Some(call) = call else {
            log::warn!("air accelerate post without a pending attempt, ignoring");
            return;
        };
        call.maxspeed = player.max_speed;
        call.current_yaw = player.angles[YAW];
        call.buttons = player.buttons;
        call.wishdir = wishdir;
        call.wishspeed = wishspeed;
        call.accel = accel;
        call.surface_friction = player.surface_friction;
        call.duration = player.frametime;
        call.ducking = player.ducked;
        call.velocity_post = player.current.velocity;
    }

    pub fn on_try_player_move(&mut self, player: &MovementPlayer) {
        self.tpm_velocity = player.current.velocity;
    }

    /// Credit the collision speed change to the current strafe.
    pub fn on_try_player_move_post(&mut self, player: &MovementPlayer) {
        let tpm_speed = vector_length_2d(&self.tpm_velocity);
        let Some(strafe) = self.active_jump_mut().and_then(|jump| jump.last_strafe_mut()) else {
            return;
        };
        strafe.update_collision_velocity_change(vector_length_2d(&player.current.velocity) - tpm_speed);
        self.detect_edgebug(player);
    }

    pub fn on_process_movement_post(&mut self, player: &MovementPlayer) {
        if self.possible_edgebug && !player.on_ground() {
            self.invalidate_jumpstats("Edgebugged");
        }
        self.possible_edgebug = false;
        self.track_jumpstats_variables(player);
    }

    fn track_jumpstats_variables(&mut self, player: &MovementPlayer) {
        if player.is_button_pressed(IN_JUMP) {
            self.last_jump_button_time = player.curtime;
        }
        if player.is_noclipping() {
            self.last_noclip_time = player.curtime;
        }
        if player.duck_bugged {
            self.last_duckbug_time = player.curtime;
        }
        if player.walk_moved {
            self.last_ground_speed_capped_time = player.curtime;
        }
        self.last_movement_processed_time = player.curtime;
    }
}
