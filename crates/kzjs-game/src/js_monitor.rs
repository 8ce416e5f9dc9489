// js_monitor.rs: per-tick checks that invalidate the current jump

use crate::js_local::*;
use crate::js_player::MovementPlayer;
use crate::js_service::JumpstatsService;

impl JumpstatsService {
    pub(crate) fn check_valid_move_type(&mut self, player: &MovementPlayer) {
        if !matches!(player.move_type, MoveType::Walk | MoveType::Ladder) {
            self.invalidate_jumpstats("Invalid movetype");
        }
    }

    pub(crate) fn detect_noclip(&mut self, player: &MovementPlayer) {
        if self.last_noclip_time + JS_MAX_NOCLIP_RESET_TIME > player.curtime {
            self.invalidate_jumpstats("Just noclipped");
        }
    }

    /// Vertical speed recovered from falling during the collision move.
    /// Confirmed at movement end if the player is still airborne.
    pub(crate) fn detect_edgebug(&mut self, player: &MovementPlayer) {
        if !self.active_jump_mut().is_some_and(|jump| jump.is_valid()) {
            return;
        }
        let tpm_z = self.tpm_velocity[2];
        let z = player.current.velocity[2];
        self.possible_edgebug = tpm_z < 0.0 && z > tpm_z && z > -JS_EPSILON;
    }

    /// Short contacts are allowed; a head hit only marks the jump so the
    /// following bhop is refused.
    pub(crate) fn detect_invalid_collisions(&mut self, player: &MovementPlayer) {
        if !player.colliding_with_world {
            return;
        }
        let Some(jump) = self.active_jump_mut() else {
            return;
        };
        if !jump.is_valid() {
            return;
        }
        if jump.add_touch_duration(player.frametime) > JS_TOUCH_GRACE_PERIOD {
            jump.invalidate("Invalid collisions");
        }
        if player.pre.velocity[2] > 0.0 {
            jump.mark_hit_head();
        }
    }

    /// Props can push the player without setting base velocity; they show up
    /// as more horizontal movement than the velocity explains.
    pub(crate) fn detect_invalid_gains(&mut self, player: &MovementPlayer) {
        if player.has_base_velocity() {
            self.invalidate_jumpstats("Base velocity detected");
        }
        let speed = vector_length_2d(&player.current.velocity);
        let actual = vector_length_2d(&vector_subtract(&player.current.origin, &player.pre.origin));
        if actual - speed > JS_SPEED_MODIFICATION_TOLERANCE && actual > JS_EPSILON {
            self.invalidate_jumpstats("Invalid gains");
        }
    }

    /// Teleports between last tick's move and this one.
    pub(crate) fn detect_external_modifications(&mut self, player: &MovementPlayer) {
        let moved = vector_subtract(&player.current.origin, &player.post.origin);
        if vector_length_sqr(&moved) > JS_TELEPORT_DISTANCE_SQUARED {
            self.invalidate_jumpstats("Externally modified");
        }
        if player.has_base_velocity() {
            self.invalidate_jumpstats("Base velocity detected");
        }
    }
}
