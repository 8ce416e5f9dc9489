// jump.rs: one airborne period and its finalized aggregates

use crate::js_local::*;
use crate::js_player::MovementPlayer;
use crate::strafe::Strafe;

#[derive(Debug, Clone, Default)]
pub struct Jump {
    takeoff_origin: Vec3,
    adjusted_takeoff_origin: Vec3,
    takeoff_velocity: Vec3,
    takeoff_time: f32,
    landing_origin: Vec3,
    adjusted_landing_origin: Vec3,
    landing_time: f32,

    jump_type: JumpType,
    strafes: Vec<Strafe>,

    // Running values, updated every airborne tick.
    total_distance: f32,
    current_max_speed: f32,
    current_max_height: f32,

    touch_duration: f32,
    hit_head: bool,
    valid: bool,
    invalidate_reason: Option<String>,
    ended: bool,

    // Filled by end().
    duck_duration: f32,
    duck_end_duration: f32,
    width: f32,
    sync: f32,
    bad_angles: f32,
    overlap: f32,
    dead_air: f32,
    gain_efficiency: Option<f32>,
}

impl Jump {
    /// Start a jump at the player's takeoff with an already-decided type.
    pub fn new(player: &MovementPlayer, jump_type: JumpType) -> Self {
        Self {
            takeoff_origin: player.takeoff_origin,
            adjusted_takeoff_origin: player.takeoff_ground_origin,
            takeoff_velocity: player.takeoff_velocity,
            takeoff_time: player.takeoff_time,
            jump_type,
            valid: true,
            current_max_height: f32::MIN,
            ..Default::default()
        }
    }

    /// Accumulate path length, peak speed and peak height for one tick.
    pub fn update(&mut self, player: &MovementPlayer) {
        if self.ended {
            return;
        }
        let step = vector_subtract(&player.current.origin, &player.pre.origin);
        self.total_distance += vector_length_2d(&step);
        self.current_max_speed = self.current_max_speed.max(vector_length_2d(&player.current.velocity));
        self.current_max_height = self.current_max_height.max(player.current.origin[2]);
    }

    /// Strafe the next attempt belongs to. A reversal of the turn direction
    /// closes the active strafe and opens a new one.
    pub fn current_strafe(&mut self, turning: TurnState) -> &mut Strafe {
        let mut open_new = true;
        if let Some(tail) = self.strafes.last_mut() {
            if !tail.turnstate().is_turning() {
                tail.resolve_turnstate(turning);
                open_new = false;
            } else if turning.is_turning() && tail.turnstate() == turning.opposite() {
                tail.end();
                log::trace!("strafe reversed to {:?}", turning);
            } else {
                open_new = false;
            }
        }
        if open_new {
            self.strafes.push(Strafe::new(turning));
        }
        let last = self.strafes.len() - 1;
        &mut self.strafes[last]
    }

    /// Active strafe without segmenting, if any attempt was recorded yet.
    pub fn last_strafe_mut(&mut self) -> Option<&mut Strafe> {
        if self.ended {
            return None;
        }
        self.strafes.last_mut()
    }

    /// Finalize all aggregates at landing. Later calls do nothing.
    pub fn end(&mut self, player: &MovementPlayer) {
        if self.ended {
            return;
        }
        self.update(player);
        if let Some(tail) = self.strafes.last_mut() {
            tail.end();
        }

        self.landing_origin = player.landing_origin;
        self.adjusted_landing_origin = player.landing_origin_actual;
        self.landing_time = player.landing_time_actual;
        self.current_max_height -= self.adjusted_takeoff_origin[2];
        if self.current_max_height < 0.0 {
            self.current_max_height = 0.0;
        }

        for call in self.strafes.iter().flat_map(|s| s.aa_calls()) {
            if call.ducking {
                self.duck_duration += call.duration;
                self.duck_end_duration += call.duration;
            } else {
                self.duck_end_duration = 0.0;
            }
        }

        let mut duration = 0.0;
        let mut gain = 0.0;
        let mut max_gain = 0.0;
        let mut width = 0.0;
        for strafe in &self.strafes {
            duration += strafe.duration();
            self.sync += strafe.sync_duration();
            self.bad_angles += strafe.bad_angle_duration();
            self.overlap += strafe.overlap_duration();
            self.dead_air += strafe.dead_air_duration();
            gain += strafe.gain(false);
            max_gain += strafe.max_gain();
            width += strafe.width();
        }
        if !self.strafes.is_empty() {
            self.width = width / self.strafes.len() as f32;
        }
        if duration > 0.0 {
            self.sync /= duration;
            self.bad_angles /= duration;
            self.overlap /= duration;
            self.dead_air /= duration;
        }
        self.gain_efficiency = if max_gain > 0.0 { Some(gain / max_gain) } else { None };

        self.ended = true;

        if duration == 0.0 {
            self.jump_type = JumpType::FullInvalid;
        } else if let Some(ceiling) = self.jump_type.max_airtime() {
            if duration > ceiling {
                self.jump_type = JumpType::Invalid;
            }
        }
        log::debug!(
            "jump ended: {} {:.4} units in {:.3}s, {} strafes",
            self.jump_type.short_name(),
            self.distance(true, false),
            duration,
            self.strafes.len()
        );
    }

    /// Mark the jump invalid. The first reason given is kept.
    pub fn invalidate(&mut self, reason: &str) {
        if self.invalidate_reason.is_none() {
            log::debug!("jump invalidated: {}", reason);
            self.invalidate_reason = Some(reason.to_string());
        }
        self.valid = false;
        if self.jump_type != JumpType::FullInvalid {
            self.jump_type = JumpType::Invalid;
        }
    }

    pub fn mark_hit_head(&mut self) {
        self.hit_head = true;
    }

    /// Add continuous world-contact time, returning the new total.
    pub fn add_touch_duration(&mut self, frametime: f32) -> f32 {
        self.touch_duration += frametime;
        self.touch_duration
    }

    // ============================================================
    // Read accessors
    // ============================================================

    pub fn jump_type(&self) -> JumpType {
        self.jump_type
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn hit_head(&self) -> bool {
        self.hit_head
    }

    pub fn invalidate_reason(&self) -> Option<&str> {
        self.invalidate_reason.as_deref()
    }

    pub fn strafes(&self) -> &[Strafe] {
        &self.strafes
    }

    pub fn takeoff_origin(&self) -> Vec3 {
        self.takeoff_origin
    }

    pub fn landing_origin(&self) -> Vec3 {
        self.landing_origin
    }

    pub fn takeoff_velocity(&self) -> Vec3 {
        self.takeoff_velocity
    }

    pub fn takeoff_speed(&self) -> f32 {
        vector_length_2d(&self.takeoff_velocity)
    }

    /// Time between takeoff and the actual landing.
    pub fn airtime(&self) -> f32 {
        self.landing_time - self.takeoff_time
    }

    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    /// Horizontal jump distance. The distbug fix measures between the
    /// adjusted ground origins; every non-ladder jump gets the player width.
    pub fn distance(&self, use_distbug_fix: bool, disable_add_dist: bool) -> f32 {
        let add_dist = if disable_add_dist || self.jump_type == JumpType::LadderJump {
            0.0
        } else {
            JS_PLAYER_WIDTH_ADD_DIST
        };
        let (takeoff, landing) = if use_distbug_fix {
            (&self.adjusted_takeoff_origin, &self.adjusted_landing_origin)
        } else {
            (&self.takeoff_origin, &self.landing_origin)
        };
        distance_2d(landing, takeoff) + add_dist
    }

    pub fn offset(&self) -> f32 {
        self.adjusted_landing_origin[2] - self.adjusted_takeoff_origin[2]
    }

    /// Path travelled relative to the straight-line distance.
    pub fn air_path(&self) -> Option<f32> {
        let distance = self.distance(false, true);
        if self.total_distance <= 0.0 || distance <= 0.0 {
            return None;
        }
        Some(self.total_distance / distance)
    }

    pub fn deviation(&self) -> f32 {
        let x = (self.adjusted_landing_origin[0] - self.adjusted_takeoff_origin[0]).abs();
        let y = (self.adjusted_landing_origin[1] - self.adjusted_takeoff_origin[1]).abs();
        x.min(y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn max_height(&self) -> f32 {
        self.current_max_height.max(0.0)
    }

    pub fn max_speed(&self) -> f32 {
        self.current_max_speed
    }

    pub fn duck_time(&self, end_only: bool) -> f32 {
        if end_only { self.duck_end_duration } else { self.duck_duration }
    }

    pub fn sync(&self) -> f32 {
        self.sync
    }

    pub fn bad_angles(&self) -> f32 {
        self.bad_angles
    }

    pub fn overlap(&self) -> f32 {
        self.overlap
    }

    pub fn dead_air(&self) -> f32 {
        self.dead_air
    }

    pub fn gain_efficiency(&self) -> Option<f32> {
        self.gain_efficiency
    }
}
