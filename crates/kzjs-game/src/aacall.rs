// aacall.rs: one air-acceleration attempt and the ideal strafe model
//
// The formulas mirror PM_AirAccelerate: each attempt can add at most
// `accel * wishspeed * friction * frametime` along wishdir, and only while the
// projected speed on wishdir stays under the 30 u/s air wish speed cap.

use crate::js_local::*;

/// Unit for the angle-returning calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    Radians,
    #[default]
    Degrees,
}

impl AngleUnit {
    fn from_radians(self, rad: f64) -> f32 {
        match self {
            AngleUnit::Radians => rad as f32,
            AngleUnit::Degrees => rad.to_degrees() as f32,
        }
    }
}

/// One air-acceleration attempt, recorded over a single tick.
///
/// Created by `on_air_accelerate` with the pre-acceleration velocity, then
/// completed by `on_air_accelerate_post` in the same tick. Never modified after.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AACall {
    pub velocity_pre: Vec3,
    pub velocity_post: Vec3,
    pub wishdir: Vec3,
    pub wishspeed: f32,
    pub accel: f32,
    pub maxspeed: f32,
    pub surface_friction: f32,
    pub duration: f32,
    pub ducking: bool,
    pub buttons: Buttons,
    pub prev_yaw: f32,
    pub current_yaw: f32,
    /// Speed change since last tick's post-move that input did not cause.
    pub external_speed_diff: f32,
    pub tickcount: i32,
    pub curtime: f32,
}

impl AACall {
    pub fn speed_pre(&self) -> f32 {
        vector_length_2d(&self.velocity_pre)
    }

    pub fn speed_post(&self) -> f32 {
        vector_length_2d(&self.velocity_post)
    }

    /// Signed horizontal speed change caused by this attempt.
    pub fn speed_diff(&self) -> f32 {
        self.speed_post() - self.speed_pre()
    }

    /// Shortest-path yaw change between the previous and current view.
    pub fn yaw_delta(&self) -> f32 {
        angle_difference(self.prev_yaw, self.current_yaw)
    }

    /// Speed the acceleration step can add at most this tick.
    /// With `try_max_speed`, a zero wishspeed falls back to maxspeed.
    pub fn accel_speed(&self, try_max_speed: bool) -> f32 {
        let speed = if try_max_speed && self.wishspeed == 0.0 {
            self.maxspeed
        } else {
            self.wishspeed
        };
        self.accel * speed * self.surface_friction * self.duration
    }

    /// Angle between wishdir and velocity that yields the most gain.
    pub fn ideal_yaw(&self, unit: AngleUnit) -> f32 {
        let accelspeed = self.accel_speed(true) as f64;
        if accelspeed <= 0.0 {
            return unit.from_radians(std::f64::consts::PI);
        }

        let speed = self.speed_pre() as f64;
        if speed == 0.0 {
            return 0.0;
        }

        let tmp = AIR_WISHSPEED_CAP as f64 - accelspeed;
        if tmp <= 0.0 {
            return unit.from_radians(std::f64::consts::FRAC_PI_2);
        }
        if tmp < speed {
            return unit.from_radians((tmp / speed).acos());
        }
        0.0
    }

    /// Below this angle the attempt cannot add speed at all.
    pub fn min_yaw(&self, unit: AngleUnit) -> f32 {
        let speed = self.speed_pre() as f64;
        if speed <= AIR_WISHSPEED_CAP as f64 {
            return 0.0;
        }
        unit.from_radians((AIR_WISHSPEED_CAP as f64 / speed).acos())
    }

    /// Above this angle the attempt loses speed.
    pub fn max_yaw(&self, unit: AngleUnit) -> f32 {
        let gamma = self.accel_speed(true);
        let speed = self.speed_pre();
        let (numer, denom) = if gamma <= 2.0 * AIR_WISHSPEED_CAP {
            (-gamma, 2.0 * speed)
        } else {
            (-AIR_WISHSPEED_CAP, speed)
        };
        if denom < numer.abs() {
            return self.ideal_yaw(unit);
        }
        unit.from_radians((numer as f64 / denom as f64).acos())
    }

    /// Speed gained by turning exactly at the ideal yaw.
    pub fn ideal_gain(&self) -> f32 {
        let a = self.accel_speed(true).min(AIR_WISHSPEED_CAP);
        let speed = self.speed_pre();
        let ideal = self.ideal_yaw(AngleUnit::Radians);
        let ideal_speed = (vector_length_2d_sqr(&self.velocity_pre) + a * a + 2.0 * a * speed * ideal.cos()).sqrt();
        ideal_speed - speed
    }

    /// True when no real wish direction exists: either nothing is held or
    /// opposing keys cancel out.
    pub fn is_overlap(&self) -> bool {
        self.wishspeed == 0.0 && self.buttons.intersects(Buttons::MOVEMENT)
    }
}
