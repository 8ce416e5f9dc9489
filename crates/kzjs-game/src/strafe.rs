// strafe.rs: a run of air-acceleration attempts sharing one turn direction

use crate::aacall::{AACall, AngleUnit};
use crate::js_local::*;

/// Distribution of per-tick angle ratios over one strafe.
///
/// A ratio of 0 is a perfectly timed turn, negative values mean turning too
/// slowly and positive values turning too fast.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleRatioStats {
    pub average: f32,
    /// Element at index `count / 2` of the ascending contributions.
    pub median: f32,
    pub max: f32,
}

/// Aggregates folded from a strafe's attempts when it ends.
/// Durations are in seconds; losses are positive magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrafeStats {
    pub duration: f32,
    pub sync_duration: f32,
    pub bad_angles: f32,
    pub overlap: f32,
    pub dead_air: f32,
    pub air_gain: f32,
    pub air_loss: f32,
    pub external_gain: f32,
    pub external_loss: f32,
    pub max_gain: f32,
    pub max_speed: f32,
    pub width: f32,
    pub angle_ratio: Option<AngleRatioStats>,
}

impl StrafeStats {
    /// Fold a finished attempt sequence into its aggregates.
    pub fn from_calls(turnstate: TurnState, calls: &[AACall]) -> Self {
        let mut stats = StrafeStats::default();
        for call in calls {
            stats.duration += call.duration;

            // Bad angles / dead air / overlap
            if call.wishspeed == 0.0 {
                if call.is_overlap() {
                    stats.overlap += call.duration;
                } else {
                    stats.dead_air += call.duration;
                }
            } else if vector_length_2d(&vector_subtract(&call.velocity_post, &call.velocity_pre)) <= JS_EPSILON {
                // Quantized float noise, not a real strafe attempt.
                stats.bad_angles += call.duration;
            } else if call.speed_diff() > JS_EPSILON {
                stats.sync_duration += call.duration;
            }

            stats.max_gain += call.ideal_gain();
            let speed_diff = call.speed_diff();
            if speed_diff > 0.0 {
                stats.air_gain += speed_diff;
            } else {
                stats.air_loss -= speed_diff;
            }
            if call.external_speed_diff > 0.0 {
                stats.external_gain += call.external_speed_diff;
            } else {
                stats.external_loss -= call.external_speed_diff;
            }
            stats.max_speed = stats.max_speed.max(call.speed_post());
            stats.width += call.yaw_delta().abs();
        }
        stats.angle_ratio = angle_ratio_stats(turnstate, calls);
        stats
    }
}

/// Strafe angle of one attempt relative to its pre-velocity, in degrees,
/// oriented so that the gaining side is positive.
fn strafe_angle(turnstate: TurnState, call: &AACall, ideal_yaw: f32) -> f32 {
    let vel_yaw = vector_yaw(&call.velocity_pre);
    // Without a wish direction, judge where the view ended up instead.
    let wish_yaw = if call.wishspeed != 0.0 {
        vector_yaw(&call.wishdir)
    } else {
        call.prev_yaw + call.yaw_delta()
    };

    let mut yaw = normalize_deg(wish_yaw - vel_yaw);

    // Ideal yaw is computed for left turns.
    let flip = match turnstate {
        TurnState::Right => true,
        TurnState::None => {
            angle_difference(ideal_yaw, yaw).abs() > angle_difference(ideal_yaw, -yaw).abs()
        }
        TurnState::Left => false,
    };
    if flip {
        yaw = -yaw;
    }

    // Pressing the opposite key while still turning can still gain speed,
    // usually at the very end of a strafe.
    if yaw < 0.0 && call.speed_post() > call.speed_pre() {
        yaw = -yaw;
    }
    yaw
}

/// Score of one attempt and its weight in ticks. `None` when the attempt
/// cannot be judged.
fn angle_ratio(turnstate: TurnState, call: &AACall) -> Option<(f32, f32)> {
    // Any angle is a good angle without horizontal speed.
    if call.speed_pre() == 0.0 {
        return None;
    }
    let min_yaw = normalize_deg(call.min_yaw(AngleUnit::Degrees));
    let ideal_yaw = normalize_deg(call.ideal_yaw(AngleUnit::Degrees));
    let max_yaw = normalize_deg(call.max_yaw(AngleUnit::Degrees));
    let yaw = strafe_angle(turnstate, call, ideal_yaw);

    let fraction = call.duration * ENGINE_FIXED_TICK_RATE;
    let gain_ratio = || {
        let ideal_gain = call.ideal_gain();
        let ratio = call.speed_diff() / ideal_gain;
        (ideal_gain > 0.0 && ratio.is_finite()).then_some(ratio)
    };
    let ratio = if yaw < min_yaw {
        -fraction
    } else if yaw < ideal_yaw {
        (gain_ratio()? - 1.0) * fraction
    } else if yaw < max_yaw {
        (1.0 - gain_ratio()?) * fraction
    } else {
        1.0
    };
    Some((ratio, fraction))
}

/// Weighted angle ratio distribution, or `None` when no attempt could be judged.
pub fn angle_ratio_stats(turnstate: TurnState, calls: &[AACall]) -> Option<AngleRatioStats> {
    let mut total_duration = 0.0f32;
    let mut total_ratios = 0.0f32;
    let mut ratios: Vec<f32> = Vec::with_capacity(calls.len());

    for (ratio, fraction) in calls.iter().filter_map(|call| angle_ratio(turnstate, call)) {
        total_ratios += ratio;
        total_duration += fraction;
        ratios.push(ratio);
    }

    if total_duration == 0.0 || ratios.is_empty() {
        return None;
    }
    ratios.sort_by(|a, b| a.total_cmp(b));
    Some(AngleRatioStats {
        average: total_ratios / total_duration,
        median: ratios[ratios.len() / 2],
        max: ratios[ratios.len() - 1],
    })
}

/// A maximal run of ticks with one turn direction.
#[derive(Debug, Clone, Default)]
pub struct Strafe {
    turnstate: TurnState,
    aa_calls: Vec<AACall>,
    /// Speed changes from collisions during the move, credited at the end.
    collision_gain: f32,
    collision_loss: f32,
    stats: Option<StrafeStats>,
}

impl Strafe {
    pub fn new(turnstate: TurnState) -> Self {
        Self { turnstate, ..Default::default() }
    }

    pub fn turnstate(&self) -> TurnState {
        self.turnstate
    }

    /// A strafe started before the player turned adopts the first real direction.
    pub fn resolve_turnstate(&mut self, turning: TurnState) {
        if !self.turnstate.is_turning() && !self.is_ended() {
            self.turnstate = turning;
        }
    }

    pub fn aa_calls(&self) -> &[AACall] {
        &self.aa_calls
    }

    pub fn push_call(&mut self, call: AACall) {
        if self.is_ended() {
            log::warn!("attempt recorded on a finished strafe, ignoring");
            return;
        }
        self.aa_calls.push(call);
    }

    pub(crate) fn last_call_mut(&mut self) -> Option<&mut AACall> {
        if self.is_ended() {
            return None;
        }
        self.aa_calls.last_mut()
    }

    pub fn update_collision_velocity_change(&mut self, delta: f32) {
        if self.is_ended() {
            return;
        }
        if delta < 0.0 {
            self.collision_loss -= delta;
        } else {
            self.collision_gain += delta;
        }
    }

    /// Finalize the aggregates. Later calls do nothing.
    pub fn end(&mut self) {
        if self.stats.is_some() {
            return;
        }
        let mut stats = StrafeStats::from_calls(self.turnstate, &self.aa_calls);
        stats.external_gain += self.collision_gain;
        stats.external_loss += self.collision_loss;
        self.stats = Some(stats);
    }

    pub fn is_ended(&self) -> bool {
        self.stats.is_some()
    }

    /// Finalized aggregates, zeroed until the strafe ends.
    pub fn stats(&self) -> StrafeStats {
        self.stats.unwrap_or_default()
    }

    pub fn duration(&self) -> f32 {
        self.stats().duration
    }

    pub fn sync_duration(&self) -> f32 {
        self.stats().sync_duration
    }

    pub fn bad_angle_duration(&self) -> f32 {
        self.stats().bad_angles
    }

    pub fn overlap_duration(&self) -> f32 {
        self.stats().overlap
    }

    pub fn dead_air_duration(&self) -> f32 {
        self.stats().dead_air
    }

    pub fn gain(&self, external: bool) -> f32 {
        let stats = self.stats();
        if external { stats.external_gain } else { stats.air_gain }
    }

    pub fn loss(&self, external: bool) -> f32 {
        let stats = self.stats();
        if external { stats.external_loss } else { stats.air_loss }
    }

    pub fn max_gain(&self) -> f32 {
        self.stats().max_gain
    }

    pub fn max_speed(&self) -> f32 {
        self.stats().max_speed
    }

    pub fn width(&self) -> f32 {
        self.stats().width
    }

    pub fn angle_ratio_stats(&self) -> Option<AngleRatioStats> {
        self.stats.and_then(|s| s.angle_ratio)
    }

    fn fraction_of_duration(&self, value: f32) -> Option<f32> {
        let duration = self.duration();
        if duration > 0.0 { Some(value / duration) } else { None }
    }

    pub fn sync(&self) -> Option<f32> {
        self.fraction_of_duration(self.sync_duration())
    }

    pub fn bad_angle_fraction(&self) -> Option<f32> {
        self.fraction_of_duration(self.bad_angle_duration())
    }

    pub fn overlap_fraction(&self) -> Option<f32> {
        self.fraction_of_duration(self.overlap_duration())
    }

    pub fn dead_air_fraction(&self) -> Option<f32> {
        self.fraction_of_duration(self.dead_air_duration())
    }

    /// Average gain per simulated tick.
    pub fn average_gain(&self) -> Option<f32> {
        self.fraction_of_duration(self.gain(false)).map(|g| g * ENGINE_FIXED_TICK_INTERVAL)
    }

    pub fn gain_efficiency(&self) -> Option<f32> {
        let max_gain = self.max_gain();
        if max_gain > 0.0 { Some(self.gain(false) / max_gain) } else { None }
    }
}
