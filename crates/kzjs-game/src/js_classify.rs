// js_classify.rs: takeoff classification

use crate::js_local::*;
use crate::jump::Jump;

/// What the classifier needs to know about the jump before this one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousJump {
    pub jump_type: JumpType,
    pub offset: f32,
    pub hit_head: bool,
}

impl From<&Jump> for PreviousJump {
    fn from(jump: &Jump) -> Self {
        Self {
            jump_type: jump.jump_type(),
            offset: jump.offset(),
            hit_head: jump.hit_head(),
        }
    }
}

/// Snapshot of the takeoff tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TakeoffContext {
    pub curtime: f32,
    pub takeoff_from_ladder: bool,
    pub ignore_ladder_jump_time: f32,
    pub last_jump_button_time: f32,
    pub jumped: bool,
    pub duck_bugged: bool,
    /// Ground time before this takeoff was short enough to count as a bhop.
    pub hit_bhop: bool,
    pub duck_bugged_recently: bool,
    pub ground_speed_capped_recently: bool,
}

impl TakeoffContext {
    /// The engine flagged this ladder dismount and the jump press falls inside
    /// that window.
    fn ignored_ladder_jump(&self) -> bool {
        let mark = self.ignore_ladder_jump_time;
        mark > self.curtime - ENGINE_FIXED_TICK_INTERVAL
            && self.last_jump_button_time > mark - IGNORE_JUMP_TIME
            && self.last_jump_button_time < mark + ENGINE_FIXED_TICK_INTERVAL
    }
}

/// Decide the type of a jump at takeoff. Guards run in order; the first match wins.
pub fn determine_jump_type(ctx: &TakeoffContext, prev: Option<PreviousJump>) -> JumpType {
    // 1. ladder takeoff
    if ctx.takeoff_from_ladder {
        if ctx.ignored_ladder_jump() {
            return JumpType::Invalid;
        }
        return if ctx.jumped { JumpType::Ladderhop } else { JumpType::LadderJump };
    }

    // 2. walked off
    if !ctx.jumped {
        return JumpType::Fall;
    }

    // 3. jumpbug off a flat long jump
    if ctx.duck_bugged {
        return match prev {
            Some(p) if p.offset < JS_EPSILON && p.jump_type == JumpType::LongJump => JumpType::Jumpbug,
            _ => JumpType::Invalid,
        };
    }

    // 4. bhop chain
    if ctx.hit_bhop && !ctx.duck_bugged_recently {
        let Some(p) = prev else {
            return JumpType::Other;
        };
        if p.hit_head {
            return JumpType::Invalid;
        }
        if p.offset.abs() < JS_EPSILON {
            return match p.jump_type {
                JumpType::LongJump => JumpType::Bhop,
                JumpType::Bhop | JumpType::MultiBhop => JumpType::MultiBhop,
                _ => JumpType::Other,
            };
        }
        if p.jump_type == JumpType::Fall && p.offset > -JS_MAX_WEIRDJUMP_FALL_OFFSET {
            return JumpType::WeirdJump;
        }
        return JumpType::Other;
    }

    // 5. prestrafe abuse
    if ctx.duck_bugged_recently || !ctx.ground_speed_capped_recently {
        return JumpType::Invalid;
    }

    JumpType::LongJump
}
