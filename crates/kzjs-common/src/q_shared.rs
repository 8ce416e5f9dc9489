// q_shared.rs: movement-side types and vector math shared by all modules

// ============================================================
// Basic types
// ============================================================

pub type Vec3 = [f32; 3];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

// Angle indexes
pub const PITCH: usize = 0; // up / down
pub const YAW: usize = 1; // left / right
pub const ROLL: usize = 2; // fall over

// ============================================================
// Simulation timing
// ============================================================

/// Fixed simulation rate of the host movement code, in ticks per second.
pub const ENGINE_FIXED_TICK_RATE: f32 = 64.0;
pub const ENGINE_FIXED_TICK_INTERVAL: f32 = 1.0 / ENGINE_FIXED_TICK_RATE;

/// Air acceleration never adds more than this much wish speed in one attempt,
/// independent of tick rate.
pub const AIR_WISHSPEED_CAP: f32 = 30.0;

// ============================================================
// Degree / radian conversion
// ============================================================

pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

// ============================================================
// Input buttons
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u64 {
        const ATTACK    = 0x0000_0001;
        const JUMP      = 0x0000_0002;
        const DUCK      = 0x0000_0004;
        const FORWARD   = 0x0000_0008;
        const BACK      = 0x0000_0010;
        const USE       = 0x0000_0020;
        const MOVELEFT  = 0x0000_0200;
        const MOVERIGHT = 0x0000_0400;
        const SPEED     = 0x0001_0000;

        const MOVEMENT = Self::FORWARD.bits() | Self::BACK.bits()
            | Self::MOVELEFT.bits() | Self::MOVERIGHT.bits();
    }
}
pub const IN_ATTACK: Buttons = Buttons::ATTACK;
pub const IN_JUMP: Buttons = Buttons::JUMP;
pub const IN_DUCK: Buttons = Buttons::DUCK;
pub const IN_FORWARD: Buttons = Buttons::FORWARD;
pub const IN_BACK: Buttons = Buttons::BACK;
pub const IN_MOVELEFT: Buttons = Buttons::MOVELEFT;
pub const IN_MOVERIGHT: Buttons = Buttons::MOVERIGHT;

// ============================================================
// Pawn flags
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PlayerFlags: u32 {
        const ONGROUND     = 0x0000_0001;
        const DUCKING      = 0x0000_0002;
        const BASEVELOCITY = 0x0000_0100;
    }
}
pub const FL_ONGROUND: PlayerFlags = PlayerFlags::ONGROUND;
pub const FL_DUCKING: PlayerFlags = PlayerFlags::DUCKING;
pub const FL_BASEVELOCITY: PlayerFlags = PlayerFlags::BASEVELOCITY;

// ============================================================
// Movement types
// ============================================================

/// Movement mode the pawn is simulated with this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(u8)]
pub enum MoveType {
    None = 0,
    Observer = 1,
    #[default]
    Walk = 2,
    Fly = 3,
    FlyGravity = 4,
    VPhysics = 5,
    Push = 6,
    Noclip = 7,
    Ladder = 8,
}

/// Which way the player's view is rotating this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(i8)]
pub enum TurnState {
    Right = -1,
    #[default]
    None = 0,
    Left = 1,
}

impl TurnState {
    /// Turn direction from a signed yaw delta (positive yaw is a left turn).
    pub fn from_yaw_delta(delta: f32) -> Self {
        if delta > 0.0 {
            TurnState::Left
        } else if delta < 0.0 {
            TurnState::Right
        } else {
            TurnState::None
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            TurnState::Left => TurnState::Right,
            TurnState::Right => TurnState::Left,
            TurnState::None => TurnState::None,
        }
    }

    pub fn is_turning(self) -> bool {
        self != TurnState::None
    }
}

// ============================================================
// MATHLIB: Vector operations
// ============================================================

#[inline]
pub fn vector_subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn vector_add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vector_scale(v: &Vec3, scale: f32) -> Vec3 {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

pub fn vector_length(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn vector_length_sqr(v: &Vec3) -> f32 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

/// Horizontal (XY) length, ignoring the vertical component.
#[inline]
pub fn vector_length_2d(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

#[inline]
pub fn vector_length_2d_sqr(v: &Vec3) -> f32 {
    v[0] * v[0] + v[1] * v[1]
}

/// Horizontal distance between two points.
pub fn distance_2d(a: &Vec3, b: &Vec3) -> f32 {
    vector_length_2d(&vector_subtract(a, b))
}

/// Converts a direction vector to Euler angles without integer truncation.
/// Yaw lands in [0, 360).
pub fn vectoangles2(value1: &Vec3, angles: &mut Vec3) {
    if value1[1] == 0.0 && value1[0] == 0.0 {
        angles[YAW] = 0.0;
        angles[PITCH] = if value1[2] > 0.0 { -90.0 } else { -270.0 };
        angles[ROLL] = 0.0;
    } else {
        angles[YAW] = if value1[0] != 0.0 {
            value1[1].atan2(value1[0]) * RAD_TO_DEG
        } else if value1[1] > 0.0 {
            90.0
        } else {
            270.0
        };
        if angles[YAW] < 0.0 {
            angles[YAW] += 360.0;
        }

        let forward = (value1[0] * value1[0] + value1[1] * value1[1]).sqrt();
        angles[PITCH] = -(value1[2].atan2(forward) * RAD_TO_DEG);
        angles[ROLL] = 0.0;
    }
}

/// Yaw of a direction vector, in degrees.
pub fn vector_yaw(v: &Vec3) -> f32 {
    let mut angles = VEC3_ORIGIN;
    vectoangles2(v, &mut angles);
    angles[YAW]
}

/// Wraps an angle in degrees into [-180, 180).
pub fn normalize_deg(a: f32) -> f32 {
    let a = a % 360.0;
    if a >= 180.0 {
        a - 360.0
    } else if a < -180.0 {
        a + 360.0
    } else {
        a
    }
}

/// Signed shortest-path rotation from `source` to `target`, in degrees,
/// within [-180, 180).
pub fn angle_difference(source: f32, target: f32) -> f32 {
    normalize_deg(target - source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_length_2d_ignores_z() {
        let v: Vec3 = [3.0, 4.0, 100.0];
        assert_eq!(vector_length_2d(&v), 5.0);
        assert_eq!(vector_length_2d_sqr(&v), 25.0);
    }

    #[test]
    fn test_distance_2d() {
        let a: Vec3 = [10.0, 0.0, 5.0];
        let b: Vec3 = [10.0, 8.0, -5.0];
        assert_eq!(distance_2d(&a, &b), 8.0);
    }

    #[test]
    fn test_vectoangles2_quadrants() {
        assert!((vector_yaw(&[1.0, 0.0, 0.0]) - 0.0).abs() < 1e-4);
        assert!((vector_yaw(&[0.0, 1.0, 0.0]) - 90.0).abs() < 1e-4);
        assert!((vector_yaw(&[-1.0, 0.0, 0.0]) - 180.0).abs() < 1e-4);
        assert!((vector_yaw(&[0.0, -1.0, 0.0]) - 270.0).abs() < 1e-4);
        assert!((vector_yaw(&[1.0, -1.0, 0.0]) - 315.0).abs() < 1e-4);
    }

    #[test]
    fn test_vectoangles2_straight_up() {
        let mut angles = VEC3_ORIGIN;
        vectoangles2(&[0.0, 0.0, 1.0], &mut angles);
        assert_eq!(angles[YAW], 0.0);
        assert_eq!(angles[PITCH], -90.0);
    }

    #[test]
    fn test_normalize_deg_range() {
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(180.0), -180.0);
        assert_eq!(normalize_deg(-180.0), -180.0);
        assert_eq!(normalize_deg(190.0), -170.0);
        assert_eq!(normalize_deg(-190.0), 170.0);
        assert_eq!(normalize_deg(720.0 + 45.0), 45.0);
    }

    #[test]
    fn test_angle_difference_wraps_shortest_path() {
        assert_eq!(angle_difference(350.0, 10.0), 20.0);
        assert_eq!(angle_difference(10.0, 350.0), -20.0);
        assert_eq!(angle_difference(90.0, 45.0), -45.0);
    }

    #[test]
    fn test_turnstate_from_yaw_delta() {
        assert_eq!(TurnState::from_yaw_delta(1.5), TurnState::Left);
        assert_eq!(TurnState::from_yaw_delta(-0.1), TurnState::Right);
        assert_eq!(TurnState::from_yaw_delta(0.0), TurnState::None);
        assert_eq!(TurnState::Left.opposite(), TurnState::Right);
        assert_eq!(TurnState::None.opposite(), TurnState::None);
    }

    #[test]
    fn test_movement_buttons_mask() {
        let all = IN_FORWARD | IN_BACK | IN_MOVELEFT | IN_MOVERIGHT;
        assert_eq!(Buttons::MOVEMENT, all);
        assert!(!Buttons::MOVEMENT.contains(IN_JUMP));
    }
}
