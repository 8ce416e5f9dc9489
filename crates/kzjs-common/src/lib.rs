#![allow(clippy::float_cmp, clippy::manual_range_contains, clippy::collapsible_else_if)]

pub mod q_shared;
pub mod cvar;
