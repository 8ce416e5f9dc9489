#![allow(clippy::float_cmp, clippy::manual_range_contains, clippy::collapsible_else_if,
         clippy::too_many_arguments)]
// Jumpstats: airborne movement analysis, classification and reporting

pub mod js_local;
pub mod js_player;
pub mod aacall;
pub mod strafe;
pub mod jump;
pub mod js_classify;
pub mod js_service;
pub mod js_monitor;
pub mod js_import;
pub mod js_report;
pub mod js_cmds;
pub mod js_main;
