//! Host interface used by the jumpstats core.
//!
//! The host owns player names, movement modes and styles, chat and sound
//! delivery. The manager holds one boxed implementation and passes it down
//! explicitly; nothing here is global.

use crate::js_local::*;
use crate::js_player::PlayerSlot;

pub trait JumpstatsImport {
    // Player info
    fn player_name(&self, slot: PlayerSlot) -> String;
    fn mode_name(&self, slot: PlayerSlot) -> String;
    fn mode_short_name(&self, slot: PlayerSlot) -> String;
    fn style_short_name(&self, slot: PlayerSlot) -> String;

    /// Tier thresholds depend on the player's mode.
    fn distance_tier(&self, slot: PlayerSlot, jump_type: JumpType, distance: f32) -> DistanceTier;

    // Output
    fn print_chat(&self, slot: PlayerSlot, msg: &str);
    fn print_console(&self, slot: PlayerSlot, msg: &str);
    fn play_sound(&self, slot: PlayerSlot, sound: &str, volume: f32);
}

/// Import used when no host is attached. Output goes to the log; every jump
/// is rated `None` under the default mode and style.
pub struct StubJumpstatsImport;

impl JumpstatsImport for StubJumpstatsImport {
    fn player_name(&self, slot: PlayerSlot) -> String {
        format!("player{}", slot.0)
    }
    fn mode_name(&self, _slot: PlayerSlot) -> String {
        "Vanilla".to_string()
    }
    fn mode_short_name(&self, _slot: PlayerSlot) -> String {
        "VNL".to_string()
    }
    fn style_short_name(&self, _slot: PlayerSlot) -> String {
        JS_BROADCAST_STYLE.to_string()
    }
    fn distance_tier(&self, _slot: PlayerSlot, _jump_type: JumpType, _distance: f32) -> DistanceTier {
        DistanceTier::None
    }
    fn print_chat(&self, slot: PlayerSlot, msg: &str) {
        log::info!("[chat {}] {}", slot.0, msg);
    }
    fn print_console(&self, slot: PlayerSlot, msg: &str) {
        log::info!("[console {}] {}", slot.0, msg);
    }
    fn play_sound(&self, slot: PlayerSlot, sound: &str, _volume: f32) {
        log::info!("[sound {}] {}", slot.0, sound);
    }
}
