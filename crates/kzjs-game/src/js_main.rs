// js_main.rs: jumpstats sessions for every connected player

use std::collections::HashMap;

use kzjs_common::cvar::{CvarContext, CVAR_ARCHIVE};

use crate::js_cmds;
use crate::js_import::JumpstatsImport;
use crate::js_local::*;
use crate::js_player::{MovementPlayer, PlayerSlot};
use crate::js_report::report_jump;
use crate::js_service::{JumpstatsService, TierDefaults};

pub const KZ_JS_DEFAULT_BROADCAST_TIER: &str = "kz_js_default_broadcast_tier";
pub const KZ_JS_DEFAULT_SOUND_TIER: &str = "kz_js_default_sound_tier";

/// Owns one `JumpstatsService` per connected player and routes the host's
/// per-tick callbacks and client commands to it by slot.
pub struct JumpstatsManager {
    players: HashMap<PlayerSlot, JumpstatsService>,
    cvars: CvarContext,
    gi: Box<dyn JumpstatsImport>,
}

impl JumpstatsManager {
    pub fn new(gi: Box<dyn JumpstatsImport>) -> Self {
        let mut manager = Self { players: HashMap::new(), cvars: CvarContext::new(), gi };
        manager.register_cvars();
        manager
    }

    fn register_cvars(&mut self) {
        let godlike = (DistanceTier::Godlike as u8).to_string();
        self.cvars.register(KZ_JS_DEFAULT_BROADCAST_TIER, &godlike, CVAR_ARCHIVE);
        self.cvars.register(KZ_JS_DEFAULT_SOUND_TIER, &godlike, CVAR_ARCHIVE);
    }

    pub fn cvars(&self) -> &CvarContext {
        &self.cvars
    }

    pub fn cvars_mut(&mut self) -> &mut CvarContext {
        &mut self.cvars
    }

    fn cvar_tier(&self, name: &str, fallback: DistanceTier) -> DistanceTier {
        match self.cvars.variable_string(name).parse() {
            Ok(tier) => tier,
            Err(e) => {
                log::warn!("{}: {}, using {}", name, e, fallback);
                fallback
            }
        }
    }

    /// Current server-wide defaults for new or reset sessions.
    pub fn tier_defaults(&self) -> TierDefaults {
        let fallback = TierDefaults::default();
        TierDefaults {
            broadcast_min_tier: self.cvar_tier(KZ_JS_DEFAULT_BROADCAST_TIER, fallback.broadcast_min_tier),
            sound_min_tier: self.cvar_tier(KZ_JS_DEFAULT_SOUND_TIER, fallback.sound_min_tier),
        }
    }

    // ============================================================
    // Connections
    // ============================================================

    pub fn client_connect(&mut self, slot: PlayerSlot) {
        let service = JumpstatsService::new(self.tier_defaults());
        if self.players.insert(slot, service).is_some() {
            log::debug!("slot {} reconnected, session replaced", slot.0);
        }
    }

    pub fn client_disconnect(&mut self, slot: PlayerSlot) {
        self.players.remove(&slot);
    }

    /// Round start or respawn.
    pub fn reset_player(&mut self, slot: PlayerSlot) {
        let defaults = self.tier_defaults();
        if let Some(service) = self.service_mut(slot) {
            service.reset(defaults);
        }
    }

    pub fn is_connected(&self, slot: PlayerSlot) -> bool {
        self.players.contains_key(&slot)
    }

    pub fn service(&self, slot: PlayerSlot) -> Option<&JumpstatsService> {
        self.players.get(&slot)
    }

    pub fn service_mut(&mut self, slot: PlayerSlot) -> Option<&mut JumpstatsService> {
        let service = self.players.get_mut(&slot);
        if service.is_none() {
            log::warn!("no jumpstats session for slot {}", slot.0);
        }
        service
    }

    // ============================================================
    // Tick routing
    // ============================================================

    pub fn process_movement(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        if let Some(service) = self.service_mut(slot) {
            service.on_process_movement(player);
        }
    }

    pub fn try_player_move(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        if let Some(service) = self.service_mut(slot) {
            service.on_try_player_move(player);
        }
    }

    pub fn try_player_move_post(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        if let Some(service) = self.service_mut(slot) {
            service.on_try_player_move_post(player);
        }
    }

    pub fn air_accelerate(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        if let Some(service) = self.service_mut(slot) {
            service.on_air_accelerate(player);
        }
    }

    pub fn air_accelerate_post(&mut self, slot: PlayerSlot, player: &MovementPlayer, wishdir: Vec3, wishspeed: f32, accel: f32) {
        if let Some(service) = self.service_mut(slot) {
            service.on_air_accelerate_post(player, wishdir, wishspeed, accel);
        }
    }

    pub fn takeoff(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        if let Some(service) = self.service_mut(slot) {
            service.add_jump(player);
        }
    }

    pub fn landing(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        let reportable = self.service_mut(slot).is_some_and(|service| service.end_jump(player));
        if reportable {
            report_jump(self.gi.as_ref(), &self.players, slot);
        }
    }

    pub fn change_move_type(&mut self, slot: PlayerSlot, old_move_type: MoveType, player: &MovementPlayer) {
        let reportable = self
            .service_mut(slot)
            .is_some_and(|service| service.on_change_move_type(old_move_type, player));
        if reportable {
            report_jump(self.gi.as_ref(), &self.players, slot);
        }
    }

    /// Movement end: airborne accumulation and checks, then the edgebug
    /// confirmation and rolling timestamps.
    pub fn process_movement_post(&mut self, slot: PlayerSlot, player: &MovementPlayer) {
        if let Some(service) = self.service_mut(slot) {
            service.update_jump(player);
            service.on_process_movement_post(player);
        }
    }

    /// Returns false when `argv[0]` is not a jumpstats command.
    pub fn client_command(&mut self, slot: PlayerSlot, argv: &[&str]) -> bool {
        let Some(service) = self.players.get_mut(&slot) else {
            return false;
        };
        js_cmds::client_command(service, self.gi.as_ref(), slot, argv)
    }
}
