// js_cmds.rs: jumpstats client commands

use thiserror::Error;

use crate::js_import::JumpstatsImport;
use crate::js_local::*;
use crate::js_player::PlayerSlot;
use crate::js_service::JumpstatsService;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {command} <0-6/none/meh/impressive/perfect/godlike/ownage/wrecker>.")]
    TierUsage {
        command: &'static str,
        #[source]
        source: TierParseError,
    },
}

fn parse_tier_arg(command: &'static str, argv: &[&str]) -> Result<DistanceTier, CommandError> {
    let arg = argv.get(1).copied().unwrap_or("");
    arg.parse().map_err(|source| CommandError::TierUsage { command, source })
}

fn cmd_jsbroadcast_f(service: &mut JumpstatsService, gi: &dyn JumpstatsImport, slot: PlayerSlot, argv: &[&str]) {
    match parse_tier_arg("kz_jsbroadcast", argv) {
        Ok(tier) => {
            if service.set_broadcast_min_tier(tier) {
                gi.print_chat(slot, &format!("Jumpstats minimum broadcast tier set to {}.", tier));
            }
        }
        Err(e) => {
            log::debug!("kz_jsbroadcast from slot {}: {:?}", slot.0, e);
            gi.print_chat(slot, &e.to_string());
        }
    }
}

fn cmd_jssound_f(service: &mut JumpstatsService, gi: &dyn JumpstatsImport, slot: PlayerSlot, argv: &[&str]) {
    match parse_tier_arg("kz_jssound", argv) {
        Ok(tier) => {
            if service.set_sound_min_tier(tier) {
                gi.print_chat(slot, &format!("Jumpstats minimum sound tier set to {}.", tier));
            }
        }
        Err(e) => {
            log::debug!("kz_jssound from slot {}: {:?}", slot.0, e);
            gi.print_chat(slot, &e.to_string());
        }
    }
}

fn cmd_togglestats_f(service: &mut JumpstatsService, gi: &dyn JumpstatsImport, slot: PlayerSlot) {
    let state = if service.toggle_jumpstats_reporting() { "enabled" } else { "disabled" };
    gi.print_chat(slot, &format!("You have {} jumpstats reporting.", state));
}

fn cmd_jsalways_f(service: &mut JumpstatsService, gi: &dyn JumpstatsImport, slot: PlayerSlot) {
    let state = if service.toggle_js_always() { "enabled" } else { "disabled" };
    gi.print_chat(slot, &format!("JSAlways {}.", state));
}

/// Handle a jumpstats client command. Returns false if `argv[0]` is not one.
pub fn client_command(service: &mut JumpstatsService, gi: &dyn JumpstatsImport, slot: PlayerSlot, argv: &[&str]) -> bool {
    let cmd = match argv.first() {
        Some(c) => *c,
        None => return false,
    };

    if cmd.eq_ignore_ascii_case("kz_jsbroadcast") {
        cmd_jsbroadcast_f(service, gi, slot, argv);
    } else if cmd.eq_ignore_ascii_case("kz_jssound") {
        cmd_jssound_f(service, gi, slot, argv);
    } else if cmd.eq_ignore_ascii_case("kz_togglestats") || cmd.eq_ignore_ascii_case("kz_togglejs") {
        cmd_togglestats_f(service, gi, slot);
    } else if cmd.eq_ignore_ascii_case("kz_jsalways") {
        cmd_jsalways_f(service, gi, slot);
    } else {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js_import::tests::RecordingImport;

    const SLOT: PlayerSlot = PlayerSlot(4);
    const USAGE: &str = "<0-6/none/meh/impressive/perfect/godlike/ownage/wrecker>.";

    #[test]
    fn test_jsbroadcast_by_name_and_index() {
        let mut svc = JumpstatsService::default();
        let gi = RecordingImport::default();
        assert!(client_command(&mut svc, &gi, SLOT, &["kz_jsbroadcast", "wrecker"]));
        assert_eq!(svc.broadcast_min_tier(), DistanceTier::Wrecker);
        assert!(client_command(&mut svc, &gi, SLOT, &["KZ_JSBROADCAST", "2"]));
        assert_eq!(svc.broadcast_min_tier(), DistanceTier::Impressive);
        assert_eq!(
            gi.chats_to(SLOT),
            vec![
                "Jumpstats minimum broadcast tier set to Wrecker.".to_string(),
                "Jumpstats minimum broadcast tier set to Impressive.".to_string(),
            ]
        );
    }

    #[test]
    fn test_same_tier_is_silent() {
        let mut svc = JumpstatsService::default();
        let gi = RecordingImport::default();
        assert!(client_command(&mut svc, &gi, SLOT, &["kz_jssound", "godlike"]));
        assert!(gi.chats_to(SLOT).is_empty());
    }

    #[test]
    fn test_bad_tier_prints_usage_and_keeps_setting() {
        let mut svc = JumpstatsService::default();
        let gi = RecordingImport::default();
        for argv in [&["kz_jssound"][..], &["kz_jssound", ""], &["kz_jssound", "7"], &["kz_jssound", "amazing"]] {
            assert!(client_command(&mut svc, &gi, SLOT, argv));
        }
        assert_eq!(svc.sound_min_tier(), DistanceTier::Godlike);
        let chats = gi.chats_to(SLOT);
        assert_eq!(chats.len(), 4);
        for msg in chats {
            assert_eq!(msg, format!("Usage: kz_jssound {}", USAGE));
        }
    }

    #[test]
    fn test_none_disables_broadcast() {
        let mut svc = JumpstatsService::default();
        let gi = RecordingImport::default();
        client_command(&mut svc, &gi, SLOT, &["kz_jsbroadcast", "none"]);
        assert_eq!(svc.broadcast_min_tier(), DistanceTier::None);
    }

    #[test]
    fn test_toggles() {
        let mut svc = JumpstatsService::default();
        let gi = RecordingImport::default();
        client_command(&mut svc, &gi, SLOT, &["kz_togglestats"]);
        assert!(!svc.show_jumpstats());
        client_command(&mut svc, &gi, SLOT, &["kz_togglejs"]);
        assert!(svc.show_jumpstats());
        client_command(&mut svc, &gi, SLOT, &["kz_jsalways"]);
        assert!(svc.js_always());
        assert_eq!(
            gi.chats_to(SLOT),
            vec![
                "You have disabled jumpstats reporting.".to_string(),
                "You have enabled jumpstats reporting.".to_string(),
                "JSAlways enabled.".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut svc = JumpstatsService::default();
        let gi = RecordingImport::default();
        assert!(!client_command(&mut svc, &gi, SLOT, &["kz_pb"]));
        assert!(!client_command(&mut svc, &gi, SLOT, &[]));
    }

    #[test]
    fn test_usage_error_keeps_parse_cause() {
        let err = parse_tier_arg("kz_jsbroadcast", &["kz_jsbroadcast", "9"]).unwrap_err();
        assert_eq!(
            err,
            CommandError::TierUsage { command: "kz_jsbroadcast", source: TierParseError::OutOfRange(9) }
        );
    }
}
