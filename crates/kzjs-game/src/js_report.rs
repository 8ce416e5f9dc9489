// js_report.rs: who gets told about a finished jump, and how

use std::collections::HashMap;

use crate::js_import::JumpstatsImport;
use crate::js_local::*;
use crate::js_player::PlayerSlot;
use crate::js_service::JumpstatsService;
use crate::jump::Jump;

const JS_SOUND_VOLUME: f32 = 0.5;

fn percent(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

fn decimal(value: Option<f32>, places: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", places, v),
        None => "N/A".to_string(),
    }
}

/// Two-line summary shown to the jumper.
pub fn format_jump_chat(jump: &Jump) -> String {
    let floored = (jump.distance(true, false) * 10.0).floor() / 10.0;
    format!(
        "{}: {:.1} | {} Strafes | {:.0}% Sync | {:.2} Pre | {:.2} Max\n\
         BA {:.0}% | OL {:.0}% | DA {:.0}% | {:.1} Deviation | {:.1} Width | {:.2} Height",
        jump.jump_type().short_name(),
        floored,
        jump.strafes().len(),
        jump.sync() * 100.0,
        jump.takeoff_speed(),
        jump.max_speed(),
        jump.bad_angles() * 100.0,
        jump.overlap() * 100.0,
        jump.dead_air() * 100.0,
        jump.deviation(),
        jump.width(),
        jump.max_height(),
    )
}

pub fn format_jump_broadcast(jumper_name: &str, mode_name: &str, jump: &Jump) -> String {
    format!(
        "{} jumped {:.1} units with a {} [{}]",
        jumper_name,
        jump.distance(true, false),
        jump.jump_type().name(),
        mode_name
    )
}

/// Full breakdown for the console, one line per strafe.
pub fn format_jump_console(gi: &dyn JumpstatsImport, slot: PlayerSlot, jump: &Jump) -> Vec<String> {
    let reason = jump.invalidate_reason().map(|r| format!("({})", r)).unwrap_or_default();
    let mut lines = vec![
        format!(
            "{} jumped {:.4} units with a {} {}",
            gi.player_name(slot),
            jump.distance(true, false),
            jump.jump_type().name(),
            reason
        ),
        format!(
            "{} | {} | {} Strafes | {:.1}% Sync | {:.2} Pre | {:.2} Max | {:.0}% BA | {:.0}% OL | {:.0}% DA | {:.2} Height",
            gi.mode_short_name(slot),
            gi.style_short_name(slot),
            jump.strafes().len(),
            jump.sync() * 100.0,
            jump.takeoff_speed(),
            jump.max_speed(),
            jump.bad_angles() * 100.0,
            jump.overlap() * 100.0,
            jump.dead_air() * 100.0,
            jump.max_height(),
        ),
        format!(
            "{} GainEff | {} Airpath | {:.1} Deviation | {:.1} Width | {:.4} Airtime | {:.1} Offset | {:.2}/{:.2} Crouched",
            percent(jump.gain_efficiency()),
            decimal(jump.air_path(), 3),
            jump.deviation(),
            jump.width(),
            jump.airtime(),
            jump.offset(),
            jump.duck_time(true),
            jump.duck_time(false),
        ),
        format!(
            "#.{:>5} {:>9} {:>17} {:>11} {:>7} {:>7} {:>4} {:>4} {:>9} {:>7} AngRatio(Avg/Med/Max)",
            "Sync", "Gain", "Loss", "Max", "Air", "BA", "OL", "DA", "AvgGain", "GainEff"
        ),
    ];

    for (i, strafe) in jump.strafes().iter().enumerate() {
        let ang_ratio = match strafe.angle_ratio_stats() {
            Some(ar) => format!("{:.2}/{:.2}/{:.2}", ar.average, ar.median, ar.max),
            None => "N/A".to_string(),
        };
        lines.push(format!(
            "{}.{:>5} {:>7.2}{:<10} -{:>6.2}{:<10} {:<7.2} {:<8.3} {:<4} {:<4} {:<4} {:<7} {:<7} {}",
            i + 1,
            percent(strafe.sync()),
            strafe.gain(false),
            format!("(+{:.2})", strafe.gain(true)),
            strafe.loss(false),
            format!("(-{:.2})", strafe.loss(true)),
            strafe.max_speed(),
            strafe.duration(),
            percent(strafe.bad_angle_fraction()),
            percent(strafe.overlap_fraction()),
            percent(strafe.dead_air_fraction()),
            decimal(strafe.average_gain(), 2),
            percent(strafe.gain_efficiency()),
            ang_ratio,
        ));
    }
    lines
}

/// Deliver the jumper's last, finished jump: chat to the jumper, broadcast to
/// other players, tier sound to the jumper, and the console breakdown.
pub fn report_jump(gi: &dyn JumpstatsImport, players: &HashMap<PlayerSlot, JumpstatsService>, slot: PlayerSlot) {
    let Some(service) = players.get(&slot) else {
        log::warn!("report for unknown player slot {}", slot.0);
        return;
    };
    let Some(jump) = service.last_jump().filter(|jump| jump.is_ended()) else {
        log::warn!("report without a finished jump for slot {}", slot.0);
        return;
    };
    let tier = gi.distance_tier(slot, jump.jump_type(), jump.distance(true, false));

    if service.show_jumpstats() {
        gi.print_chat(slot, &format_jump_chat(jump));
    }
    broadcast_jump(gi, players, slot, jump, tier);
    play_jump_sound(gi, service, slot, tier);
    for line in format_jump_console(gi, slot, jump) {
        gi.print_console(slot, &line);
    }
}

fn broadcast_jump(
    gi: &dyn JumpstatsImport,
    players: &HashMap<PlayerSlot, JumpstatsService>,
    jumper: PlayerSlot,
    jump: &Jump,
    tier: DistanceTier,
) {
    if !gi.style_short_name(jumper).eq_ignore_ascii_case(JS_BROADCAST_STYLE) {
        return;
    }
    if !(jump.offset() > -JS_EPSILON && jump.is_valid()) {
        return;
    }

    let mut msg: Option<String> = None;
    for (&receiver, service) in players {
        if receiver == jumper {
            continue;
        }
        let min_tier = service.broadcast_min_tier();
        if min_tier == DistanceTier::None || tier < min_tier {
            continue;
        }
        let text = msg.get_or_insert_with(|| format_jump_broadcast(&gi.player_name(jumper), &gi.mode_name(jumper), jump));
        gi.print_chat(receiver, text);
    }
}

fn play_jump_sound(gi: &dyn JumpstatsImport, service: &JumpstatsService, slot: PlayerSlot, tier: DistanceTier) {
    let min_tier = service.sound_min_tier();
    if min_tier == DistanceTier::None || tier <= DistanceTier::Meh || tier < min_tier {
        return;
    }
    if let Some(sound) = tier.sound() {
        gi.play_sound(slot, sound, JS_SOUND_VOLUME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js_import::tests::RecordingImport;
    use crate::js_service::tests::*;

    const JUMPER: PlayerSlot = PlayerSlot(1);
    const OTHER: PlayerSlot = PlayerSlot(2);

    /// Jumper lands a clean long jump of `ticks` airborne ticks.
    fn players_after_jump(ticks: usize) -> HashMap<PlayerSlot, JumpstatsService> {
        let (mut svc, mut player) = settled();
        take_off(&mut svc, &mut player);
        for _ in 0..ticks {
            air_tick(&mut svc, &mut player, TurnState::Left);
        }
        assert!(land(&mut svc, &mut player));
        let mut players = HashMap::new();
        players.insert(JUMPER, svc);
        players.insert(OTHER, JumpstatsService::default());
        players
    }

    fn godlike_import() -> RecordingImport {
        RecordingImport { tiers: vec![(0.0, DistanceTier::Godlike)], ..Default::default() }
    }

    #[test]
    fn test_godlike_jump_reaches_everyone() {
        let players = players_after_jump(40);
        let gi = godlike_import();
        report_jump(&gi, &players, JUMPER);

        assert_eq!(gi.chats_to(JUMPER).len(), 1);
        assert!(gi.chats_to(JUMPER)[0].starts_with("LJ: "));
        let broadcast = gi.chats_to(OTHER);
        assert_eq!(broadcast.len(), 1);
        assert!(broadcast[0].starts_with("p1 jumped "), "{}", broadcast[0]);
        assert!(broadcast[0].ends_with("with a Long Jump [Classic]"));
        assert_eq!(gi.sounds_to(JUMPER), vec!["kz.godlike".to_string()]);
        assert!(gi.sounds_to(OTHER).is_empty());

        let console = gi.console_to(JUMPER);
        // header, stats, extra stats, strafe table header, one strafe
        assert_eq!(console.len(), 5);
        assert!(console[0].starts_with("p1 jumped "));
        assert!(console[1].starts_with("CKZ | NRM | 1 Strafes"));
    }

    #[test]
    fn test_below_receiver_tier_not_broadcast() {
        let mut players = players_after_jump(40);
        players.get_mut(&OTHER).unwrap().set_broadcast_min_tier(DistanceTier::Ownage);
        let gi = godlike_import();
        report_jump(&gi, &players, JUMPER);
        assert!(gi.chats_to(OTHER).is_empty());
    }

    #[test]
    fn test_receiver_opted_out() {
        let mut players = players_after_jump(40);
        players.get_mut(&OTHER).unwrap().set_broadcast_min_tier(DistanceTier::None);
        let gi = godlike_import();
        report_jump(&gi, &players, JUMPER);
        assert!(gi.chats_to(OTHER).is_empty());
    }

    #[test]
    fn test_non_default_style_not_broadcast() {
        let players = players_after_jump(40);
        let mut gi = godlike_import();
        gi.styles.insert(JUMPER, "AUTO".to_string());
        report_jump(&gi, &players, JUMPER);
        assert!(gi.chats_to(OTHER).is_empty());
        assert_eq!(gi.chats_to(JUMPER).len(), 1);
    }

    #[test]
    fn test_style_match_ignores_case() {
        let players = players_after_jump(40);
        let mut gi = godlike_import();
        gi.styles.insert(JUMPER, "nrm".to_string());
        report_jump(&gi, &players, JUMPER);
        assert_eq!(gi.chats_to(OTHER).len(), 1);
    }

    #[test]
    fn test_hidden_jumpstats_still_log_console() {
        let mut players = players_after_jump(40);
        players.get_mut(&JUMPER).unwrap().toggle_jumpstats_reporting();
        let gi = godlike_import();
        report_jump(&gi, &players, JUMPER);
        assert!(gi.chats_to(JUMPER).is_empty());
        assert!(!gi.console_to(JUMPER).is_empty());
    }

    #[test]
    fn test_sound_thresholds() {
        let players = players_after_jump(40);

        let meh = RecordingImport { tiers: vec![(0.0, DistanceTier::Meh)], ..Default::default() };
        let mut low_players = players.clone();
        low_players.get_mut(&JUMPER).unwrap().set_sound_min_tier(DistanceTier::Meh);
        report_jump(&meh, &low_players, JUMPER);
        assert!(meh.sounds_to(JUMPER).is_empty());

        let perfect = RecordingImport { tiers: vec![(0.0, DistanceTier::Perfect)], ..Default::default() };
        report_jump(&perfect, &players, JUMPER);
        // default sound tier is Godlike
        assert!(perfect.sounds_to(JUMPER).is_empty());
        report_jump(&perfect, &low_players, JUMPER);
        assert_eq!(perfect.sounds_to(JUMPER), vec!["kz.perfect".to_string()]);

        let mut muted = players.clone();
        muted.get_mut(&JUMPER).unwrap().set_sound_min_tier(DistanceTier::None);
        let gi = godlike_import();
        report_jump(&gi, &muted, JUMPER);
        assert!(gi.sounds_to(JUMPER).is_empty());
    }

    #[test]
    fn test_invalid_jump_reported_to_self_only() {
        let (mut svc, mut player) = settled();
        svc.toggle_js_always();
        take_off(&mut svc, &mut player);
        for _ in 0..10 {
            air_tick(&mut svc, &mut player, TurnState::Left);
        }
        svc.invalidate_jumpstats("Externally modified");
        assert!(land(&mut svc, &mut player));
        let mut players = HashMap::new();
        players.insert(JUMPER, svc);
        players.insert(OTHER, JumpstatsService::default());

        let gi = godlike_import();
        report_jump(&gi, &players, JUMPER);
        assert!(gi.chats_to(OTHER).is_empty());
        assert_eq!(gi.chats_to(JUMPER).len(), 1);
        assert!(gi.console_to(JUMPER)[0].ends_with("(Externally modified)"));
    }

    #[test]
    fn test_console_marks_unavailable_ratios() {
        let players = players_after_jump(40);
        let gi = godlike_import();
        let lines = format_jump_console(&gi, JUMPER, players[&JUMPER].last_jump().unwrap());
        assert!(lines[3].starts_with("#."));
        assert!(!lines[4].contains("NaN"));
    }
}
