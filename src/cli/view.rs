//! Terminal presentation of the playback
//!
//! This module tracks what the terminal already shows and prints only what
//! changed: phase headers, deaths, the presented event and the winner.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::error::PlaybackError;
use crate::playback::PlaybackObserver;
use crate::types::{
    Channel, DeathCause, DisplayState, EventKind, GameSnapshot, Mode, Phase, PhaseEvent, Player,
    PlayerId, Role, Team,
};

/// Latest snapshot seen by the renderer, shared with the input reader
pub type SharedSnapshot = Arc<Mutex<Option<GameSnapshot>>>;

/// Shorten `text` to at most `max_len` characters, marking the cut with `...`
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn player_list(ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| format!("P{id}"))
        .collect::<Vec<_>>()
        .join(" vs ")
}

/// Round and phase as shown in headers, e.g. "Round 2: Day - Vote"
pub fn format_phase(round: u32, phase: Phase) -> String {
    if phase == Phase::Setup {
        return phase.display_name().to_string();
    }
    format!("Round {}: {}", round, phase.display_name())
}

/// One-line log entry for any event, including the non-steppable kinds
pub fn format_event(event: &PhaseEvent) -> String {
    let speaker = event
        .speaker_id
        .map(|id| format!("P{id}"))
        .unwrap_or_default();

    match &event.kind {
        EventKind::PhaseChange { new_phase } => format!("-- {} --", new_phase),
        EventKind::Message { text } => {
            let channel = if event.channel == Some(Channel::Werewolf) {
                " (wolf)"
            } else {
                ""
            };
            format!("[say] {speaker}{channel}: \"{}\"", truncate(text, 50))
        }
        EventKind::Thought { thought } => {
            format!("[think] {speaker}: \"{}\"", truncate(thought, 50))
        }
        EventKind::Vote { target_id, .. } => format!("[vote] {speaker} -> P{target_id}"),
        EventKind::Elimination {
            eliminated_id,
            eliminated_role,
            ..
        } => format!("[out] P{eliminated_id} eliminated ({eliminated_role})"),
        EventKind::DeathAnnouncement {
            victim_id, cause, ..
        } => match cause {
            DeathCause::WolfKill => format!("[dead] P{victim_id} killed"),
            DeathCause::VoteElimination => format!("[dead] P{victim_id} voted out"),
        },
        EventKind::DivineResult {
            target_id,
            is_werewolf,
        } => {
            let verdict = if *is_werewolf { "WOLF!" } else { "clear" };
            format!("[divine] {speaker} -> P{target_id}: {verdict}")
        }
        EventKind::GameStatus {
            alive_wolves,
            alive_villagers,
        } => format!("[status] Wolves: {alive_wolves}, Village: {alive_villagers}"),
        EventKind::Win { winner, .. } => {
            format!("[win] {} WINS!", winner.to_string().to_uppercase())
        }
        EventKind::Kill { victim_id, .. } => format!("[kill] Wolves target P{victim_id}"),
        EventKind::RunoffAnnouncement { candidates, .. } => {
            format!("[runoff] Vote tied! Runoff: {}", player_list(candidates))
        }
        EventKind::NoElimination { .. } => "[tie] Runoff tied, no elimination today".to_string(),
    }
}

fn describe(player: Option<&Player>, id: PlayerId) -> String {
    match player {
        Some(p) => format!("Player {} ({})", id, p.role),
        None => format!("Player {}", id),
    }
}

/// Full presentation of the event being stepped through
pub fn format_presented(event: &PhaseEvent, snapshot: Option<&GameSnapshot>) -> Vec<String> {
    let lookup = |id: PlayerId| snapshot.and_then(|s| s.player(id));
    let speaker = event.speaker_id.map(|id| describe(lookup(id), id));

    match &event.kind {
        EventKind::Message { text } => {
            let whisper = if event.channel == Some(Channel::Werewolf) {
                " (whisper to wolves)"
            } else {
                ""
            };
            vec![
                format!("{}{}:", speaker.unwrap_or_default(), whisper),
                format!("  \"{}\"", text),
            ]
        }
        EventKind::Thought { thought } => vec![
            format!("{} thinks (hidden from others):", speaker.unwrap_or_default()),
            format!("  {}", thought),
        ],
        EventKind::Vote {
            voter_id,
            target_id,
        } => vec![format!(
            "{} votes to eliminate {}",
            describe(lookup(*voter_id), *voter_id),
            describe(lookup(*target_id), *target_id)
        )],
        EventKind::DivineResult {
            target_id,
            is_werewolf,
        } => vec![
            format!(
                "Seer (P{}) investigates Player {}",
                event.speaker_id.map(|id| id.to_string()).unwrap_or_default(),
                target_id
            ),
            if *is_werewolf {
                "  WEREWOLF!".to_string()
            } else {
                "  NOT A WOLF".to_string()
            },
        ],
        EventKind::DeathAnnouncement {
            victim_id, cause, ..
        } => {
            let how = match cause {
                DeathCause::WolfKill => "was killed by the wolves!",
                DeathCause::VoteElimination => "was voted out!",
            };
            vec![
                format!("Player {} {}", victim_id, how),
                format!("  Role: {}", role_label(lookup(*victim_id).map(|p| p.role))),
            ]
        }
        EventKind::Elimination {
            eliminated_id,
            eliminated_role,
            ..
        } => vec![
            format!("Player {} was voted out!", eliminated_id),
            format!("  Role: {}", role_label(Some(*eliminated_role))),
        ],
        EventKind::Kill { victim_id, .. } => vec![format!(
            "Wolves have chosen their target: Player {}",
            victim_id
        )],
        EventKind::RunoffAnnouncement { candidates, .. } => vec![
            format!("Vote tied! Runoff: {}", player_list(candidates)),
            "  Only these candidates can be voted for".to_string(),
        ],
        EventKind::NoElimination { .. } => vec![
            "Runoff tied, no one is eliminated today!".to_string(),
            "  The village could not reach a consensus".to_string(),
        ],
        _ => vec![format_event(event)],
    }
}

fn role_label(role: Option<Role>) -> String {
    role.map_or_else(|| "UNKNOWN".to_string(), |r| r.as_str().to_uppercase())
}

/// Lines listing the events that involve one player
pub fn format_memory(snapshot: &GameSnapshot, id: PlayerId) -> Vec<String> {
    let role = snapshot
        .player(id)
        .map_or_else(|| "unknown".to_string(), |p| p.role.to_string());
    let mut lines = vec![format!("=== Memory of Player {} ({}) ===", id, role)];
    let events = snapshot.events_for_player(id);
    if events.is_empty() {
        lines.push("No events for this player yet.".to_string());
    } else {
        lines.extend(events.into_iter().map(format_event));
    }
    lines
}

/// What the terminal currently shows of the game
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub round: Option<u32>,
    pub phase: Option<Phase>,
    pub dead: BTreeSet<PlayerId>,
    pub winner: Option<Team>,
}

/// Changes between the shown view and a new snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderDelta {
    /// Header for a new night or day, e.g. "NIGHT 2"
    pub header: Option<String>,
    pub phase_changed: Option<(u32, Phase)>,
    pub deaths: Vec<PlayerId>,
    pub winner: Option<Team>,
}

impl RenderDelta {
    pub fn is_empty(&self) -> bool {
        self.header.is_none()
            && self.phase_changed.is_none()
            && self.deaths.is_empty()
            && self.winner.is_none()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the view from `snapshot` and return what changed
    pub fn apply_snapshot(&mut self, snapshot: &GameSnapshot) -> RenderDelta {
        let mut delta = RenderDelta::default();

        if self.phase != Some(snapshot.phase) || self.round != Some(snapshot.round) {
            let entering_night = snapshot.phase.is_night()
                && (self.round != Some(snapshot.round)
                    || !self.phase.is_some_and(|p| p.is_night()));
            if entering_night {
                delta.header = Some(format!("NIGHT {}", snapshot.round));
            } else if snapshot.phase == Phase::DayAnnounce {
                delta.header = Some(format!("DAY {}", snapshot.round));
            }
            delta.phase_changed = Some((snapshot.round, snapshot.phase));
            self.phase = Some(snapshot.phase);
            self.round = Some(snapshot.round);
        }

        for player in snapshot.players.iter().filter(|p| !p.alive) {
            if self.dead.insert(player.id) {
                delta.deaths.push(player.id);
            }
        }

        if snapshot.winner.is_some() && self.winner != snapshot.winner {
            delta.winner = snapshot.winner;
            self.winner = snapshot.winner;
        }

        delta
    }
}

/// Print a delta to the console
pub fn render_delta(delta: &RenderDelta) {
    if let Some(header) = &delta.header {
        println!();
        println!("{}", "=".repeat(60));
        println!("  {}", header);
        println!("{}", "=".repeat(60));
    }
    if let Some((round, phase)) = delta.phase_changed {
        println!("-- {} --", format_phase(round, phase));
    }
    if let Some(winner) = delta.winner {
        println!();
        println!("*** {} WINS! ***", winner.to_string().to_uppercase());
    }
}

/// Observer printing the playback to stdout
pub struct TerminalRenderer {
    view: ViewState,
    shown: Option<(PhaseEvent, Option<usize>)>,
    last_label: Option<String>,
    latest: SharedSnapshot,
}

impl TerminalRenderer {
    pub fn new(latest: SharedSnapshot) -> Self {
        Self {
            view: ViewState::new(),
            shown: None,
            last_label: None,
            latest,
        }
    }
}

impl PlaybackObserver for TerminalRenderer {
    fn on_change(&mut self, display: &DisplayState, snapshot: Option<&GameSnapshot>) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = snapshot.cloned();
        }

        match snapshot {
            Some(snapshot) => render_delta(&self.view.apply_snapshot(snapshot)),
            None => self.view = ViewState::new(),
        }

        let presented = display.event.clone().map(|e| (e, display.remaining));
        if presented.is_some() && presented != self.shown {
            if let Some((event, _)) = &presented {
                println!();
                for line in format_presented(event, snapshot) {
                    println!("{}", line);
                }
            }
        }
        self.shown = presented;

        let label = display.action_label();
        if display.mode != Mode::AutoPlaying && self.last_label.as_ref() != Some(&label) {
            println!("[{}]", label);
        }
        self.last_label = Some(label);
    }

    fn on_error(&mut self, error: &PlaybackError) {
        eprintln!("Error: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::scripted::initial_snapshot;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_format_phase() {
        assert_eq!(format_phase(2, Phase::DayVote), "Round 2: Day - Vote");
        assert_eq!(format_phase(0, Phase::Setup), "Setup");
    }

    #[test]
    fn test_format_event_lines() {
        let whisper = PhaseEvent::new(EventKind::Message {
            text: "take 3 tonight".to_string(),
        })
        .with_speaker(PlayerId(0))
        .with_channel(Channel::Werewolf);
        assert_eq!(format_event(&whisper), "[say] P0 (wolf): \"take 3 tonight\"");

        let runoff = PhaseEvent::new(EventKind::RunoffAnnouncement {
            candidates: vec![PlayerId(1), PlayerId(4)],
            vote_counts: Default::default(),
        });
        assert_eq!(format_event(&runoff), "[runoff] Vote tied! Runoff: P1 vs P4");

        let win = PhaseEvent::new(EventKind::Win {
            winner: Team::Wolf,
            remaining: vec![],
        });
        assert_eq!(format_event(&win), "[win] WOLF WINS!");
    }

    #[test]
    fn test_presented_death_shows_role_from_snapshot() {
        let snapshot = initial_snapshot(5, 1, 1);
        let death = PhaseEvent::new(EventKind::DeathAnnouncement {
            victim_id: PlayerId(0),
            victim_role: None,
            cause: DeathCause::WolfKill,
        });

        let lines = format_presented(&death, Some(&snapshot));

        assert_eq!(lines[0], "Player 0 was killed by the wolves!");
        assert_eq!(lines[1], "  Role: WEREWOLF");
    }

    #[test]
    fn test_view_state_reports_night_header_once() {
        let mut view = ViewState::new();
        let mut snapshot = initial_snapshot(5, 1, 1);
        snapshot.round = 1;
        snapshot.phase = Phase::NightWolfChat;

        let delta = view.apply_snapshot(&snapshot);
        assert_eq!(delta.header, Some("NIGHT 1".to_string()));

        snapshot.phase = Phase::NightWolfKill;
        let delta = view.apply_snapshot(&snapshot);
        assert_eq!(delta.header, None);
        assert_eq!(delta.phase_changed, Some((1, Phase::NightWolfKill)));

        snapshot.phase = Phase::DayAnnounce;
        let delta = view.apply_snapshot(&snapshot);
        assert_eq!(delta.header, Some("DAY 1".to_string()));
    }

    #[test]
    fn test_view_state_reports_each_death_once() {
        let mut view = ViewState::new();
        let mut snapshot = initial_snapshot(5, 1, 1);
        snapshot.players[3].alive = false;

        assert_eq!(view.apply_snapshot(&snapshot).deaths, vec![PlayerId(3)]);
        assert!(view.apply_snapshot(&snapshot).is_empty());
    }

    #[test]
    fn test_memory_lists_player_events() {
        let mut snapshot = initial_snapshot(5, 1, 1);
        snapshot.events.push(
            PhaseEvent::new(EventKind::Vote {
                voter_id: PlayerId(2),
                target_id: PlayerId(0),
            })
            .with_speaker(PlayerId(2)),
        );

        let lines = format_memory(&snapshot, PlayerId(0));
        assert_eq!(lines[0], "=== Memory of Player 0 (werewolf) ===");
        assert_eq!(lines[1], "[vote] P2 -> P0");

        let lines = format_memory(&snapshot, PlayerId(4));
        assert_eq!(lines[1], "No events for this player yet.");
    }
}
