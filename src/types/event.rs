//! Phase events delivered by the backend
//!
//! Every event carries one payload shape per kind. The kind is decided once
//! while decoding and is never re-derived from which fields happen to be present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::snapshot::{Phase, PlayerId, Role, Team};

/// Visibility channel an event was emitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Public,
    Werewolf,
    ModeratorOnly,
    SeerPrivate,
}

/// How a player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    WolfKill,
    VoteElimination,
}

/// Kind-specific payload of a phase event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EventKind {
    PhaseChange {
        new_phase: Phase,
    },
    Message {
        text: String,
    },
    Thought {
        thought: String,
    },
    Vote {
        voter_id: PlayerId,
        target_id: PlayerId,
    },
    DeathAnnouncement {
        victim_id: PlayerId,
        #[serde(default)]
        victim_role: Option<Role>,
        cause: DeathCause,
    },
    Elimination {
        eliminated_id: PlayerId,
        eliminated_role: Role,
        #[serde(default)]
        vote_counts: BTreeMap<PlayerId, u32>,
    },
    DivineResult {
        target_id: PlayerId,
        is_werewolf: bool,
    },
    Kill {
        victim_id: PlayerId,
        /// voter -> chosen victim
        #[serde(default)]
        votes: BTreeMap<PlayerId, PlayerId>,
    },
    RunoffAnnouncement {
        candidates: Vec<PlayerId>,
        #[serde(default)]
        vote_counts: BTreeMap<PlayerId, u32>,
    },
    NoElimination {
        #[serde(default)]
        candidates: Vec<PlayerId>,
    },
    GameStatus {
        alive_wolves: u32,
        alive_villagers: u32,
    },
    Win {
        winner: Team,
        #[serde(default)]
        remaining: Vec<PlayerId>,
    },
}

impl EventKind {
    /// Wire name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::PhaseChange { .. } => "phase_change",
            EventKind::Message { .. } => "message",
            EventKind::Thought { .. } => "thought",
            EventKind::Vote { .. } => "vote",
            EventKind::DeathAnnouncement { .. } => "death_announcement",
            EventKind::Elimination { .. } => "elimination",
            EventKind::DivineResult { .. } => "divine_result",
            EventKind::Kill { .. } => "kill",
            EventKind::RunoffAnnouncement { .. } => "runoff_announcement",
            EventKind::NoElimination { .. } => "no_elimination",
            EventKind::GameStatus { .. } => "game_status",
            EventKind::Win { .. } => "win",
        }
    }

    /// Whether this kind is presented one at a time while stepping.
    ///
    /// Phase changes, status summaries and the win marker only appear in the
    /// snapshot's log.
    pub fn is_displayable(&self) -> bool {
        !matches!(
            self,
            EventKind::PhaseChange { .. } | EventKind::GameStatus { .. } | EventKind::Win { .. }
        )
    }

    /// Players this event is about (victim, target, eliminated player)
    pub fn subjects(&self) -> Vec<PlayerId> {
        match self {
            EventKind::Vote { target_id, .. } | EventKind::DivineResult { target_id, .. } => {
                vec![*target_id]
            }
            EventKind::DeathAnnouncement { victim_id, .. } | EventKind::Kill { victim_id, .. } => {
                vec![*victim_id]
            }
            EventKind::Elimination { eliminated_id, .. } => vec![*eliminated_id],
            _ => Vec::new(),
        }
    }
}

/// One atomic occurrence within a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEvent {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub speaker_id: Option<PlayerId>,
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl PhaseEvent {
    /// Build an event with no metadata besides its kind
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: 0,
            round: 0,
            phase: None,
            speaker_id: None,
            channel: None,
            kind,
        }
    }

    pub fn with_speaker(mut self, speaker_id: PlayerId) -> Self {
        self.speaker_id = Some(speaker_id);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_displayable(&self) -> bool {
        self.kind.is_displayable()
    }

    /// Whether the player spoke, or was the subject of, this event
    pub fn involves(&self, player: PlayerId) -> bool {
        self.speaker_id == Some(player) || self.kind.subjects().contains(&player)
    }
}
