//! Game snapshot as reported by the backend

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::PhaseEvent;

/// Seat number of a player, unique within a game
///
/// Decodes from an integer or a numeric string, since JSON object keys
/// (vote tallies) always arrive as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

struct PlayerIdVisitor;

impl Visitor<'_> for PlayerIdVisitor {
    type Value = PlayerId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a player id as an integer or numeric string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<PlayerId, E> {
        u32::try_from(value)
            .map(PlayerId)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<PlayerId, E> {
        u32::try_from(value)
            .map(PlayerId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<PlayerId, E> {
        value
            .trim()
            .parse()
            .map(PlayerId)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PlayerIdVisitor)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Seer,
    Villager,
}

impl Role {
    pub fn team(self) -> Team {
        match self {
            Role::Werewolf => Team::Wolf,
            Role::Seer | Role::Villager => Team::Village,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Werewolf => "werewolf",
            Role::Seer => "seer",
            Role::Villager => "villager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Wolf,
    Village,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Wolf => f.write_str("wolf"),
            Team::Village => f.write_str("village"),
        }
    }
}

/// Segment of the turn structure, in play order after `Setup`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    NightWolfChat,
    NightWolfKill,
    NightSeer,
    DayAnnounce,
    DayDiscuss,
    DayVote,
}

impl Phase {
    /// Human readable phase name
    pub fn display_name(self) -> &'static str {
        match self {
            Phase::Setup => "Setup",
            Phase::NightWolfChat => "Night - Wolf Chat",
            Phase::NightWolfKill => "Night - Wolf Kill",
            Phase::NightSeer => "Night - Seer",
            Phase::DayAnnounce => "Day - Announcement",
            Phase::DayDiscuss => "Day - Discussion",
            Phase::DayVote => "Day - Vote",
        }
    }

    pub fn is_night(self) -> bool {
        matches!(
            self,
            Phase::NightWolfChat | Phase::NightWolfKill | Phase::NightSeer
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub role: Role,
    pub alive: bool,
    #[serde(default)]
    pub team: Option<Team>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            alive: true,
            team: Some(role.team()),
        }
    }

    /// Team, falling back to the role's team when the backend omits it
    pub fn team(&self) -> Team {
        self.team.unwrap_or_else(|| self.role.team())
    }
}

/// Full game state, replaced wholesale on every successful fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(default)]
    pub game_id: String,
    pub round: u32,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub alive_wolves: u32,
    pub alive_villagers: u32,
    #[serde(default)]
    pub winner: Option<Team>,
    /// Append-only log of every event so far
    #[serde(default)]
    pub events: Vec<PhaseEvent>,
}

impl GameSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn werewolf_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.role == Role::Werewolf)
            .count()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Events a player spoke in or was the subject of
    pub fn events_for_player(&self, id: PlayerId) -> Vec<&PhaseEvent> {
        self.events.iter().filter(|e| e.involves(id)).collect()
    }
}
