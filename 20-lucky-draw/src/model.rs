//! Data model shared by every part of the draw: participants, prize tiers and
//! the persisted session snapshot.
//!
//! The serialized field names (`participants`, `awards`, `currentAwardIndex`)
//! are the on-disk layout, so they are pinned with serde attributes rather
//! than following Rust naming.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a participant. Imported employee codes are text, rows
/// without a code fall back to their 1-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantId::Number(n) => write!(f, "{n}"),
            ParticipantId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        ParticipantId::Text(value.to_string())
    }
}

impl From<i64> for ParticipantId {
    fn from(value: i64) -> Self {
        ParticipantId::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            center: None,
            position: None,
        }
    }
}

/// A prize tier with a winner quota.
///
/// `winners` is append-only while drawing and never grows past `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub id: String,
    pub title: String,
    pub count: u32,
    #[serde(default)]
    pub winners: Vec<Participant>,
}

impl Award {
    pub fn is_complete(&self) -> bool {
        self.winners.len() >= self.count as usize
    }

    pub fn remaining(&self) -> usize {
        (self.count as usize).saturating_sub(self.winners.len())
    }

    pub fn config(&self) -> AwardConfig {
        AwardConfig {
            id: self.id.clone(),
            title: self.title.clone(),
            count: self.count,
        }
    }
}

/// The editable part of an award, as submitted by the configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardConfig {
    pub id: String,
    pub title: String,
    pub count: u32,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub awards: Vec<Award>,
    #[serde(default)]
    pub current_award_index: usize,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty() && self.awards.is_empty()
    }

    /// Setup is required until both a roster and at least one award exist.
    pub fn needs_setup(&self) -> bool {
        self.participants.is_empty() || self.awards.is_empty()
    }

    pub fn current_award(&self) -> Option<&Award> {
        self.awards.get(self.current_award_index)
    }
}
