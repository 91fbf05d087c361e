use std::path::{Path, PathBuf};

use clansort_plugin::MemberRow;
use clansort_shared::{ChatMessage, ClanRank, SortSettings};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// A scripted session: the initial member list and what happens on which tick.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub members: Vec<MemberRow>,
    #[serde(default = "default_true")]
    pub clan_settings_loaded: bool,
    /// Starting preferences when no settings file is configured.
    #[serde(default)]
    pub settings: SortSettings,
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptedEvent {
    pub at_tick: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Chat(ChatMessage),
    /// Pick a menu action on the sort button.
    Select { op: i32 },
    /// Left click on the sort button.
    Click,
    Join { member: MemberRow },
    Leave { name: String },
    Promote { name: String, rank: ClanRank },
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let mut scenario: Self = serde_json::from_str(json)?;
        scenario.events.sort_by_key(|event| event.at_tick);
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn last_event_tick(&self) -> u64 {
        self.events.last().map_or(0, |event| event.at_tick)
    }

    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &Action> {
        self.events
            .iter()
            .filter(move |event| event.at_tick == tick)
            .map(|event| &event.action)
    }
}
