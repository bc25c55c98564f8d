//! Audit trail entries kept on tournaments and matches.

use crate::models::person::{Person, PersonId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Something that happened, optionally attributed to whoever did it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub time: DateTime<Utc>,
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub items: BTreeMap<String, serde_json::Value>,
    /// Acting person; None for system-triggered events.
    #[serde(default)]
    pub person: Option<PersonId>,
}

impl Event {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            kind: kind.into(),
            message: message.into(),
            items: BTreeMap::new(),
            person: None,
        }
    }

    /// Attach a named value referenced by the message template.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.items.insert(key.to_string(), value);
        self
    }

    pub fn by(mut self, actor: Option<&Person>) -> Self {
        self.person = actor.map(|p| p.id.clone());
        self
    }
}
