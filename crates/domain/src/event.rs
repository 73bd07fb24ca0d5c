//! Event — an immutable notification that an automation changed.
//!
//! Events are produced by the application layer after a mutation has been
//! persisted and handed to every configured publisher.

use serde::{Deserialize, Serialize};

use crate::automation::Automation;
use crate::id::EventId;
use crate::time::{Timestamp, now};

/// Kind of change an [`Event`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    Updated,
    Deleted,
}

impl EventType {
    /// Stable lowercase name, used for topics and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// A change notification carrying the affected automation.
///
/// For [`EventType::Deleted`] the automation is the snapshot taken before
/// deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub automation: Automation,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, automation: Automation) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            automation,
            timestamp: now(),
        }
    }
}
