//! Announcement payloads broadcast to registered students.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for an announcement.
///
/// UUID v4, generated on the bench side so an announcement can be matched
/// against server responses without a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(uuid::Uuid);

impl AnnouncementId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let uuid = uuid::Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }
}

impl Default for AnnouncementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable announcement delivered to every student registered in a course
/// at the instant of broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub course_id: String,
    pub course_name: String,
    pub title: String,
    pub message: String,
    /// Creation time, unix milliseconds.
    pub created_at: i64,
}

impl Announcement {
    pub fn new(
        course_id: impl Into<String>,
        course_name: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: AnnouncementId::new(),
            course_id: course_id.into(),
            course_name: course_name.into(),
            title: title.into(),
            message: message.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// A student's view of one announcement: the shared payload plus read state.
#[derive(Debug, Clone)]
pub struct AnnouncementStatus {
    pub announcement: Arc<Announcement>,
    pub unread: bool,
}
