//! enrollbench: load-generation client for capacity-limited course
//! enrollment systems.
//!
//! The model half tracks expected state (courses, students, announcements)
//! while many concurrent tasks race registrations; the action half talks to
//! the server under test; the verify half compares the two once courses
//! settle.

mod announcement;
mod config;
mod student;

pub mod api;
pub mod dataset;
pub mod enroll;
pub mod scenario;
pub mod verify;

pub use announcement::{Announcement, AnnouncementId, AnnouncementStatus};
pub use config::LoadConfig;
pub use student::{Student, StudentRegistry, UserAccount};

pub use api::{AnnouncementPage, ApiClient, ApiError};
pub use dataset::{DatasetError, load_accounts};
pub use enroll::{CancellationToken, Course, CourseParams, RegisterOutcome};
pub use scenario::{RegistrationReport, register_courses};
pub use verify::{
    ObservedAnnouncement, ObservedRoster, VerifyFailure, verify_announcements, verify_roster,
};
