//! Post-settlement verification of server observations against the model.
//!
//! Callers decode server responses into the observation types and hand them
//! over once the course has settled; comparison itself never does I/O.
//! Verification failures are normal data, collected rather than raised, so
//! one response can report every mismatch it contains.

use std::collections::HashSet;

use serde::Deserialize;

use crate::announcement::AnnouncementId;
use crate::enroll::Course;
use crate::student::Student;

/// Server-reported roster for one course.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservedRoster {
    pub course_id: String,
    pub student_codes: Vec<String>,
}

/// Server-reported announcement entry.
///
/// The list endpoint omits the message body, so it is optional here and
/// only compared when present.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservedAnnouncement {
    pub id: AnnouncementId,
    pub course_id: String,
    pub course_name: String,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub unread: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyFailure {
    #[error("course {course}: observed roster has {actual} students, capacity is {capacity}")]
    CapacityExceeded {
        course: String,
        capacity: usize,
        actual: usize,
    },
    #[error("course {course}: expected {expected} registered students, observed {actual}")]
    RosterSizeMismatch {
        course: String,
        expected: usize,
        actual: usize,
    },
    #[error("course {course}: student {code} missing from observed roster")]
    StudentMissing { course: String, code: String },
    #[error("course {course}: unexpected student {code} in observed roster")]
    StudentUnexpected { course: String, code: String },
    #[error("announcement {id}: {field} does not match the expected value")]
    AnnouncementMismatch {
        id: AnnouncementId,
        field: &'static str,
    },
    #[error("announcements are not sorted by creation time, newest first")]
    AnnouncementOrder,
}

/// Compare a settled course roster against the server's view.
///
/// Size is checked first; membership comparison is skipped on a size
/// mismatch since it would only produce noise.
pub fn verify_roster(course: &Course, observed: &ObservedRoster) -> Vec<VerifyFailure> {
    let mut failures = Vec::new();
    let expected = course.students();
    let label = course.code().to_string();

    if observed.student_codes.len() > course.capacity() {
        failures.push(VerifyFailure::CapacityExceeded {
            course: label.clone(),
            capacity: course.capacity(),
            actual: observed.student_codes.len(),
        });
    }

    if expected.len() != observed.student_codes.len() {
        failures.push(VerifyFailure::RosterSizeMismatch {
            course: label,
            expected: expected.len(),
            actual: observed.student_codes.len(),
        });
        return failures;
    }

    let observed_set: HashSet<&str> = observed.student_codes.iter().map(String::as_str).collect();
    for student in &expected {
        if !observed_set.contains(student.code()) {
            failures.push(VerifyFailure::StudentMissing {
                course: label.clone(),
                code: student.code().to_string(),
            });
        }
    }

    let expected_set: HashSet<&str> = expected.iter().map(|s| s.code()).collect();
    for code in &observed.student_codes {
        if !expected_set.contains(code.as_str()) {
            failures.push(VerifyFailure::StudentUnexpected {
                course: label.clone(),
                code: code.clone(),
            });
        }
    }

    failures
}

/// Compare an announcement listing against a student's inbox.
///
/// Entries the model does not know yet are skipped: while the run is in
/// flight the server can legitimately know announcements the bench has not
/// recorded. Ordering must be newest first.
pub fn verify_announcements(
    student: &Student,
    observed: &[ObservedAnnouncement],
) -> Vec<VerifyFailure> {
    let mut failures = Vec::new();

    for entry in observed {
        let Some(status) = student.announcement(entry.id) else {
            continue;
        };
        let expected = &status.announcement;

        if entry.course_id != expected.course_id {
            failures.push(mismatch(entry.id, "course_id"));
        }
        if entry.course_name != expected.course_name {
            failures.push(mismatch(entry.id, "course_name"));
        }
        if entry.title != expected.title {
            failures.push(mismatch(entry.id, "title"));
        }
        if let Some(message) = &entry.message
            && *message != expected.message
        {
            failures.push(mismatch(entry.id, "message"));
        }
        if entry.unread != status.unread {
            failures.push(mismatch(entry.id, "unread"));
        }
        if entry.created_at != expected.created_at {
            failures.push(mismatch(entry.id, "created_at"));
        }
    }

    for window in observed.windows(2) {
        if window[0].created_at < window[1].created_at {
            failures.push(VerifyFailure::AnnouncementOrder);
            break;
        }
    }

    failures
}

fn mismatch(id: AnnouncementId, field: &'static str) -> VerifyFailure {
    VerifyFailure::AnnouncementMismatch { id, field }
}
