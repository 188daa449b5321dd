//! Course admission control.
//!
//! A course is a capacity-bounded resource that concurrently running student
//! tasks race to occupy. All registration state lives behind a single
//! read-write lock so the seat-count check and the roster mutation form one
//! critical section; no two racing attempts can both take the last seat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::announcement::Announcement;
use crate::student::Student;

/// Immutable course metadata, fixed when the seed data is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseParams {
    pub code: String,
    pub name: String,
    pub description: String,
    pub credit: u8,
    pub teacher: String,
    pub period: u8,
    pub day_of_week: u8,
    pub keywords: String,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOutcome {
    /// The student took a seat and now counts as pending.
    pub registered: bool,
    /// Seats remained after this attempt resolved.
    pub has_vacancy: bool,
}

struct Roster {
    students: Vec<Arc<Student>>,
    /// Registrations granted but not yet confirmed or rolled back. Signed so
    /// caller misuse shows up as a negative count instead of a wrap.
    pending: i64,
    registrable: bool,
}

/// A course with a fixed seat limit.
pub struct Course {
    params: CourseParams,
    capacity: usize,
    /// Server-assigned identifier, installed once after course creation.
    id: OnceLock<String>,
    roster: RwLock<Roster>,
    close_scheduled: AtomicBool,
}

impl Course {
    pub fn new(params: CourseParams, capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            params,
            capacity,
            id: OnceLock::new(),
            roster: RwLock::new(Roster {
                students: Vec::new(),
                pending: 0,
                registrable: true,
            }),
            close_scheduled: AtomicBool::new(false),
        })
    }

    /// Attempt to register a student.
    ///
    /// The only rejection condition is the seat count. A course that has
    /// been closed but still has seats left accepts the attempt: closing
    /// feeds the settlement condition, it does not gate admission, and the
    /// server under test applies its own cutoff. This asymmetry is inherited
    /// behavior, kept deliberately.
    ///
    /// On success the student is appended to the roster and the pending
    /// count rises by one; the registration stays pending until
    /// [`Course::confirm_pending`] or [`Course::remove_student`] resolves it.
    pub fn try_register(&self, student: &Arc<Student>) -> RegisterOutcome {
        let mut roster = self.roster.write().unwrap();

        if roster.students.len() >= self.capacity {
            return RegisterOutcome {
                registered: false,
                has_vacancy: false,
            };
        }

        roster.students.push(Arc::clone(student));
        roster.pending += 1;

        RegisterOutcome {
            registered: true,
            has_vacancy: roster.students.len() < self.capacity,
        }
    }

    /// Roll back a previously granted registration.
    ///
    /// Removes every roster occurrence of the student (by identity, not
    /// position) and decrements the pending count unconditionally. Callers
    /// must only roll back students granted by [`Course::try_register`].
    pub fn remove_student(&self, student: &Arc<Student>) {
        let mut roster = self.roster.write().unwrap();
        roster.students.retain(|s| !Arc::ptr_eq(s, student));
        roster.pending -= 1;
        if roster.pending < 0 {
            tracing::warn!(
                course = %self.params.code,
                pending = roster.pending,
                "pending registration count went negative"
            );
        }
    }

    /// Resolve one pending registration as confirmed, keeping the seat.
    pub fn confirm_pending(&self) {
        let mut roster = self.roster.write().unwrap();
        roster.pending -= 1;
        if roster.pending < 0 {
            tracing::warn!(
                course = %self.params.code,
                pending = roster.pending,
                "pending registration count went negative"
            );
        }
    }

    /// Permanently stop counting this course as open. Idempotent.
    pub fn close(&self) {
        self.roster.write().unwrap().registrable = false;
    }

    /// Close this course after `delay`, at most once per course.
    ///
    /// The guard is a single atomic swap, so concurrent callers race safely:
    /// exactly one timer task is spawned and later calls are no-ops. The
    /// pending close cannot be cancelled.
    pub fn schedule_close(self: &Arc<Self>, delay: Duration) {
        if self.close_scheduled.swap(true, Ordering::AcqRel) {
            return;
        }
        let course = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            course.close();
            tracing::debug!(course = %course.params.code, "registration window closed");
        });
    }

    /// Snapshot of the current roster.
    ///
    /// The copy is detached; the roster may keep changing while the caller
    /// holds it. Read the roster only after settlement when exactness
    /// matters.
    pub fn students(&self) -> Vec<Arc<Student>> {
        self.roster.read().unwrap().students.clone()
    }

    /// Deliver an announcement to every student registered right now.
    ///
    /// Holds the exclusive lock for the whole delivery so the recipient set
    /// cannot change mid-broadcast; a student registered after this call
    /// returns never sees the message.
    pub fn broadcast(&self, announcement: &Arc<Announcement>) {
        let roster = self.roster.write().unwrap();
        for student in roster.students.iter() {
            student.add_announcement(announcement);
        }
    }

    /// A course is settled once it can no longer change in ways the
    /// verifier cares about: full or closed, with no registrations pending.
    pub fn is_settled(&self) -> bool {
        let roster = self.roster.read().unwrap();
        (roster.students.len() >= self.capacity || !roster.registrable) && roster.pending < 1
    }

    pub fn is_registrable(&self) -> bool {
        self.roster.read().unwrap().registrable
    }

    pub fn pending_count(&self) -> i64 {
        self.roster.read().unwrap().pending
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn params(&self) -> &CourseParams {
        &self.params
    }

    pub fn code(&self) -> &str {
        &self.params.code
    }

    pub fn name(&self) -> &str {
        &self.params.name
    }

    /// Install the server-assigned identifier. Returns false if one was
    /// already set.
    pub fn set_id(&self, id: String) -> bool {
        self.id.set(id).is_ok()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.get().map(String::as_str)
    }
}

impl std::fmt::Debug for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let roster = self.roster.read().unwrap();
        f.debug_struct("Course")
            .field("code", &self.params.code)
            .field("capacity", &self.capacity)
            .field("registered", &roster.students.len())
            .field("pending", &roster.pending)
            .field("registrable", &roster.registrable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl CourseParams {
    pub(crate) fn sample(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: format!("course {code}"),
            description: "sample course".to_string(),
            credit: 2,
            teacher: "T. Teacher".to_string(),
            period: 1,
            day_of_week: 2,
            keywords: "sample".to_string(),
        }
    }
}
