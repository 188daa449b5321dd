//! Scenario steps gluing the local model to the HTTP action layer.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::enroll::Course;
use crate::student::Student;

/// Outcome of one registration submission.
#[derive(Debug)]
pub struct RegistrationReport {
    /// Courses the local model granted a seat in.
    pub granted: Vec<Arc<Course>>,
    /// Courses that had no seat left locally.
    pub rejected: Vec<Arc<Course>>,
    /// Whether the server confirmed the submission. When false, every
    /// granted course has been rolled back.
    pub server_confirmed: bool,
}

/// Run one optimistic registration round for a student.
///
/// Seats are taken in the local model first, then the submission goes to
/// the server. A confirmed submission resolves each pending registration;
/// a rejected one rolls the whole submission back so the local model keeps
/// matching what the server actually did. Transport failures also roll
/// back, then propagate, so pending counts always drain.
pub async fn register_courses(
    api: &ApiClient,
    student: &Arc<Student>,
    candidates: &[Arc<Course>],
) -> Result<RegistrationReport, ApiError> {
    let mut granted = Vec::new();
    let mut rejected = Vec::new();

    for course in candidates {
        let outcome = course.try_register(student);
        if outcome.registered {
            student.add_course(course);
            granted.push(Arc::clone(course));
        } else {
            rejected.push(Arc::clone(course));
        }
    }

    if granted.is_empty() {
        return Ok(RegistrationReport {
            granted,
            rejected,
            server_confirmed: false,
        });
    }

    let ids: Vec<String> = granted
        .iter()
        .filter_map(|c| c.id().map(str::to_string))
        .collect();

    match api.register_courses(&ids).await {
        Ok(()) => {
            for course in &granted {
                course.confirm_pending();
            }
            Ok(RegistrationReport {
                granted,
                rejected,
                server_confirmed: true,
            })
        }
        Err(ApiError::UnexpectedStatus { actual, .. }) => {
            tracing::warn!(
                student = %student.code(),
                status = actual,
                "server rejected registration, rolling back"
            );
            roll_back(student, &granted);
            Ok(RegistrationReport {
                granted,
                rejected,
                server_confirmed: false,
            })
        }
        Err(err) => {
            roll_back(student, &granted);
            Err(err)
        }
    }
}

fn roll_back(student: &Arc<Student>, granted: &[Arc<Course>]) {
    for course in granted {
        course.remove_student(student);
        student.forget_course(course);
    }
}
