//! Capacity-bounded course admission control.
//!
//! The rules concurrent callers rely on:
//! - seat check and roster append are one critical section, so a full
//!   course never over-admits
//! - a granted registration is pending until confirmed or rolled back
//! - closing is permanent and feeds settlement, it does not gate admission

mod course;
mod settle;

pub use course::{Course, CourseParams, RegisterOutcome};
pub use settle::CancellationToken;
