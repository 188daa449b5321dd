//! Settlement detection for courses.
//!
//! Verification must not read a roster while registrations are still in
//! flight: a pending grant may yet be confirmed or rolled back. The watcher
//! polls the pending count down to zero once the course is full or closed,
//! and only then fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
pub use tokio_util::sync::CancellationToken;

use super::Course;

impl Course {
    /// Spawn a watcher that fires once this course settles.
    ///
    /// The watcher checks immediately, then re-checks every `poll` until the
    /// course is settled or `cancel` fires. On settlement the returned
    /// receiver resolves exactly once; on cancellation it never resolves,
    /// the caller only observes the sender side closing.
    pub fn settled_signal(
        self: &Arc<Self>,
        cancel: &CancellationToken,
        poll: Duration,
    ) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let course = Arc::clone(self);
        let cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    return;
                }
                if course.is_settled() {
                    // Receiver may already be gone; nothing to deliver then.
                    let _ = tx.send(());
                    return;
                }
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(poll) => {}
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enroll::CourseParams;
    use crate::student::{Student, UserAccount};

    const POLL: Duration = Duration::from_millis(10);

    fn student(code: &str) -> Arc<Student> {
        Student::new(UserAccount {
            code: code.to_string(),
            name: format!("student {code}"),
            raw_password: "pw".to_string(),
        })
    }

    #[tokio::test]
    async fn fires_after_full_course_drains() {
        let course = Course::new(CourseParams::sample("X"), 1);
        course.try_register(&student("s1"));

        let cancel = CancellationToken::new();
        let mut rx = course.settled_signal(&cancel, POLL);

        // Full but one registration still pending: must not fire.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        course.confirm_pending();

        tokio::time::timeout(Duration::from_millis(500), rx)
            .await
            .expect("watcher did not fire within the poll interval")
            .expect("watcher dropped without firing");
    }

    #[tokio::test]
    async fn fires_after_close_with_nothing_pending() {
        let course = Course::new(CourseParams::sample("X"), 10);
        let cancel = CancellationToken::new();
        let rx = course.settled_signal(&cancel, POLL);

        course.close();

        tokio::time::timeout(Duration::from_millis(500), rx)
            .await
            .expect("watcher did not fire after close")
            .expect("watcher dropped without firing");
    }

    #[tokio::test]
    async fn cancellation_ends_watcher_without_firing() {
        let course = Course::new(CourseParams::sample("X"), 10);
        let cancel = CancellationToken::new();
        let rx = course.settled_signal(&cancel, POLL);

        cancel.cancel();

        // The sender is dropped without sending, so the receiver errors.
        let result = tokio::time::timeout(Duration::from_millis(500), rx)
            .await
            .expect("watcher task did not exit after cancellation");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn settling_after_cancel_does_not_fire() {
        let course = Course::new(CourseParams::sample("X"), 10);
        let cancel = CancellationToken::new();
        let rx = course.settled_signal(&cancel, POLL);

        cancel.cancel();
        course.close();

        let result = tokio::time::timeout(Duration::from_millis(500), rx)
            .await
            .expect("watcher task did not exit after cancellation");
        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn two_seats_three_racers_then_settles() {
        // Capacity 2, three concurrent attempts: exactly two seats granted,
        // and once both resolve the watcher fires within a poll interval.
        let course = Course::new(CourseParams::sample("X"), 2);
        let barrier = Arc::new(tokio::sync::Barrier::new(3));

        let mut handles = Vec::new();
        for code in ["a", "b", "c"] {
            let course = Arc::clone(&course);
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                let s = student(code);
                barrier.wait().await;
                course.try_register(&s).registered
            }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }
        assert_eq!(granted, 2);

        let cancel = CancellationToken::new();
        let rx = course.settled_signal(&cancel, POLL);

        course.confirm_pending();
        course.confirm_pending();
        assert_eq!(course.pending_count(), 0);

        tokio::time::timeout(Duration::from_millis(500), rx)
            .await
            .expect("watcher did not fire after both registrations resolved")
            .expect("watcher dropped without firing");
    }
}
