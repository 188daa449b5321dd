//! Student model: account identity, optimistic course memberships, and the
//! announcement inbox.

use std::sync::{Arc, Mutex, RwLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::announcement::{Announcement, AnnouncementId, AnnouncementStatus};
use crate::enroll::Course;

/// Seed identity loaded from the account fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub code: String,
    pub name: String,
    pub raw_password: String,
}

/// A simulated student.
///
/// Memberships are the student's own optimistic view of which courses it
/// occupies; only the task driving this student mutates them, while courses
/// keep the authoritative roster. The inbox is written by course broadcasts
/// from other tasks, so it carries its own lock.
pub struct Student {
    account: UserAccount,
    registered: RwLock<Vec<Arc<Course>>>,
    inbox: Mutex<Vec<AnnouncementStatus>>,
}

impl Student {
    pub fn new(account: UserAccount) -> Arc<Self> {
        Arc::new(Self {
            account,
            registered: RwLock::new(Vec::new()),
            inbox: Mutex::new(Vec::new()),
        })
    }

    pub fn code(&self) -> &str {
        &self.account.code
    }

    pub fn name(&self) -> &str {
        &self.account.name
    }

    pub fn account(&self) -> &UserAccount {
        &self.account
    }

    /// Record an optimistically granted membership.
    pub fn add_course(&self, course: &Arc<Course>) {
        self.registered.write().unwrap().push(Arc::clone(course));
    }

    /// Drop a membership that turned out not to hold server-side.
    pub fn forget_course(&self, course: &Arc<Course>) {
        self.registered
            .write()
            .unwrap()
            .retain(|c| !Arc::ptr_eq(c, course));
    }

    pub fn courses(&self) -> Vec<Arc<Course>> {
        self.registered.read().unwrap().clone()
    }

    /// Deliver an announcement to this student's inbox, unread.
    pub fn add_announcement(&self, announcement: &Arc<Announcement>) {
        self.inbox.lock().unwrap().push(AnnouncementStatus {
            announcement: Arc::clone(announcement),
            unread: true,
        });
    }

    /// Mark an announcement read. Returns false if the inbox has no entry
    /// with that id.
    pub fn read_announcement(&self, id: AnnouncementId) -> bool {
        let mut inbox = self.inbox.lock().unwrap();
        match inbox.iter_mut().find(|s| s.announcement.id == id) {
            Some(status) => {
                status.unread = false;
                true
            }
            None => false,
        }
    }

    pub fn announcement(&self, id: AnnouncementId) -> Option<AnnouncementStatus> {
        self.inbox
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.announcement.id == id)
            .cloned()
    }

    pub fn announcements(&self) -> Vec<AnnouncementStatus> {
        self.inbox.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Student")
            .field("code", &self.account.code)
            .field("name", &self.account.name)
            .finish_non_exhaustive()
    }
}

/// Registry of all simulated students, keyed by account code.
pub struct StudentRegistry {
    students: DashMap<String, Arc<Student>>,
}

impl StudentRegistry {
    pub fn from_accounts(accounts: Vec<UserAccount>) -> Self {
        let students = DashMap::with_capacity(accounts.len());
        for account in accounts {
            let code = account.code.clone();
            students.insert(code, Student::new(account));
        }
        Self { students }
    }

    pub fn get(&self, code: &str) -> Option<Arc<Student>> {
        self.students.get(code).map(|s| Arc::clone(&s))
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn students(&self) -> Vec<Arc<Student>> {
        self.students.iter().map(|s| Arc::clone(&s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enroll::CourseParams;

    fn account(code: &str) -> UserAccount {
        UserAccount {
            code: code.to_string(),
            name: format!("student {code}"),
            raw_password: "hunter2".to_string(),
        }
    }

    fn course(code: &str) -> Arc<Course> {
        Course::new(CourseParams::sample(code), 10)
    }

    #[test]
    fn membership_add_and_forget() {
        let student = Student::new(account("s1"));
        let a = course("A");
        let b = course("B");

        student.add_course(&a);
        student.add_course(&b);
        assert_eq!(student.courses().len(), 2);

        student.forget_course(&a);
        let remaining = student.courses();
        assert_eq!(remaining.len(), 1);
        assert!(Arc::ptr_eq(&remaining[0], &b));
    }

    #[test]
    fn forget_unknown_course_is_noop() {
        let student = Student::new(account("s1"));
        let a = course("A");
        student.forget_course(&a);
        assert!(student.courses().is_empty());
    }

    #[test]
    fn inbox_starts_unread_and_marks_read() {
        let student = Student::new(account("s1"));
        let a = Arc::new(Announcement::new("c1", "Algorithms", "Exam", "room 204"));

        student.add_announcement(&a);
        let status = student.announcement(a.id).unwrap();
        assert!(status.unread);

        assert!(student.read_announcement(a.id));
        let status = student.announcement(a.id).unwrap();
        assert!(!status.unread);
    }

    #[test]
    fn read_unknown_announcement_returns_false() {
        let student = Student::new(account("s1"));
        assert!(!student.read_announcement(AnnouncementId::new()));
    }

    #[test]
    fn registry_lookup_by_code() {
        let registry =
            StudentRegistry::from_accounts(vec![account("s1"), account("s2"), account("s3")]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("s2").unwrap().code(), "s2");
        assert!(registry.get("s9").is_none());
    }
}
