//! Seed account loading from tab-separated fixture files.
//!
//! One account per line, `code \t name \t raw_password`. The file is read
//! once at startup; the rest of the system treats the result as an opaque
//! seed list.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::student::UserAccount;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read account file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed account record on line {line}")]
    Malformed { line: usize },
}

/// Load user accounts from a TSV fixture file.
pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<UserAccount>, DatasetError> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut accounts = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(code), Some(name), Some(raw_password)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(DatasetError::Malformed { line: idx + 1 });
        };
        accounts.push(UserAccount {
            code: code.to_string(),
            name: name.to_string(),
            raw_password: raw_password.to_string(),
        });
    }

    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_accounts_in_file_order() {
        let file = fixture("S01\tAlice\tpw-a\nS02\tBob\tpw-b\n");
        let accounts = load_accounts(file.path()).unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].code, "S01");
        assert_eq!(accounts[0].name, "Alice");
        assert_eq!(accounts[0].raw_password, "pw-a");
        assert_eq!(accounts[1].code, "S02");
    }

    #[test]
    fn skips_blank_lines() {
        let file = fixture("S01\tAlice\tpw-a\n\nS02\tBob\tpw-b\n");
        let accounts = load_accounts(file.path()).unwrap();
        assert_eq!(accounts.len(), 2);
    }

    #[test]
    fn short_record_reports_line_number() {
        let file = fixture("S01\tAlice\tpw-a\nS02\tBob\n");
        let err = load_accounts(file.path()).unwrap_err();
        match err {
            DatasetError::Malformed { line } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_accounts("/does/not/exist.tsv").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
