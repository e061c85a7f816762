use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A named unit of work that time is tracked against.
///
/// `id` is `0` until the store persists the task. A soft-deleted task keeps
/// its row and has `deleted_at` set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub synopsis: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build an unpersisted task.
    #[must_use]
    pub fn new(synopsis: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            synopsis: synopsis.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id != 0
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The synopsis as stored: surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptySynopsis` if nothing but whitespace is left.
    pub fn normalized_synopsis(&self) -> Result<&str, CoreError> {
        let synopsis = self.synopsis.trim();
        if synopsis.is_empty() {
            return Err(CoreError::EmptySynopsis);
        }
        Ok(synopsis)
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::errors::CoreError;

    #[test]
    fn synopsis_is_trimmed() {
        let task = Task::new("  Write report \n", "");
        assert_eq!(task.normalized_synopsis(), Ok("Write report"));
    }

    #[test]
    fn blank_synopsis_is_rejected() {
        let task = Task::new(" \t ", "");
        assert_eq!(task.normalized_synopsis(), Err(CoreError::EmptySynopsis));
    }
}
