//! Task repository: create, load, update, soft delete and search.

use tock_core::entities::Task;

use crate::error::DatabaseError;
use crate::helpers::{
    TASK_COLS, format_datetime, format_optional_datetime, like_pattern, row_to_task, store_now,
};
use crate::service::TockService;

/// How to identify a task when loading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRef<'a> {
    Id(i64),
    Synopsis(&'a str),
}

impl TaskRef<'_> {
    const fn is_empty(&self) -> bool {
        match self {
            Self::Id(id) => *id == 0,
            Self::Synopsis(synopsis) => synopsis.is_empty(),
        }
    }
}

fn deleted_filter(include_deleted: bool) -> &'static str {
    if include_deleted {
        ""
    } else {
        "AND deleted_at IS NULL"
    }
}

/// Load a task by id on `conn`, regardless of deletion state.
pub(crate) async fn find_task(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Task>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {TASK_COLS} FROM tasks WHERE id = ?1"), [id])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_task(&row)?)),
        None => Ok(None),
    }
}

async fn collect_tasks(mut rows: libsql::Rows) -> Result<Vec<Task>, DatabaseError> {
    let mut tasks = Vec::new();
    while let Some(row) = rows.next().await? {
        tasks.push(row_to_task(&row)?);
    }
    Ok(tasks)
}

impl TockService {
    /// Persist a new task and return it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// - `InvalidTaskState` if the task already has an id or its synopsis is blank
    /// - `UniqueViolation` if a live task already uses the synopsis
    pub async fn create_task(&self, task: &Task) -> Result<Task, DatabaseError> {
        if task.is_persisted() {
            return Err(DatabaseError::InvalidTaskState("already persisted".into()));
        }
        let synopsis = task
            .normalized_synopsis()
            .map_err(|e| DatabaseError::InvalidTaskState(e.to_string()))?;

        let now = store_now();
        let tx = self.write_tx().await?;
        let result: Result<i64, DatabaseError> = async {
            tx.execute(
                "INSERT INTO tasks (synopsis, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    synopsis,
                    task.description.as_str(),
                    format_datetime(now),
                    format_datetime(now)
                ],
            )
            .await
            .map_err(DatabaseError::from_write)?;
            Ok(tx.last_insert_rowid())
        }
        .await;
        let id = tx.finish(result).await?;

        tracing::debug!(id, synopsis, "created task");
        Ok(Task {
            id,
            synopsis: synopsis.to_string(),
            description: task.description.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Load a task by id or synopsis.
    ///
    /// With `include_deleted`, a synopsis lookup prefers the live task and
    /// otherwise returns the most recently deleted one.
    ///
    /// # Errors
    ///
    /// - `InvalidTaskState("no identifier")` for `Id(0)` or an empty synopsis
    /// - `NoResult` if no matching task exists
    pub async fn load_task(
        &self,
        task_ref: TaskRef<'_>,
        include_deleted: bool,
    ) -> Result<Task, DatabaseError> {
        if task_ref.is_empty() {
            return Err(DatabaseError::InvalidTaskState("no identifier".into()));
        }
        let filter = deleted_filter(include_deleted);

        let conn = self.read_conn().await;
        let mut rows = match task_ref {
            TaskRef::Id(id) => {
                conn.query(
                    &format!("SELECT {TASK_COLS} FROM tasks WHERE id = ?1 {filter}"),
                    [id],
                )
                .await?
            }
            TaskRef::Synopsis(synopsis) => {
                conn.query(
                    &format!(
                        "SELECT {TASK_COLS} FROM tasks WHERE synopsis = ?1 {filter}
                         ORDER BY deleted_at IS NOT NULL, deleted_at DESC LIMIT 1"
                    ),
                    [synopsis],
                )
                .await?
            }
        };
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_task(&row)
    }

    /// Overwrite a task's synopsis and description.
    ///
    /// A soft-deleted task can only be updated with `include_deleted`; in that
    /// mode the task's `deleted_at` is written as given, so passing `None`
    /// undeletes it.
    ///
    /// # Errors
    ///
    /// - `InvalidTaskState` if the task has no id, a blank synopsis, or is
    ///   deleted and `include_deleted` was not requested
    /// - `NoResult` if the task does not exist
    /// - `UniqueViolation` if the synopsis collides with another live task
    pub async fn update_task(&self, task: &Task, include_deleted: bool) -> Result<Task, DatabaseError> {
        if !task.is_persisted() {
            return Err(DatabaseError::InvalidTaskState("not persisted".into()));
        }
        let synopsis = task
            .normalized_synopsis()
            .map_err(|e| DatabaseError::InvalidTaskState(e.to_string()))?;

        let now = store_now();
        let tx = self.write_tx().await?;
        let result: Result<Task, DatabaseError> = async {
            let current = find_task(&tx, task.id)
                .await?
                .ok_or(DatabaseError::NoResult)?;
            if current.is_deleted() && !include_deleted {
                return Err(DatabaseError::InvalidTaskState(format!(
                    "task {} is deleted",
                    task.id
                )));
            }
            let deleted_at = if include_deleted {
                task.deleted_at
            } else {
                current.deleted_at
            };

            tx.execute(
                "UPDATE tasks SET synopsis = ?1, description = ?2, updated_at = ?3, deleted_at = ?4
                 WHERE id = ?5",
                libsql::params![
                    synopsis,
                    task.description.as_str(),
                    format_datetime(now),
                    format_optional_datetime(deleted_at),
                    task.id
                ],
            )
            .await
            .map_err(DatabaseError::from_write)?;

            Ok(Task {
                synopsis: synopsis.to_string(),
                description: task.description.clone(),
                updated_at: now,
                deleted_at,
                ..current
            })
        }
        .await;
        let updated = tx.finish(result).await?;

        tracing::debug!(id = updated.id, "updated task");
        Ok(updated)
    }

    /// Soft-delete a task. Its timesheets are left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidTaskState` if the task has no id or is already deleted
    /// - `NoResult` if the task does not exist
    pub async fn delete_task(&self, id: i64) -> Result<Task, DatabaseError> {
        if id == 0 {
            return Err(DatabaseError::InvalidTaskState("not persisted".into()));
        }

        let now = store_now();
        let tx = self.write_tx().await?;
        let result: Result<Task, DatabaseError> = async {
            let current = find_task(&tx, id).await?.ok_or(DatabaseError::NoResult)?;
            if current.is_deleted() {
                return Err(DatabaseError::InvalidTaskState(format!(
                    "task {id} is already deleted"
                )));
            }
            tx.execute(
                "UPDATE tasks SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
                libsql::params![format_datetime(now), id],
            )
            .await?;
            Ok(Task {
                updated_at: now,
                deleted_at: Some(now),
                ..current
            })
        }
        .await;
        let deleted = tx.finish(result).await?;

        tracing::debug!(id, "soft-deleted task");
        Ok(deleted)
    }

    /// Live tasks whose synopsis or description contains `text` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_tasks(&self, text: &str) -> Result<Vec<Task>, DatabaseError> {
        let conn = self.read_conn().await;
        let rows = conn
            .query(
                &format!(
                    "SELECT {TASK_COLS} FROM tasks
                     WHERE deleted_at IS NULL
                       AND (synopsis LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\')
                     ORDER BY synopsis"
                ),
                [like_pattern(text)],
            )
            .await?;
        collect_tasks(rows).await
    }

    /// Live tasks whose synopsis contains `text` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_tasks_by_synopsis(&self, text: &str) -> Result<Vec<Task>, DatabaseError> {
        let conn = self.read_conn().await;
        let rows = conn
            .query(
                &format!(
                    "SELECT {TASK_COLS} FROM tasks
                     WHERE deleted_at IS NULL AND synopsis LIKE ?1 ESCAPE '\\'
                     ORDER BY synopsis"
                ),
                [like_pattern(text)],
            )
            .await?;
        collect_tasks(rows).await
    }

    /// All tasks ordered by synopsis, optionally including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn load_all_tasks(&self, include_deleted: bool) -> Result<Vec<Task>, DatabaseError> {
        let filter = if include_deleted {
            ""
        } else {
            "WHERE deleted_at IS NULL"
        };
        let conn = self.read_conn().await;
        let rows = conn
            .query(
                &format!("SELECT {TASK_COLS} FROM tasks {filter} ORDER BY synopsis, id"),
                (),
            )
            .await?;
        collect_tasks(rows).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{create_test_task, test_service};

    #[tokio::test]
    async fn create_task_roundtrip() {
        let svc = test_service().await;

        let task = svc
            .create_task(&Task::new("Write report", "Quarterly numbers"))
            .await
            .unwrap();
        assert_eq!(task.id, 1);

        let by_id = svc.load_task(TaskRef::Id(task.id), false).await.unwrap();
        assert_eq!(by_id.synopsis, "Write report");
        assert_eq!(by_id.description, "Quarterly numbers");

        let by_synopsis = svc
            .load_task(TaskRef::Synopsis("Write report"), false)
            .await
            .unwrap();
        assert_eq!(by_synopsis, by_id);
    }

    #[tokio::test]
    async fn create_trims_synopsis() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "  Review PR  ").await;
        assert_eq!(task.synopsis, "Review PR");
    }

    #[tokio::test]
    async fn duplicate_synopsis_is_rejected() {
        let svc = test_service().await;
        create_test_task(&svc, "Write report").await;

        let result = svc.create_task(&Task::new("Write report", "again")).await;
        assert!(matches!(result, Err(DatabaseError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn create_refuses_persisted_task() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Once").await;

        let result = svc.create_task(&task).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTaskState(msg)) if msg == "already persisted"));
    }

    #[tokio::test]
    async fn create_refuses_blank_synopsis() {
        let svc = test_service().await;
        let result = svc.create_task(&Task::new("   ", "")).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTaskState(msg)) if msg == "empty synopsis"));
    }

    #[tokio::test]
    async fn load_requires_identifier() {
        let svc = test_service().await;
        for task_ref in [TaskRef::Id(0), TaskRef::Synopsis("")] {
            let result = svc.load_task(task_ref, true).await;
            assert!(matches!(result, Err(DatabaseError::InvalidTaskState(msg)) if msg == "no identifier"));
        }
    }

    #[tokio::test]
    async fn load_missing_task_is_no_result() {
        let svc = test_service().await;
        let result = svc.load_task(TaskRef::Id(42), true).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn deleted_task_hidden_unless_requested() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Old project").await;
        let deleted = svc.delete_task(task.id).await.unwrap();
        assert!(deleted.is_deleted());

        let hidden = svc.load_task(TaskRef::Id(task.id), false).await;
        assert!(matches!(hidden, Err(DatabaseError::NoResult)));

        let found = svc.load_task(TaskRef::Id(task.id), true).await.unwrap();
        assert!(found.deleted_at.is_some());
    }

    #[tokio::test]
    async fn synopsis_can_be_reused_after_delete() {
        let svc = test_service().await;
        let old = create_test_task(&svc, "Standup").await;
        svc.delete_task(old.id).await.unwrap();

        let new = create_test_task(&svc, "Standup").await;
        assert_ne!(new.id, old.id);

        let live = svc
            .load_task(TaskRef::Synopsis("Standup"), true)
            .await
            .unwrap();
        assert_eq!(live.id, new.id, "synopsis lookup should prefer the live task");
    }

    #[tokio::test]
    async fn update_task_changes_fields() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Draft").await;

        let updated = svc
            .update_task(
                &Task {
                    synopsis: "Final".into(),
                    description: "ready".into(),
                    ..task.clone()
                },
                false,
            )
            .await
            .unwrap();
        assert_eq!(updated.synopsis, "Final");
        assert_eq!(updated.created_at, task.created_at);

        let loaded = svc.load_task(TaskRef::Id(task.id), false).await.unwrap();
        assert_eq!(loaded.description, "ready");
    }

    #[tokio::test]
    async fn update_requires_id_and_synopsis() {
        let svc = test_service().await;
        let unsaved = svc.update_task(&Task::new("x", ""), false).await;
        assert!(matches!(unsaved, Err(DatabaseError::InvalidTaskState(_))));

        let task = create_test_task(&svc, "Keep").await;
        let blank = svc
            .update_task(
                &Task {
                    synopsis: String::new(),
                    ..task
                },
                false,
            )
            .await;
        assert!(matches!(blank, Err(DatabaseError::InvalidTaskState(msg)) if msg == "empty synopsis"));
    }

    #[tokio::test]
    async fn update_of_deleted_task_needs_include_deleted() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Archived").await;
        let deleted = svc.delete_task(task.id).await.unwrap();

        let refused = svc
            .update_task(
                &Task {
                    description: "edit".into(),
                    ..deleted.clone()
                },
                false,
            )
            .await;
        assert!(matches!(refused, Err(DatabaseError::InvalidTaskState(_))));

        // Editing with include_deleted keeps the deletion when deleted_at is kept.
        let edited = svc
            .update_task(
                &Task {
                    description: "edit".into(),
                    ..deleted.clone()
                },
                true,
            )
            .await
            .unwrap();
        assert!(edited.is_deleted());
    }

    #[tokio::test]
    async fn undelete_via_update() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Revived").await;
        let deleted = svc.delete_task(task.id).await.unwrap();

        let restored = svc
            .update_task(
                &Task {
                    deleted_at: None,
                    ..deleted
                },
                true,
            )
            .await
            .unwrap();
        assert!(!restored.is_deleted());
        assert!(svc.load_task(TaskRef::Id(task.id), false).await.is_ok());
    }

    #[tokio::test]
    async fn undelete_collides_with_live_synopsis() {
        let svc = test_service().await;
        let old = create_test_task(&svc, "Inbox").await;
        let deleted = svc.delete_task(old.id).await.unwrap();
        create_test_task(&svc, "Inbox").await;

        let result = svc
            .update_task(
                &Task {
                    deleted_at: None,
                    ..deleted
                },
                true,
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn delete_validates_target() {
        let svc = test_service().await;
        assert!(matches!(
            svc.delete_task(0).await,
            Err(DatabaseError::InvalidTaskState(_))
        ));
        assert!(matches!(
            svc.delete_task(9).await,
            Err(DatabaseError::NoResult)
        ));

        let task = create_test_task(&svc, "Twice").await;
        svc.delete_task(task.id).await.unwrap();
        assert!(matches!(
            svc.delete_task(task.id).await,
            Err(DatabaseError::InvalidTaskState(_))
        ));
    }

    #[tokio::test]
    async fn search_matches_synopsis_and_description() {
        let svc = test_service().await;
        svc.create_task(&Task::new("Write report", "")).await.unwrap();
        svc.create_task(&Task::new("Email", "send the REPORT to finance"))
            .await
            .unwrap();
        svc.create_task(&Task::new("Lunch", "")).await.unwrap();

        let any_field = svc.search_tasks("report").await.unwrap();
        let names: Vec<_> = any_field.iter().map(|t| t.synopsis.as_str()).collect();
        assert_eq!(names, vec!["Email", "Write report"]);

        let synopsis_only = svc.search_tasks_by_synopsis("report").await.unwrap();
        assert_eq!(synopsis_only.len(), 1);
        assert_eq!(synopsis_only[0].synopsis, "Write report");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let svc = test_service().await;
        create_test_task(&svc, "100% done").await;
        create_test_task(&svc, "1000 lines").await;

        let results = svc.search_tasks_by_synopsis("100%").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].synopsis, "100% done");
    }

    #[tokio::test]
    async fn search_skips_deleted_tasks() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Hidden report").await;
        svc.delete_task(task.id).await.unwrap();

        assert!(svc.search_tasks("report").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_all_tasks_respects_deleted_flag() {
        let svc = test_service().await;
        create_test_task(&svc, "A").await;
        let b = create_test_task(&svc, "B").await;
        svc.delete_task(b.id).await.unwrap();

        assert_eq!(svc.load_all_tasks(false).await.unwrap().len(), 1);
        assert_eq!(svc.load_all_tasks(true).await.unwrap().len(), 2);
    }
}
