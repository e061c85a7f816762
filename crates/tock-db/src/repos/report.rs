//! Date-range aggregation over closed timesheets.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use tock_core::entities::ReportRow;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime};
use crate::service::TockService;

impl TockService {
    /// Time per UTC day and task for closed timesheets starting in `[start, end)`.
    ///
    /// Rows are ordered by day, then task id. Timesheets of soft-deleted tasks
    /// are only counted with `include_deleted`.
    ///
    /// # Errors
    ///
    /// - `InvalidTimesheetState` if `end` is before `start`
    /// - `DatabaseError` if the query fails
    pub async fn task_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_deleted: bool,
    ) -> Result<Vec<ReportRow>, DatabaseError> {
        if end < start {
            return Err(DatabaseError::InvalidTimesheetState(
                "report range ends before it starts".into(),
            ));
        }
        let filter = if include_deleted {
            ""
        } else {
            "AND t.deleted_at IS NULL"
        };

        let conn = self.read_conn().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT ts.task_id, t.synopsis, ts.start_time, ts.stop_time
                     FROM timesheets ts JOIN tasks t ON t.id = ts.task_id
                     WHERE ts.stop_time IS NOT NULL
                       AND ts.start_time >= ?1 AND ts.start_time < ?2 {filter}
                     ORDER BY ts.start_time"
                ),
                libsql::params![format_datetime(start), format_datetime(end)],
            )
            .await?;

        let mut grouped: BTreeMap<(chrono::NaiveDate, i64), ReportRow> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let task_id: i64 = row.get(0)?;
            let synopsis: String = row.get(1)?;
            let started = parse_datetime(&row.get::<String>(2)?)?;
            let stopped = parse_datetime(&row.get::<String>(3)?)?;
            let day = started.date_naive();

            let entry = grouped.entry((day, task_id)).or_insert_with(|| ReportRow {
                day,
                task_id,
                synopsis,
                timesheets: 0,
                duration_secs: 0,
            });
            entry.timesheets += 1;
            entry.duration_secs += (stopped - started).num_seconds();
        }

        Ok(grouped.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use tock_core::entities::Timesheet;

    use super::*;
    use crate::test_support::helpers::{create_test_task, test_service};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    async fn log(svc: &TockService, task_id: i64, start: DateTime<Utc>, stop: DateTime<Utc>) {
        svc.create_timesheet(&Timesheet::closed(task_id, start, stop))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn groups_by_day_and_task() {
        let svc = test_service().await;
        let a = create_test_task(&svc, "A").await;
        let b = create_test_task(&svc, "B").await;

        log(&svc, a.id, at(2, 9, 0), at(2, 10, 0)).await;
        log(&svc, a.id, at(2, 11, 0), at(2, 11, 30)).await;
        log(&svc, b.id, at(2, 13, 0), at(2, 13, 15)).await;
        log(&svc, a.id, at(3, 9, 0), at(3, 9, 45)).await;

        let report = svc.task_report(at(1, 0, 0), at(4, 0, 0), false).await.unwrap();
        let summary: Vec<(NaiveDate, &str, u32, i64)> = report
            .iter()
            .map(|r| (r.day, r.synopsis.as_str(), r.timesheets, r.duration_secs))
            .collect();
        assert_eq!(
            summary,
            vec![
                (date(2), "A", 2, 5400),
                (date(2), "B", 1, 900),
                (date(3), "A", 1, 2700),
            ]
        );
    }

    #[tokio::test]
    async fn range_is_half_open_and_skips_running() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "A").await;

        log(&svc, task.id, at(2, 8, 0), at(2, 9, 0)).await;
        log(&svc, task.id, at(3, 0, 0), at(3, 1, 0)).await;
        svc.switch_task(task.id).await.unwrap();

        let report = svc.task_report(at(2, 0, 0), at(3, 0, 0), false).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].day, date(2));
        assert_eq!(report[0].duration_secs, 3600);
    }

    #[tokio::test]
    async fn deleted_tasks_only_on_request() {
        let svc = test_service().await;
        let task = create_test_task(&svc, "Gone").await;
        log(&svc, task.id, at(2, 9, 0), at(2, 10, 0)).await;
        svc.delete_task(task.id).await.unwrap();

        let live = svc.task_report(at(1, 0, 0), at(4, 0, 0), false).await.unwrap();
        assert!(live.is_empty());

        let all = svc.task_report(at(1, 0, 0), at(4, 0, 0), true).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].synopsis, "Gone");
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let svc = test_service().await;
        let result = svc.task_report(at(4, 0, 0), at(1, 0, 0), false).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTimesheetState(_))));
    }
}
