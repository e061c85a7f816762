use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::cli::root_commands::ReportArgs;
use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output_list;

/// Days covered when `--from` is omitted, including `--to`.
const DEFAULT_SPAN_DAYS: u64 = 7;

/// Handle `tock report`.
pub async fn handle(args: &ReportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (start, end) = report_range(args.from, args.to, Utc::now().date_naive())?;
    let rows = ctx
        .service
        .task_report(start, end, args.include_deleted)
        .await?;
    output_list(&rows, flags.format)
}

/// Turn inclusive UTC days into the half-open instant range the store expects.
fn report_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> anyhow::Result<(DateTime<Utc>, DateTime<Utc>)> {
    let to = to.unwrap_or(today);
    let from = match from {
        Some(from) => from,
        None => to
            .checked_sub_days(Days::new(DEFAULT_SPAN_DAYS - 1))
            .ok_or_else(|| anyhow::anyhow!("--to {to} is out of range"))?,
    };
    if from > to {
        anyhow::bail!("--from {from} is after --to {to}");
    }
    let end = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| anyhow::anyhow!("--to {to} is out of range"))?;

    Ok((
        from.and_time(chrono::NaiveTime::MIN).and_utc(),
        end.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}
