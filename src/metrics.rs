use chrono::{DateTime, Datelike, NaiveDate, Offset, TimeDelta, TimeZone, Utc};
use std::collections::BTreeSet;

use crate::models::session::{CodingSession, InterviewSession};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub total_interviews: usize,
    pub avg_duration_minutes: i64,
    pub distinct_interview_type_count: usize,
    pub interviews_this_calendar_month: usize,
    pub total_coding_sessions: usize,
}

impl DashboardMetrics {
    /// `now` fixes both the calendar month and the time zone it is measured in.
    pub fn compute<Tz: TimeZone>(
        interviews: &[InterviewSession],
        coding: &[CodingSession],
        now: &DateTime<Tz>,
    ) -> Self {
        let month_start = start_of_month(now);

        Self {
            total_interviews: interviews.len(),
            avg_duration_minutes: average_duration(interviews),
            distinct_interview_type_count: interviews
                .iter()
                .map(|s| s.interview_type)
                .collect::<BTreeSet<_>>()
                .len(),
            interviews_this_calendar_month: interviews
                .iter()
                .filter(|s| s.created_at >= month_start)
                .count(),
            total_coding_sessions: coding.len(),
        }
    }
}

fn average_duration(interviews: &[InterviewSession]) -> i64 {
    if interviews.is_empty() {
        return 0;
    }
    let n = interviews.len() as i64;
    let sum: i64 = interviews.iter().map(|s| i64::from(s.duration)).sum();
    (2 * sum + n).div_euclid(2 * n)
}

/// First instant of `now`'s month in `now`'s zone, as UTC.
fn start_of_month<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let local = now.naive_local();
    let first_day = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)
        .unwrap_or(local.date())
        .and_hms_opt(0, 0, 0)
        .unwrap_or(local);

    match now.timezone().from_local_datetime(&first_day).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight skipped by a DST jump; the month starts at the first valid instant
        None => {
            let offset = TimeDelta::seconds(i64::from(now.offset().fix().local_minus_utc()));
            Utc.from_utc_datetime(&(first_day - offset))
        }
    }
}
