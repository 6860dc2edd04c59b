//! Commit-date arrangement.
//!
//! Redistributes commit dates over a working-day timeline: commits keep
//! their order, and each one is placed at an offset proportional to the
//! cumulative size (numstat additions + deletions) of the commits before it.
//! Application is delegated to `git filter-repo --commit-callback` with a
//! JSON schedule file; filter-branch has no equivalent, so arrange requires
//! the plugin.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use gitauth_git::{GitOps, Repository};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::rewrite::restore_remotes;

/// Timezone for scheduled dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// System local timezone.
    Local,
    /// Fixed UTC offset (UTC itself is `+00:00`).
    Fixed(FixedOffset),
    /// IANA timezone, e.g. `Asia/Karachi`.
    Named(Tz),
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return FixedOffset::east_opt(0)
                .map(Self::Fixed)
                .ok_or_else(|| Error::UnknownTimezone(s.to_string()));
        }
        if let Some(offset) = parse_offset(trimmed) {
            return Ok(Self::Fixed(offset));
        }
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| Error::UnknownTimezone(s.to_string()))
    }
}

/// Parse `+HH:MM`, `-HH:MM`, or `+HHMM` into a fixed offset.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parse a `HH:MM` time of day.
///
/// # Errors
/// Returns [`Error::InvalidTime`] for anything else.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| Error::InvalidTime(s.to_string()))
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [`Error::InvalidDate`] for anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Timeline parameters for a schedule.
#[derive(Debug, Clone)]
pub struct ArrangeParams {
    /// First calendar day of the timeline.
    pub start_date: NaiveDate,
    /// Last calendar day of the timeline (inclusive).
    pub end_date: NaiveDate,
    /// Daily window start.
    pub start_time: NaiveTime,
    /// Daily window end.
    pub end_time: NaiveTime,
    /// Timezone the new dates are expressed in.
    pub zone: Zone,
    /// Whether Saturdays and Sundays are excluded.
    pub skip_weekends: bool,
}

/// One commit's new place on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledCommit {
    /// Full commit hash.
    pub hash: String,
    /// New date, RFC 3339 with offset.
    pub when: String,
}

/// Sum of additions and deletions in `git show --numstat` output.
/// Binary files report `-` and count as zero; every commit weighs at least 1.
fn commit_weight(numstat: &str) -> u64 {
    let mut size: u64 = 0;
    for line in numstat.lines() {
        let mut parts = line.split_whitespace();
        if let (Some(add), Some(del)) = (parts.next(), parts.next()) {
            size += add.parse::<u64>().unwrap_or(0);
            size += del.parse::<u64>().unwrap_or(0);
        }
    }
    size.max(1)
}

/// Resolve a naive datetime in the configured zone. Datetimes falling into a
/// DST gap resolve to the earliest valid instant.
fn localize(naive: chrono::NaiveDateTime, zone: Zone) -> DateTime<FixedOffset> {
    match zone {
        Zone::Fixed(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .unwrap_or_else(|| naive.and_utc().fixed_offset()),
        Zone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| naive.and_utc().fixed_offset(), |dt| dt.fixed_offset()),
        Zone::Named(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| naive.and_utc().fixed_offset(), |dt| dt.fixed_offset()),
    }
}

/// Calculate new dates for `hashes` (newest first, as `git log` yields them).
///
/// Placements are returned oldest first, run strictly inside the daily
/// window, and never leave the date range: a cumulative weight overflowing
/// the last day clamps to that day's final second.
///
/// # Errors
/// Returns an error for an empty range, an inverted daily window, a date
/// range without valid days, or a failing `git show`.
pub fn calculate_schedule(
    git: &impl GitOps,
    hashes: &[String],
    params: &ArrangeParams,
) -> Result<Vec<ScheduledCommit>> {
    if hashes.is_empty() {
        return Err(Error::EmptyRange);
    }

    let day_duration = (params.end_time - params.start_time).num_seconds();
    if day_duration <= 0 {
        return Err(Error::InvalidTimeWindow);
    }

    let mut valid_days = Vec::new();
    let mut day = params.start_date;
    while day <= params.end_date {
        let is_weekend = day.weekday().number_from_monday() >= 6;
        if !(params.skip_weekends && is_weekend) {
            valid_days.push(day);
        }
        day += Duration::days(1);
    }
    if valid_days.is_empty() {
        return Err(Error::NoValidDays);
    }

    let mut weights = Vec::with_capacity(hashes.len());
    let mut total_weight: u64 = 0;
    // Oldest first: git log yields newest first.
    for hash in hashes.iter().rev() {
        let weight = commit_weight(&git.show_numstat(hash)?);
        weights.push((hash, weight));
        total_weight += weight;
    }

    #[allow(clippy::cast_precision_loss)]
    let total_duration = valid_days.len() as f64 * day_duration as f64;

    let mut schedule = Vec::with_capacity(weights.len());
    let mut cumulative: u64 = 0;
    for (hash, weight) in weights {
        #[allow(clippy::cast_precision_loss)]
        let target = cumulative as f64 / total_weight as f64 * total_duration;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut day_idx = (target / day_duration as f64) as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut seconds_into_day = (target % day_duration as f64) as i64;
        if day_idx >= valid_days.len() {
            day_idx = valid_days.len() - 1;
            seconds_into_day = day_duration - 1;
        }

        let time = params.start_time + Duration::seconds(seconds_into_day);
        let when = localize(valid_days[day_idx].and_time(time), params.zone);

        schedule.push(ScheduledCommit {
            hash: hash.clone(),
            when: when.to_rfc3339(),
        });
        cumulative += weight;
    }

    Ok(schedule)
}

/// Write the schedule as a JSON object (hash → date) for the callback.
///
/// # Errors
/// Returns an error if the temp file cannot be written.
pub fn write_schedule_temp(schedule: &[ScheduledCommit]) -> Result<NamedTempFile> {
    let map: BTreeMap<&str, &str> = schedule
        .iter()
        .map(|s| (s.hash.as_str(), s.when.as_str()))
        .collect();

    let mut file = tempfile::Builder::new()
        .prefix("gitauth-schedule-")
        .suffix(".json")
        .tempfile()?;
    file.write_all(serde_json::to_string(&map)?.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// filter-repo commit callback that reads the schedule file and rewrites
/// author and committer dates.
#[must_use]
pub fn commit_callback(schedule_path: &Path) -> String {
    format!(
        "\
import json
import datetime
try:
    with open(r'{path}', 'r') as f:
        schedule = json.load(f)
except Exception:
    schedule = {{}}

commit_hash = commit.original_id.decode('utf-8')
if commit_hash in schedule:
    dt = datetime.datetime.fromisoformat(schedule[commit_hash])
    timestamp = int(dt.timestamp())
    offset = dt.strftime('%z')
    date_bytes = f\"{{timestamp}} {{offset}}\".encode('ascii')
    commit.author_date = date_bytes
    commit.committer_date = date_bytes
",
        path = schedule_path.display()
    )
}

/// Apply a schedule with `git filter-repo`, preserving remotes.
///
/// # Errors
/// Returns [`Error::FilterRepoMissing`] when the plugin is not installed, or
/// an error if filter-repo exits non-zero.
pub fn apply_schedule(repo: &Repository, schedule: &[ScheduledCommit]) -> Result<()> {
    if !repo.filter_repo_available() {
        return Err(Error::FilterRepoMissing);
    }

    let saved = repo.remotes()?;
    let file = write_schedule_temp(schedule)?;
    let args = vec![
        "--force".to_string(),
        "--commit-callback".to_string(),
        commit_callback(file.path()),
    ];
    let result = repo.filter_repo(&args);
    restore_remotes(repo, &saved);
    result?;
    Ok(())
}
