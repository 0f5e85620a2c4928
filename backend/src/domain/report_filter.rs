//! Status and date filtering over fetched report listings.
//!
//! Date presets are computed in the school's UTC offset so "today" matches
//! the wall clock in the classroom, not the server's.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::domain::{ReportStatus, ReportSummary};

/// Status part of a listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReportStatus),
}

impl StatusFilter {
    pub fn matches(self, status: ReportStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }

    /// The single status selected, if any.
    pub fn status(self) -> Option<ReportStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

/// Returned for query values that name neither a preset nor a status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised filter value: {0}")]
pub struct UnknownFilterValue(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" | "semua" => Ok(Self::All),
            _ => s
                .to_ascii_uppercase()
                .parse::<ReportStatus>()
                .map(Self::Only)
                .map_err(|_| UnknownFilterValue(s.to_owned())),
        }
    }
}

/// Named date ranges offered by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePreset {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    #[default]
    All,
}

impl FromStr for DatePreset {
    type Err = UnknownFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hari" | "today" => Ok(Self::Today),
            "minggu" | "week" => Ok(Self::ThisWeek),
            "bulan" | "month" => Ok(Self::ThisMonth),
            "tahun" | "year" => Ok(Self::ThisYear),
            "" | "semua" | "all" => Ok(Self::All),
            other => Err(UnknownFilterValue(other.to_owned())),
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Today => "hari",
            Self::ThisWeek => "minggu",
            Self::ThisMonth => "bulan",
            Self::ThisYear => "tahun",
            Self::All => "semua",
        };
        f.write_str(name)
    }
}

/// Inclusive time window; an absent start means "since forever".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| start <= instant) && instant <= self.end
    }
}

fn local_midnight_utc(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN);
    (local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// Window from local midnight of `first` up to the last millisecond before
/// local midnight of `next`.
fn whole_days(first: NaiveDate, next: NaiveDate, offset: FixedOffset) -> DateRange {
    DateRange {
        start: Some(local_midnight_utc(first, offset)),
        end: local_midnight_utc(next, offset) - TimeDelta::milliseconds(1),
    }
}

impl DatePreset {
    /// Resolve the preset against `now` in the school's offset.
    ///
    /// Weeks run Monday to Sunday. [`DatePreset::All`] has no start and ends
    /// at `now`.
    pub fn range(self, now: DateTime<Utc>, offset: FixedOffset) -> DateRange {
        let today = now.with_timezone(&offset).date_naive();
        let after = |date: NaiveDate, days: u64| {
            date.checked_add_days(Days::new(days))
                .unwrap_or(NaiveDate::MAX)
        };
        let before = |date: NaiveDate, days: u32| {
            date.checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN)
        };
        match self {
            Self::Today => whole_days(today, after(today, 1), offset),
            Self::ThisWeek => {
                let monday = before(today, today.weekday().num_days_from_monday());
                whole_days(monday, after(monday, 7), offset)
            }
            Self::ThisMonth => {
                let first = before(today, today.day0());
                let next = first
                    .checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX);
                whole_days(first, next, offset)
            }
            Self::ThisYear => {
                let first = before(today, today.ordinal0());
                let next = first
                    .checked_add_months(Months::new(12))
                    .unwrap_or(NaiveDate::MAX);
                whole_days(first, next, offset)
            }
            Self::All => DateRange {
                start: None,
                end: now,
            },
        }
    }
}

/// Full listing filter: status plus an optional window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub status: StatusFilter,
    pub range: Option<DateRange>,
}

impl ReportFilter {
    pub fn matches(&self, report: &ReportSummary) -> bool {
        self.status.matches(report.status)
            && self
                .range
                .is_none_or(|range| range.contains(report.submitted_at))
    }
}

/// Keep the rows matching `filter`, preserving their order.
pub fn filter_reports(reports: Vec<ReportSummary>, filter: &ReportFilter) -> Vec<ReportSummary> {
    reports
        .into_iter()
        .filter(|report| filter.matches(report))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, ProfileId, ReportId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).expect("valid offset")
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn summary(status: ReportStatus, submitted_at: &str) -> ReportSummary {
        ReportSummary {
            id: ReportId::random(),
            owner_id: ProfileId::random(),
            owner_name: DisplayName::new("Siti Rahmawati").expect("name"),
            owner_class: None,
            submitted_at: at(submitted_at),
            status,
        }
    }

    #[fixture]
    fn listing() -> Vec<ReportSummary> {
        vec![
            summary(ReportStatus::Diterima, "2024-03-15T09:00:00+07:00"),
            summary(ReportStatus::Diproses, "2024-03-14T09:00:00+07:00"),
            summary(ReportStatus::Diterima, "2024-03-10T09:00:00+07:00"),
            summary(ReportStatus::Ditolak, "2024-02-01T09:00:00+07:00"),
            summary(ReportStatus::Diterima, "2023-12-31T23:00:00+07:00"),
        ]
    }

    #[rstest]
    fn today_spans_local_calendar_day() {
        let now = at("2024-03-15T10:30:00+07:00");
        let range = DatePreset::Today.range(now, wib());
        assert_eq!(range.start, Some(at("2024-03-15T00:00:00+07:00")));
        assert_eq!(range.end, at("2024-03-15T23:59:59.999+07:00"));
    }

    #[rstest]
    fn today_uses_school_offset_not_utc_date() {
        // 18:00 UTC on the 14th is already the 15th in UTC+7.
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 18, 0, 0).single().expect("valid");
        let range = DatePreset::Today.range(now, wib());
        assert_eq!(range.start, Some(at("2024-03-15T00:00:00+07:00")));
    }

    #[rstest]
    #[case("2024-03-13T12:00:00+07:00")]
    #[case("2024-03-11T00:00:00+07:00")]
    #[case("2024-03-17T23:59:00+07:00")]
    fn week_runs_monday_to_sunday(#[case] now: &str) {
        let range = DatePreset::ThisWeek.range(at(now), wib());
        assert_eq!(range.start, Some(at("2024-03-11T00:00:00+07:00")));
        assert_eq!(range.end, at("2024-03-17T23:59:59.999+07:00"));
    }

    #[rstest]
    fn month_and_year_cover_whole_calendar_units() {
        let now = at("2024-02-10T08:00:00+07:00");
        let month = DatePreset::ThisMonth.range(now, wib());
        assert_eq!(month.start, Some(at("2024-02-01T00:00:00+07:00")));
        assert_eq!(month.end, at("2024-02-29T23:59:59.999+07:00"));

        let year = DatePreset::ThisYear.range(now, wib());
        assert_eq!(year.start, Some(at("2024-01-01T00:00:00+07:00")));
        assert_eq!(year.end, at("2024-12-31T23:59:59.999+07:00"));
    }

    #[rstest]
    fn all_has_no_lower_bound() {
        let now = at("2024-03-15T10:30:00+07:00");
        let range = DatePreset::All.range(now, wib());
        assert_eq!(range.start, None);
        assert_eq!(range.end, now);
    }

    #[rstest]
    fn bounds_are_inclusive() {
        let range = DatePreset::Today.range(at("2024-03-15T10:30:00+07:00"), wib());
        assert!(range.contains(at("2024-03-15T00:00:00+07:00")));
        assert!(range.contains(at("2024-03-15T23:59:59.999+07:00")));
        assert!(!range.contains(at("2024-03-16T00:00:00+07:00")));
        assert!(!range.contains(at("2024-03-14T23:59:59.999+07:00")));
    }

    #[rstest]
    fn status_filter_preserves_order(listing: Vec<ReportSummary>) {
        let expected: Vec<_> = listing
            .iter()
            .filter(|report| report.status == ReportStatus::Diterima)
            .map(|report| report.id)
            .collect();
        let filter = ReportFilter {
            status: StatusFilter::Only(ReportStatus::Diterima),
            range: None,
        };
        let kept: Vec<_> = filter_reports(listing, &filter)
            .into_iter()
            .map(|report| report.id)
            .collect();
        assert_eq!(kept.len(), 3);
        assert_eq!(kept, expected);
    }

    #[rstest]
    fn status_and_range_combine(listing: Vec<ReportSummary>) {
        let filter = ReportFilter {
            status: StatusFilter::Only(ReportStatus::Diterima),
            range: Some(DatePreset::ThisWeek.range(at("2024-03-15T10:30:00+07:00"), wib())),
        };
        let kept = filter_reports(listing, &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].submitted_at, at("2024-03-15T09:00:00+07:00"));
    }

    #[rstest]
    fn all_filter_keeps_everything(listing: Vec<ReportSummary>) {
        let ids: Vec<_> = listing.iter().map(|report| report.id).collect();
        let kept: Vec<_> = filter_reports(listing, &ReportFilter::default())
            .into_iter()
            .map(|report| report.id)
            .collect();
        assert_eq!(kept, ids);
    }

    #[rstest]
    #[case("semua", StatusFilter::All)]
    #[case("", StatusFilter::All)]
    #[case("DITOLAK", StatusFilter::Only(ReportStatus::Ditolak))]
    #[case("diterima", StatusFilter::Only(ReportStatus::Diterima))]
    fn status_filter_parses_query_values(#[case] input: &str, #[case] expected: StatusFilter) {
        assert_eq!(input.parse::<StatusFilter>(), Ok(expected));
    }

    #[rstest]
    #[case("hari", DatePreset::Today)]
    #[case("week", DatePreset::ThisWeek)]
    #[case("bulan", DatePreset::ThisMonth)]
    #[case("tahun", DatePreset::ThisYear)]
    #[case("semua", DatePreset::All)]
    fn date_preset_parses_both_spellings(#[case] input: &str, #[case] expected: DatePreset) {
        assert_eq!(input.parse::<DatePreset>(), Ok(expected));
    }

    #[rstest]
    fn date_preset_rejects_unknown_values() {
        assert!("kemarin".parse::<DatePreset>().is_err());
    }
}
