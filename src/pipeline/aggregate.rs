use crate::model::{
    attendance::AttendanceRecord,
    stats::{ReportRow, Stats},
};

/// Status filter value that disables status filtering.
pub const ALL_STATUSES: &str = "all";

pub fn compute_stats<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Stats {
    let mut stats = Stats::default();
    for record in records {
        stats.total_staff += 1;
        if record.is_present() {
            stats.present_today += 1;
        }
        if record.is_late() {
            stats.late_today += 1;
        }
        if record.left_early() {
            stats.early_punch_out += 1;
        }
    }
    stats.absent_today = stats.total_staff - stats.present_today;
    stats
}

/// Search and status criteria, normalized once per request.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    search: Option<String>,
    status: Option<String>,
    names_only: bool,
}

impl RecordFilter {
    pub fn new(search: Option<&str>, status: Option<&str>) -> Self {
        let search = search
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());
        let status = status
            .filter(|s| !s.eq_ignore_ascii_case(ALL_STATUSES))
            .map(|s| s.to_lowercase());
        Self {
            search,
            status,
            names_only: false,
        }
    }

    /// Search on staff names only, as the staff report does.
    pub fn by_name(search: Option<&str>) -> Self {
        Self {
            names_only: true,
            ..Self::new(search, None)
        }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(needle) = &self.search {
            let by_code = !self.names_only && record.ecode.to_lowercase().contains(needle);
            if !record.name.to_lowercase().contains(needle) && !by_code {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if record.status.to_lowercase() != *status {
                return false;
            }
        }
        true
    }
}

/// Order-preserving view over `records`; clone it to walk it again.
pub fn filter_records<'a>(
    records: &'a [AttendanceRecord],
    filter: &'a RecordFilter,
) -> impl Iterator<Item = &'a AttendanceRecord> + Clone + 'a {
    records.iter().filter(move |r| filter.matches(r))
}

/// 1-indexed page slice, clipped to `items`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Present / Absent / Late breakdown, in sync with the dashboard counters.
pub fn daily_report(stats: &Stats) -> Vec<ReportRow> {
    let percentage = |count: usize| {
        if stats.total_staff == 0 {
            0.0
        } else {
            (count as f64 / stats.total_staff as f64 * 1000.0).round() / 10.0
        }
    };

    [
        ("Present", stats.present_today),
        ("Absent", stats.absent_today),
        ("Late", stats.late_today),
    ]
    .into_iter()
    .map(|(category, count)| ReportRow {
        category,
        count,
        percentage: percentage(count),
    })
    .collect()
}
