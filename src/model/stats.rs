use serde::Serialize;
use utoipa::ToSchema;

/// Dashboard counters over a record snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Stats {
    #[schema(example = 120)]
    pub total_staff: usize,
    #[schema(example = 101)]
    pub present_today: usize,
    /// Everything that is not exactly "Present".
    #[schema(example = 19)]
    pub absent_today: usize,
    #[schema(example = 7)]
    pub late_today: usize,
    #[schema(example = 3)]
    pub early_punch_out: usize,
}

impl Stats {
    /// Present share in whole percent, 0 for an empty snapshot.
    pub fn attendance_rate(&self) -> u32 {
        if self.total_staff == 0 {
            return 0;
        }
        (self.present_today as f64 / self.total_staff as f64 * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportRow {
    #[schema(example = "Present")]
    pub category: &'static str,
    #[schema(example = 101)]
    pub count: usize,
    /// One decimal place.
    #[schema(example = 84.2)]
    pub percentage: f64,
}
