//! Staff attendance model for commerce-service.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Daily attendance record for a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub attendance_id: Uuid,
    pub staff_id: Uuid,
    pub work_date: NaiveDate,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub created_utc: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn worked_hours(&self) -> f64 {
        worked_hours(self.clock_in, self.clock_out)
    }
}

/// Worked hours as a same-day time-of-day difference, rounded to two
/// decimals. Returns 0 when either bound is missing or when clock-out
/// precedes clock-in; overnight shifts are not supported.
pub fn worked_hours(clock_in: Option<NaiveTime>, clock_out: Option<NaiveTime>) -> f64 {
    match (clock_in, clock_out) {
        (Some(start), Some(end)) if end >= start => {
            let seconds = (end - start).num_seconds() as f64;
            (seconds / 3600.0 * 100.0).round() / 100.0
        }
        _ => 0.0,
    }
}

/// Filter parameters for listing attendance records.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub staff_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Input for creating an attendance record.
#[derive(Debug, Clone)]
pub struct CreateAttendance {
    pub staff_id: Uuid,
    pub work_date: Option<NaiveDate>,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn full_day_shift() {
        assert_eq!(worked_hours(Some(t(9, 0)), Some(t(17, 30))), 8.5);
    }

    #[test]
    fn partial_hour_rounds_to_two_decimals() {
        assert_eq!(worked_hours(Some(t(9, 0)), Some(t(9, 20))), 0.33);
    }

    #[test]
    fn missing_bounds_yield_zero() {
        assert_eq!(worked_hours(None, Some(t(17, 0))), 0.0);
        assert_eq!(worked_hours(Some(t(9, 0)), None), 0.0);
        assert_eq!(worked_hours(None, None), 0.0);
    }

    #[test]
    fn clock_out_before_clock_in_clamps_to_zero() {
        assert_eq!(worked_hours(Some(t(22, 0)), Some(t(6, 0))), 0.0);
    }
}
