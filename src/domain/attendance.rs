use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use super::error::DomainError;
use super::value_objects::{AttendanceId, AttendanceStatus, UserId};

/// A single work day record for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendance {
    pub id: AttendanceId,
    pub work_date: NaiveDate,
    pub clock_in: NaiveTime,
    pub clock_out: NaiveTime,
    pub rest_in: NaiveTime,
    pub rest_out: NaiveTime,
    pub user_id: UserId,
    pub status: AttendanceStatus,
    pub work_place: Option<String>,
    pub transportation_expenses: Option<i32>,
    pub remarks: Option<String>,
    pub delete_flag: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceChanges {
    pub work_date: Option<NaiveDate>,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub rest_in: Option<NaiveTime>,
    pub rest_out: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
    pub work_place: Option<String>,
    pub transportation_expenses: Option<i32>,
    pub remarks: Option<String>,
}

/// Checks `clock_in < rest_in < rest_out < clock_out`.
pub fn validate_clock_times(
    clock_in: NaiveTime,
    clock_out: NaiveTime,
    rest_in: NaiveTime,
    rest_out: NaiveTime,
) -> Result<(), DomainError> {
    if clock_in >= rest_in {
        return Err(DomainError::ClockInAfterRestIn);
    }
    if rest_in >= rest_out {
        return Err(DomainError::RestInAfterRestOut);
    }
    if rest_out >= clock_out {
        return Err(DomainError::RestOutAfterClockOut);
    }
    Ok(())
}

fn seconds(t: NaiveTime) -> i64 {
    i64::from(t.num_seconds_from_midnight())
}

fn to_hours(total_seconds: i64) -> f64 {
    (total_seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

impl Attendance {
    /// Hours worked excluding the rest period, rounded to two decimals.
    pub fn working_hours(&self) -> f64 {
        let work = seconds(self.clock_out) - seconds(self.clock_in);
        let rest = seconds(self.rest_out) - seconds(self.rest_in);
        to_hours(work - rest)
    }

    pub fn rest_hours(&self) -> f64 {
        to_hours(seconds(self.rest_out) - seconds(self.rest_in))
    }

    /// Applies `changes` over the current values; the result is validated
    /// against the clock-time ordering.
    pub fn update(&self, changes: AttendanceChanges, updated_by: &str) -> Result<Self, DomainError> {
        if changes.transportation_expenses.is_some_and(|v| v < 0) {
            return Err(DomainError::NegativeExpenses);
        }
        let updated = Self {
            work_date: changes.work_date.unwrap_or(self.work_date),
            clock_in: changes.clock_in.unwrap_or(self.clock_in),
            clock_out: changes.clock_out.unwrap_or(self.clock_out),
            rest_in: changes.rest_in.unwrap_or(self.rest_in),
            rest_out: changes.rest_out.unwrap_or(self.rest_out),
            status: changes.status.unwrap_or(self.status),
            work_place: changes.work_place.or_else(|| self.work_place.clone()),
            transportation_expenses: changes
                .transportation_expenses
                .or(self.transportation_expenses),
            remarks: changes.remarks.or_else(|| self.remarks.clone()),
            updated_at: Utc::now(),
            updated_by: if updated_by.is_empty() {
                self.updated_by.clone()
            } else {
                updated_by.to_string()
            },
            ..self.clone()
        };
        validate_clock_times(
            updated.clock_in,
            updated.clock_out,
            updated.rest_in,
            updated.rest_out,
        )?;
        Ok(updated)
    }

    pub fn deactivate(&self, updated_by: &str) -> Self {
        if self.delete_flag {
            return self.clone();
        }
        Self {
            delete_flag: true,
            updated_at: Utc::now(),
            updated_by: updated_by.to_string(),
            ..self.clone()
        }
    }
}
