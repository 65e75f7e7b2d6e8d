use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Attendance, AttendanceChanges, AttendanceStatus};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceCreateDto {
    #[schema(example = "2024-04-01", value_type = String, format = "date")]
    pub work_date: NaiveDate,
    #[schema(example = "09:00:00", value_type = String)]
    pub clock_in: NaiveTime,
    #[schema(example = "18:00:00", value_type = String)]
    pub clock_out: NaiveTime,
    #[schema(example = "12:00:00", value_type = String)]
    pub rest_in: NaiveTime,
    #[schema(example = "13:00:00", value_type = String)]
    pub rest_out: NaiveTime,
    pub user_id: String,
    #[serde(default)]
    pub status: AttendanceStatus,
    pub work_place: Option<String>,
    #[schema(minimum = 0)]
    pub transportation_expenses: Option<i32>,
    pub remarks: Option<String>,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceUpdateDto {
    #[schema(value_type = Option<String>, format = "date")]
    pub work_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub clock_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub clock_out: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub rest_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub rest_out: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
    pub work_place: Option<String>,
    #[schema(minimum = 0)]
    pub transportation_expenses: Option<i32>,
    pub remarks: Option<String>,
    pub updated_by: String,
}

impl AttendanceUpdateDto {
    pub fn into_parts(self) -> (AttendanceChanges, String) {
        let changes = AttendanceChanges {
            work_date: self.work_date,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            rest_in: self.rest_in,
            rest_out: self.rest_out,
            status: self.status,
            work_place: self.work_place,
            transportation_expenses: self.transportation_expenses,
            remarks: self.remarks,
        };
        (changes, self.updated_by)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceDeleteDto {
    pub updated_by: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    pub user_id: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// One of `work_date`, `created_at`, `updated_at`
    pub order_by: Option<String>,
    /// Ascending order (default true)
    pub asc: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: Uuid,
    #[schema(value_type = String, format = "date")]
    pub work_date: NaiveDate,
    #[schema(value_type = String)]
    pub clock_in: NaiveTime,
    #[schema(value_type = String)]
    pub clock_out: NaiveTime,
    #[schema(value_type = String)]
    pub rest_in: NaiveTime,
    #[schema(value_type = String)]
    pub rest_out: NaiveTime,
    pub user_id: Uuid,
    pub status: AttendanceStatus,
    pub work_place: Option<String>,
    pub transportation_expenses: Option<i32>,
    pub remarks: Option<String>,
    #[schema(example = 8.0)]
    pub working_hours: f64,
    #[schema(example = 1.0)]
    pub rest_hours: f64,
    pub delete_flag: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<Attendance> for AttendanceResponse {
    fn from(attendance: Attendance) -> Self {
        Self {
            working_hours: attendance.working_hours(),
            rest_hours: attendance.rest_hours(),
            id: *attendance.id.as_uuid(),
            work_date: attendance.work_date,
            clock_in: attendance.clock_in,
            clock_out: attendance.clock_out,
            rest_in: attendance.rest_in,
            rest_out: attendance.rest_out,
            user_id: *attendance.user_id.as_uuid(),
            status: attendance.status,
            work_place: attendance.work_place,
            transportation_expenses: attendance.transportation_expenses,
            remarks: attendance.remarks,
            delete_flag: attendance.delete_flag,
            created_at: attendance.created_at,
            created_by: attendance.created_by,
            updated_at: attendance.updated_at,
            updated_by: attendance.updated_by,
        }
    }
}
