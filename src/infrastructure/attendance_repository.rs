use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use tracing::{debug, error};

use crate::domain::value_objects::parse_variant;
use crate::domain::{
    Attendance, AttendanceFilter, AttendanceId, AttendanceRepository, DomainError,
    RepositoryError, UserId,
};

const SELECT_ATTENDANCE: &str = r#"
    SELECT
        id, work_date, clock_in, clock_out, rest_in, rest_out,
        work_place, transportation_expenses, status, user_id, remarks,
        created_at, created_by, updated_at, updated_by, delete_flag
    FROM attendances
"#;

#[derive(FromRow)]
struct AttendanceRow {
    id: String,
    work_date: NaiveDate,
    clock_in: NaiveTime,
    clock_out: NaiveTime,
    rest_in: NaiveTime,
    rest_out: NaiveTime,
    work_place: Option<String>,
    transportation_expenses: Option<i32>,
    status: String,
    user_id: String,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
    delete_flag: bool,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = RepositoryError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| RepositoryError::Corrupt(e.to_string());
        Ok(Attendance {
            id: AttendanceId::parse(&row.id).map_err(corrupt)?,
            work_date: row.work_date,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            rest_in: row.rest_in,
            rest_out: row.rest_out,
            user_id: UserId::parse(&row.user_id).map_err(corrupt)?,
            status: parse_variant("attendance status", &row.status).map_err(corrupt)?,
            work_place: row.work_place,
            transportation_expenses: row.transportation_expenses,
            remarks: row.remarks,
            delete_flag: row.delete_flag,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

pub struct MySqlAttendanceRepository {
    pool: MySqlPool,
}

impl MySqlAttendanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Appends the WHERE, ORDER BY and LIMIT clauses for `filter`.
fn push_filter<'a>(builder: &mut QueryBuilder<'a, MySql>, filter: &'a AttendanceFilter) {
    builder.push(" WHERE delete_flag = 0");

    if let Some(user_id) = &filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.to_string());
    }
    if let Some(status) = &filter.status {
        builder.push(" AND status = ").push_bind(status.as_ref());
    }
    if let Some((start, end)) = &filter.date_range {
        builder
            .push(" AND work_date BETWEEN ")
            .push_bind(*start)
            .push(" AND ")
            .push_bind(*end);
    }

    // column() is a fixed whitelist, so interpolation is safe here
    builder
        .push(" ORDER BY ")
        .push(filter.order_by.column())
        .push(if filter.ascending { " ASC" } else { " DESC" });

    match (filter.limit, filter.offset) {
        (Some(limit), offset) => {
            builder
                .push(" LIMIT ")
                .push_bind(i64::from(limit))
                .push(" OFFSET ")
                .push_bind(i64::from(offset.unwrap_or(0)));
        }
        // MySQL has no OFFSET without LIMIT
        (None, Some(offset)) => {
            builder
                .push(" LIMIT 18446744073709551615 OFFSET ")
                .push_bind(i64::from(offset));
        }
        (None, None) => {}
    }
}

#[async_trait]
impl AttendanceRepository for MySqlAttendanceRepository {
    async fn find_by_id(&self, id: &AttendanceId) -> Result<Option<Attendance>, RepositoryError> {
        let sql = format!("{SELECT_ATTENDANCE} WHERE id = ? LIMIT 1");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, attendance_id = %id, "Failed to fetch attendance");
                RepositoryError::from(e)
            })?;
        row.map(Attendance::try_from).transpose()
    }

    async fn find_by_user_and_date(
        &self,
        user_id: &UserId,
        work_date: NaiveDate,
    ) -> Result<Option<Attendance>, RepositoryError> {
        let sql = format!(
            "{SELECT_ATTENDANCE} WHERE user_id = ? AND work_date = ? AND delete_flag = 0 LIMIT 1"
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(user_id.to_string())
            .bind(work_date)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Attendance::try_from).transpose()
    }

    async fn search(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, RepositoryError> {
        let mut builder = QueryBuilder::<MySql>::new(SELECT_ATTENDANCE);
        push_filter(&mut builder, filter);
        debug!(sql = builder.sql(), "Searching attendances");

        let rows = builder
            .build_query_as::<AttendanceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Attendance search failed");
                RepositoryError::from(e)
            })?;
        rows.into_iter().map(Attendance::try_from).collect()
    }

    async fn save(&self, attendance: &Attendance) -> Result<Attendance, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO attendances
            (id, work_date, clock_in, clock_out, rest_in, rest_out,
             work_place, transportation_expenses, status, user_id, remarks,
             created_at, created_by, updated_at, updated_by, delete_flag)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                work_date = VALUES(work_date),
                clock_in = VALUES(clock_in),
                clock_out = VALUES(clock_out),
                rest_in = VALUES(rest_in),
                rest_out = VALUES(rest_out),
                work_place = VALUES(work_place),
                transportation_expenses = VALUES(transportation_expenses),
                status = VALUES(status),
                remarks = VALUES(remarks),
                updated_at = VALUES(updated_at),
                updated_by = VALUES(updated_by),
                delete_flag = VALUES(delete_flag)
            "#,
        )
        .bind(attendance.id.to_string())
        .bind(attendance.work_date)
        .bind(attendance.clock_in)
        .bind(attendance.clock_out)
        .bind(attendance.rest_in)
        .bind(attendance.rest_out)
        .bind(&attendance.work_place)
        .bind(attendance.transportation_expenses)
        .bind(attendance.status.as_ref())
        .bind(attendance.user_id.to_string())
        .bind(&attendance.remarks)
        .bind(attendance.created_at)
        .bind(&attendance.created_by)
        .bind(attendance.updated_at)
        .bind(&attendance.updated_by)
        .bind(attendance.delete_flag)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, attendance_id = %attendance.id, "Failed to save attendance");
            RepositoryError::from(e)
        })?;

        Ok(attendance.clone())
    }
}
