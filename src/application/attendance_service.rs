use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::attendance_dto::{
    AttendanceCreateDto, AttendanceQuery, AttendanceResponse, AttendanceUpdateDto,
};
use super::error::{ServiceError, ServiceResult};
use crate::domain::attendance::validate_clock_times;
use crate::domain::{
    Attendance, AttendanceFilter, AttendanceId, AttendanceOrder, AttendanceRepository,
    DomainError, UserId,
};

pub struct AttendanceService {
    repository: Arc<dyn AttendanceRepository>,
}

fn parse_order(raw: Option<&str>) -> ServiceResult<AttendanceOrder> {
    match raw {
        None | Some("work_date") => Ok(AttendanceOrder::WorkDate),
        Some("created_at") => Ok(AttendanceOrder::CreatedAt),
        Some("updated_at") => Ok(AttendanceOrder::UpdatedAt),
        Some(other) => Err(ServiceError::BadRequest(format!(
            "Unsupported order_by column: {other}"
        ))),
    }
}

impl AttendanceService {
    pub fn new(repository: Arc<dyn AttendanceRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_attendance(&self, id: &str) -> ServiceResult<AttendanceResponse> {
        let id = AttendanceId::parse(id)?;
        self.find(&id).await.map(AttendanceResponse::from)
    }

    pub async fn get_attendances(
        &self,
        query: AttendanceQuery,
    ) -> ServiceResult<Vec<AttendanceResponse>> {
        let user_id = query.user_id.as_deref().map(UserId::parse).transpose()?;
        let date_range = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            (Some(_), Some(_)) => {
                return Err(ServiceError::BadRequest(
                    "start_date must not be after end_date".to_string(),
                ));
            }
            (None, None) => None,
            _ => {
                return Err(ServiceError::BadRequest(
                    "start_date and end_date must be given together".to_string(),
                ));
            }
        };

        let filter = AttendanceFilter {
            user_id,
            status: query.status,
            date_range,
            limit: query.limit,
            offset: query.offset,
            order_by: parse_order(query.order_by.as_deref())?,
            ascending: query.asc.unwrap_or(true),
        };

        let records = self.repository.search(&filter).await?;
        Ok(records.into_iter().map(AttendanceResponse::from).collect())
    }

    pub async fn create_attendance(
        &self,
        dto: AttendanceCreateDto,
    ) -> ServiceResult<AttendanceResponse> {
        let user_id = UserId::parse(&dto.user_id)?;

        if self
            .repository
            .find_by_user_and_date(&user_id, dto.work_date)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Attendance record for user {} on {} already exists",
                user_id, dto.work_date
            )));
        }

        validate_clock_times(dto.clock_in, dto.clock_out, dto.rest_in, dto.rest_out)?;
        if dto.transportation_expenses.is_some_and(|v| v < 0) {
            return Err(DomainError::NegativeExpenses.into());
        }

        let now = Utc::now();
        let attendance = Attendance {
            id: AttendanceId::generate(),
            work_date: dto.work_date,
            clock_in: dto.clock_in,
            clock_out: dto.clock_out,
            rest_in: dto.rest_in,
            rest_out: dto.rest_out,
            user_id,
            status: dto.status,
            work_place: dto.work_place,
            transportation_expenses: dto.transportation_expenses,
            remarks: dto.remarks,
            delete_flag: false,
            created_at: now,
            created_by: dto.created_by,
            updated_at: now,
            updated_by: dto.updated_by,
        };

        let saved = self.repository.save(&attendance).await?;
        info!(attendance_id = %saved.id, user_id = %saved.user_id, work_date = %saved.work_date, "attendance created");
        Ok(saved.into())
    }

    pub async fn update_attendance(
        &self,
        id: &str,
        dto: AttendanceUpdateDto,
    ) -> ServiceResult<AttendanceResponse> {
        let id = AttendanceId::parse(id)?;
        let current = self.find(&id).await?;
        let (changes, updated_by) = dto.into_parts();

        if let Some(work_date) = changes.work_date.filter(|d| *d != current.work_date) {
            if self
                .repository
                .find_by_user_and_date(&current.user_id, work_date)
                .await?
                .is_some()
            {
                return Err(ServiceError::Conflict(format!(
                    "Attendance record for user {} on {} already exists",
                    current.user_id, work_date
                )));
            }
        }

        let updated = current.update(changes, &updated_by)?;
        let saved = self.repository.save(&updated).await?;
        info!(attendance_id = %saved.id, updated_by = %saved.updated_by, "attendance updated");
        Ok(saved.into())
    }

    pub async fn delete_attendance(&self, id: &str, updated_by: &str) -> ServiceResult<()> {
        let id = AttendanceId::parse(id)?;
        let current = self.find(&id).await?;
        self.repository.save(&current.deactivate(updated_by)).await?;
        info!(attendance_id = %id, updated_by, "attendance deleted");
        Ok(())
    }

    /// Logically deleted records are treated as absent.
    async fn find(&self, id: &AttendanceId) -> ServiceResult<Attendance> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|a| !a.delete_flag)
            .ok_or_else(|| ServiceError::NotFound(format!("Attendance with ID {id} not found")))
    }
}
