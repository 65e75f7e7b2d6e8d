//! In-memory repositories used by service and handler tests.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use strum::IntoEnumIterator;

use crate::domain::{
    Attendance, AttendanceFilter, AttendanceId, AttendanceOrder, AttendanceRepository,
    RepositoryError, RoleId, RoleName, User, UserId, UserRepository,
};

pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    roles: Mutex<Vec<RoleName>>,
    default_role: RoleId,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            roles: Mutex::new(Vec::new()),
            default_role: RoleId::generate(),
        }
    }
}

impl InMemoryUserRepository {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn default_role(&self) -> RoleId {
        self.default_role
    }

    fn find_active<F: Fn(&User) -> bool>(&self, pred: F) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.is_active() && pred(u))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        self.insert(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.find_active(|u| u.id == *id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.find_active(|u| u.username == username))
    }

    async fn username_taken(&self, username: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.find_active(|u| u.email.as_str() == email))
    }

    async fn default_role_id(&self) -> Result<RoleId, RepositoryError> {
        Ok(self.default_role)
    }

    async fn seed_roles(&self) -> Result<u64, RepositoryError> {
        let mut roles = self.roles.lock().unwrap();
        let mut inserted = 0;
        for role in RoleName::iter() {
            if !roles.contains(&role) {
                roles.push(role);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list(
        &self,
        offset: u32,
        limit: u32,
        ascending: bool,
    ) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.is_active())
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        if !ascending {
            users.reverse();
        }
        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user.clone())
            }
            None => Err(RepositoryError::Query(format!("user {} not found", user.id))),
        }
    }

    async fn remove(&self, user: &User) -> Result<bool, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id && u.is_active()) {
            Some(slot) => {
                *slot = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryAttendanceRepository {
    records: Mutex<Vec<Attendance>>,
}

impl InMemoryAttendanceRepository {
    pub fn insert(&self, attendance: Attendance) {
        self.records.lock().unwrap().push(attendance);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn find_by_id(&self, id: &AttendanceId) -> Result<Option<Attendance>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == *id)
            .cloned())
    }

    async fn find_by_user_and_date(
        &self,
        user_id: &UserId,
        work_date: NaiveDate,
    ) -> Result<Option<Attendance>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|a| !a.delete_flag && a.user_id == *user_id && a.work_date == work_date)
            .cloned())
    }

    async fn search(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, RepositoryError> {
        let mut found: Vec<Attendance> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|a| !a.delete_flag)
            .filter(|a| filter.user_id.is_none_or(|id| a.user_id == id))
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .filter(|a| {
                filter
                    .date_range
                    .is_none_or(|(start, end)| a.work_date >= start && a.work_date <= end)
            })
            .cloned()
            .collect();

        match filter.order_by {
            AttendanceOrder::WorkDate => found.sort_by_key(|a| a.work_date),
            AttendanceOrder::CreatedAt => found.sort_by_key(|a| a.created_at),
            AttendanceOrder::UpdatedAt => found.sort_by_key(|a| a.updated_at),
        }
        if !filter.ascending {
            found.reverse();
        }

        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    async fn save(&self, attendance: &Attendance) -> Result<Attendance, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|a| a.id == attendance.id) {
            Some(slot) => *slot = attendance.clone(),
            None => records.push(attendance.clone()),
        }
        Ok(attendance.clone())
    }
}
