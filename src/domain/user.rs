use chrono::{DateTime, NaiveDate, Utc};

use super::value_objects::{Email, Gender, RoleId, UserId};

/// A registered user with profile, contact and role assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub hashed_password: String,
    pub first_name: Option<String>,
    pub first_name_ruby: Option<String>,
    pub last_name: Option<String>,
    pub last_name_ruby: Option<String>,
    pub gender: Gender,
    pub birth_day: NaiveDate,
    pub phone_number: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub role_ids: Vec<RoleId>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub delete_flag: bool,
}

/// Profile and contact fields a caller may change after registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub first_name_ruby: Option<String>,
    pub last_name: Option<String>,
    pub last_name_ruby: Option<String>,
    pub gender: Option<Gender>,
    pub birth_day: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
}

impl User {
    /// Returns a copy with every provided field replaced.
    pub fn update(&self, changes: UserChanges, updated_by: &str) -> Self {
        Self {
            first_name: changes.first_name.or_else(|| self.first_name.clone()),
            first_name_ruby: changes
                .first_name_ruby
                .or_else(|| self.first_name_ruby.clone()),
            last_name: changes.last_name.or_else(|| self.last_name.clone()),
            last_name_ruby: changes
                .last_name_ruby
                .or_else(|| self.last_name_ruby.clone()),
            gender: changes.gender.unwrap_or(self.gender),
            birth_day: changes.birth_day.unwrap_or(self.birth_day),
            phone_number: changes.phone_number.or_else(|| self.phone_number.clone()),
            zip_code: changes.zip_code.or_else(|| self.zip_code.clone()),
            address: changes.address.or_else(|| self.address.clone()),
            updated_at: Utc::now(),
            updated_by: updated_by.to_string(),
            ..self.clone()
        }
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

    pub fn is_active(&self) -> bool {
        !self.delete_flag
    }
}
