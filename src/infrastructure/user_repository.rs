use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use strum::IntoEnumIterator;
use tracing::error;

use crate::domain::value_objects::parse_variant;
use crate::domain::{
    Email, RepositoryError, RoleId, RoleName, User, UserId, UserRepository,
};

const SELECT_USER: &str = r#"
    SELECT
        u.id, u.username, u.email, u.hashed_password,
        u.first_name, u.first_name_ruby, u.last_name, u.last_name_ruby,
        u.gender, u.birth_day, u.phone_number, u.zip_code, u.address,
        (SELECT GROUP_CONCAT(ur.role_id ORDER BY ur.created_at)
           FROM user_roles ur
          WHERE ur.user_id = u.id AND ur.delete_flag = 0) AS role_ids,
        u.created_at, u.created_by, u.updated_at, u.updated_by, u.delete_flag
    FROM users u
"#;

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    hashed_password: String,
    first_name: Option<String>,
    first_name_ruby: Option<String>,
    last_name: Option<String>,
    last_name_ruby: Option<String>,
    gender: String,
    birth_day: NaiveDate,
    phone_number: Option<String>,
    zip_code: Option<String>,
    address: Option<String>,
    role_ids: Option<String>,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
    delete_flag: bool,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::domain::DomainError| RepositoryError::Corrupt(e.to_string());
        let role_ids = row
            .role_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.is_empty())
            .map(RoleId::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;

        Ok(User {
            id: UserId::parse(&row.id).map_err(corrupt)?,
            username: row.username,
            email: Email::new(row.email).map_err(corrupt)?,
            hashed_password: row.hashed_password,
            first_name: row.first_name,
            first_name_ruby: row.first_name_ruby,
            last_name: row.last_name,
            last_name_ruby: row.last_name_ruby,
            gender: parse_variant("gender", &row.gender).map_err(corrupt)?,
            birth_day: row.birth_day,
            phone_number: row.phone_number,
            zip_code: row.zip_code,
            address: row.address,
            role_ids,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            delete_flag: row.delete_flag,
        })
    }
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_active(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("{SELECT_USER} WHERE u.{column} = ? AND u.delete_flag = 0 LIMIT 1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, column, "Failed to fetch user");
                RepositoryError::from(e)
            })?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users
            (id, username, email, hashed_password,
             first_name, first_name_ruby, last_name, last_name_ruby,
             gender, birth_day, phone_number, zip_code, address,
             created_at, created_by, updated_at, updated_by, delete_flag)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(user.email.as_str())
        .bind(&user.hashed_password)
        .bind(&user.first_name)
        .bind(&user.first_name_ruby)
        .bind(&user.last_name)
        .bind(&user.last_name_ruby)
        .bind(user.gender.as_ref())
        .bind(user.birth_day)
        .bind(&user.phone_number)
        .bind(&user.zip_code)
        .bind(&user.address)
        .bind(user.created_at)
        .bind(&user.created_by)
        .bind(user.updated_at)
        .bind(&user.updated_by)
        .bind(user.delete_flag)
        .execute(&mut *tx)
        .await?;

        for role_id in &user.role_ids {
            sqlx::query(
                r#"
                INSERT INTO user_roles (id, user_id, role_id, created_by, updated_by)
                VALUES (UUID(), ?, ?, ?, ?)
                "#,
            )
            .bind(user.id.to_string())
            .bind(role_id.to_string())
            .bind(&user.created_by)
            .bind(&user.updated_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_active("id", &id.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_active("username", username).await
    }

    async fn username_taken(&self, username: &str) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_active("email", email).await
    }

    async fn default_role_id(&self) -> Result<RoleId, RepositoryError> {
        let id: Option<String> = sqlx::query_scalar(
            "SELECT id FROM roles WHERE name = ? AND delete_flag = 0 LIMIT 1",
        )
        .bind(RoleName::User.as_ref())
        .fetch_optional(&self.pool)
        .await?;

        let id = id.ok_or(RepositoryError::MissingDefaultRole)?;
        RoleId::parse(&id).map_err(|e| RepositoryError::Corrupt(e.to_string()))
    }

    async fn list(
        &self,
        offset: u32,
        limit: u32,
        ascending: bool,
    ) -> Result<Vec<User>, RepositoryError> {
        let direction = if ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "{SELECT_USER} WHERE u.delete_flag = 0 ORDER BY u.created_at {direction} LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = ?, first_name_ruby = ?, last_name = ?, last_name_ruby = ?,
                gender = ?, birth_day = ?, phone_number = ?, zip_code = ?, address = ?,
                updated_at = ?, updated_by = ?
            WHERE id = ? AND delete_flag = 0
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.first_name_ruby)
        .bind(&user.last_name)
        .bind(&user.last_name_ruby)
        .bind(user.gender.as_ref())
        .bind(user.birth_day)
        .bind(&user.phone_number)
        .bind(&user.zip_code)
        .bind(&user.address)
        .bind(user.updated_at)
        .bind(&user.updated_by)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Query(format!(
                "user {} disappeared during update",
                user.id
            )));
        }
        Ok(user.clone())
    }

    async fn remove(&self, user: &User) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET delete_flag = ?, updated_at = ?, updated_by = ?
            WHERE id = ? AND delete_flag = 0
            "#,
        )
        .bind(user.delete_flag)
        .bind(user.updated_at)
        .bind(&user.updated_by)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn seed_roles(&self) -> Result<u64, RepositoryError> {
        let mut inserted = 0;
        for role in RoleName::iter() {
            let result = sqlx::query(
                r#"
                INSERT IGNORE INTO roles (id, name, description, created_by, updated_by)
                VALUES (?, ?, ?, 'system', 'system')
                "#,
            )
            .bind(RoleId::generate().to_string())
            .bind(role.as_ref())
            .bind(role.description())
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}
