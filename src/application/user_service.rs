use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use super::password::hash_password;
use super::user_dto::{
    PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN, UserCreateDto, UserListQuery, UserResponse,
    UserUpdateDto,
};
use crate::domain::value_objects::{validate_phone_number, validate_zip_code};
use crate::domain::{DomainError, Email, User, UserChanges, UserId, UserRepository};

/// Audit name recorded while requests carry no authenticated principal.
pub const SYSTEM_ACTOR: &str = "system";

const DEFAULT_LIMIT: u32 = 100;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

fn validate_contact(phone: Option<&str>, zip: Option<&str>) -> Result<(), DomainError> {
    if let Some(phone) = phone {
        validate_phone_number(phone)?;
    }
    if let Some(zip) = zip {
        validate_zip_code(zip)?;
    }
    Ok(())
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, dto: UserCreateDto) -> ServiceResult<UserResponse> {
        let username = dto.username.trim().to_string();
        let length = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(DomainError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            }
            .into());
        }
        if dto.password.chars().count() < PASSWORD_MIN {
            return Err(DomainError::PasswordTooShort { min: PASSWORD_MIN }.into());
        }
        let email = Email::new(dto.email)?;
        validate_contact(dto.phone_number.as_deref(), dto.zip_code.as_deref())?;

        if self.repository.username_taken(&username).await? {
            return Err(ServiceError::Conflict(format!(
                "Username {username} already exists"
            )));
        }
        if self.repository.find_by_email(email.as_str()).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Email {email} already exists")));
        }

        let hashed_password = hash_password(&dto.password)?;
        let default_role = self.repository.default_role_id().await?;
        let now = Utc::now();

        let user = User {
            id: UserId::generate(),
            username,
            email,
            hashed_password,
            first_name: dto.first_name,
            first_name_ruby: dto.first_name_ruby,
            last_name: dto.last_name,
            last_name_ruby: dto.last_name_ruby,
            gender: dto.gender,
            birth_day: dto.birth_day,
            phone_number: dto.phone_number,
            zip_code: dto.zip_code,
            address: dto.address,
            role_ids: vec![default_role],
            created_at: now,
            created_by: SYSTEM_ACTOR.to_string(),
            updated_at: now,
            updated_by: SYSTEM_ACTOR.to_string(),
            delete_flag: false,
        };

        let created = self.repository.create(&user).await?;
        info!(user_id = %created.id, username = %created.username, "user created");
        Ok(created.into())
    }

    pub async fn get_user(&self, id: &str) -> ServiceResult<UserResponse> {
        let id = UserId::parse(id)?;
        self.find_active(&id).await.map(UserResponse::from)
    }

    pub async fn get_users(&self, query: UserListQuery) -> ServiceResult<Vec<UserResponse>> {
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        let ascending = query.ascending.unwrap_or(true);
        debug!(offset, limit, ascending, "listing users");

        let users = self.repository.list(offset, limit, ascending).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_user(
        &self,
        id: &str,
        dto: UserUpdateDto,
        updated_by: &str,
    ) -> ServiceResult<UserResponse> {
        let id = UserId::parse(id)?;
        validate_contact(dto.phone_number.as_deref(), dto.zip_code.as_deref())?;

        let current = self.find_active(&id).await?;
        let updated = current.update(UserChanges::from(dto), updated_by);
        let saved = self.repository.update(&updated).await?;
        info!(user_id = %saved.id, updated_by, "user updated");
        Ok(saved.into())
    }

    pub async fn remove_user(&self, id: &str, updated_by: &str) -> ServiceResult<()> {
        let id = UserId::parse(id)?;
        let removed = self.find_active(&id).await?.deactivate(updated_by);
        // a concurrent delete can win between the read and the write
        if !self.repository.remove(&removed).await? {
            return Err(not_found(&id));
        }
        info!(user_id = %id, updated_by, "user removed");
        Ok(())
    }

    /// Seeds the system roles; returns how many were missing.
    pub async fn initialize_roles(&self) -> ServiceResult<u64> {
        let inserted = self.repository.seed_roles().await?;
        info!(inserted, "roles initialized");
        Ok(inserted)
    }

    async fn find_active(&self, id: &UserId) -> ServiceResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &UserId) -> ServiceError {
    ServiceError::NotFound(format!("User with ID {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::password::verify_password;
    use crate::domain::{Gender, RoleName};
    use strum::IntoEnumIterator;
    use crate::domain::user::fixtures::sample_user;
    use crate::infrastructure::memory::InMemoryUserRepository;
    use chrono::NaiveDate;

    fn valid_dto() -> UserCreateDto {
        UserCreateDto {
            username: "newuser".to_string(),
            email: "new@example.com".to_string(),
            password: "password123".to_string(),
            first_name: Some("Hanako".to_string()),
            first_name_ruby: None,
            last_name: Some("Suzuki".to_string()),
            last_name_ruby: None,
            gender: Gender::Female,
            birth_day: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
            phone_number: Some("080-1111-2222".to_string()),
            zip_code: Some("100-0001".to_string()),
            address: None,
        }
    }

    fn service_with(repo: Arc<InMemoryUserRepository>) -> UserService {
        UserService::new(repo)
    }

    #[actix_web::test]
    async fn create_user_hashes_password_and_assigns_default_role() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let service = service_with(repo.clone());

        let created = service.create_user(valid_dto()).await.unwrap();

        assert_eq!(created.username, "newuser");
        assert_eq!(created.email, "new@example.com");
        assert_eq!(created.role_ids, vec![*repo.default_role().as_uuid()]);
        assert_eq!(created.created_by, SYSTEM_ACTOR);
        assert!(!created.delete_flag);

        let stored = repo.find_by_username("newuser").await.unwrap().unwrap();
        assert_ne!(stored.hashed_password, "password123");
        assert!(verify_password("password123", &stored.hashed_password));
    }

    #[actix_web::test]
    async fn duplicate_username_is_a_conflict() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let existing = sample_user();
        repo.insert(existing.clone());
        let service = service_with(repo);

        let dto = UserCreateDto {
            username: existing.username.clone(),
            ..valid_dto()
        };
        let err = service.create_user(dto).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("Username")));
    }

    #[actix_web::test]
    async fn username_of_removed_user_stays_taken() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let removed = sample_user().deactivate(SYSTEM_ACTOR);
        repo.insert(removed.clone());
        let service = service_with(repo.clone());

        let dto = UserCreateDto {
            username: removed.username.clone(),
            ..valid_dto()
        };
        let err = service.create_user(dto).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("Username")));
        assert_eq!(repo.len(), 1);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let existing = sample_user();
        repo.insert(existing.clone());
        let service = service_with(repo);

        let dto = UserCreateDto {
            email: existing.email.to_string(),
            ..valid_dto()
        };
        let err = service.create_user(dto).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("Email")));
    }

    #[actix_web::test]
    async fn invalid_input_is_rejected_before_touching_storage() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let service = service_with(repo.clone());

        let cases = [
            UserCreateDto {
                email: "invalid-email".to_string(),
                ..valid_dto()
            },
            UserCreateDto {
                password: "short".to_string(),
                ..valid_dto()
            },
            UserCreateDto {
                username: "ab".to_string(),
                ..valid_dto()
            },
            UserCreateDto {
                phone_number: Some("12345".to_string()),
                ..valid_dto()
            },
            UserCreateDto {
                zip_code: Some("1234567".to_string()),
                ..valid_dto()
            },
        ];
        for dto in cases {
            let err = service.create_user(dto).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{err}");
        }
        assert_eq!(repo.len(), 0);
    }

    #[actix_web::test]
    async fn get_user_reports_missing_and_malformed_ids() {
        let service = service_with(Arc::new(InMemoryUserRepository::default()));

        let missing = service
            .get_user(&UserId::generate().to_string())
            .await
            .unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));

        let malformed = service.get_user("abc").await.unwrap_err();
        assert!(matches!(malformed, ServiceError::Validation(_)));
    }

    #[actix_web::test]
    async fn get_users_skips_removed_users() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let kept = sample_user();
        let removed = User {
            id: UserId::generate(),
            username: "gone".to_string(),
            delete_flag: true,
            ..sample_user()
        };
        repo.insert(kept.clone());
        repo.insert(removed);
        let service = service_with(repo);

        let users = service.get_users(UserListQuery::default()).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, *kept.id.as_uuid());
    }

    #[actix_web::test]
    async fn get_users_honours_limits_above_the_default() {
        let repo = Arc::new(InMemoryUserRepository::default());
        for i in 0..120 {
            repo.insert(User {
                id: UserId::generate(),
                username: format!("user{i}"),
                ..sample_user()
            });
        }
        let service = service_with(repo);

        let all = service
            .get_users(UserListQuery {
                limit: Some(150),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 120);

        let defaulted = service.get_users(UserListQuery::default()).await.unwrap();
        assert_eq!(defaulted.len(), DEFAULT_LIMIT as usize);

        let none = service
            .get_users(UserListQuery {
                limit: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[actix_web::test]
    async fn update_user_changes_profile_fields() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let user = sample_user();
        repo.insert(user.clone());
        let service = service_with(repo);

        let updated = service
            .update_user(
                &user.id.to_string(),
                UserUpdateDto {
                    last_name: Some("Tanaka".to_string()),
                    address: Some("Kyoto".to_string()),
                    ..Default::default()
                },
                "admin",
            )
            .await
            .unwrap();

        assert_eq!(updated.last_name.as_deref(), Some("Tanaka"));
        assert_eq!(updated.address.as_deref(), Some("Kyoto"));
        assert_eq!(updated.first_name, user.first_name);
        assert_eq!(updated.updated_by, "admin");
    }

    #[actix_web::test]
    async fn update_missing_user_is_not_found() {
        let service = service_with(Arc::new(InMemoryUserRepository::default()));
        let err = service
            .update_user(
                &UserId::generate().to_string(),
                UserUpdateDto::default(),
                SYSTEM_ACTOR,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[actix_web::test]
    async fn remove_user_is_logical_and_not_repeatable() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let user = sample_user();
        repo.insert(user.clone());
        let service = service_with(repo.clone());

        service
            .remove_user(&user.id.to_string(), SYSTEM_ACTOR)
            .await
            .unwrap();
        assert_eq!(repo.len(), 1);
        assert!(repo.find_by_id(&user.id).await.unwrap().is_none());
        assert!(repo.username_taken(&user.username).await.unwrap());

        let again = service
            .remove_user(&user.id.to_string(), SYSTEM_ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(again, ServiceError::NotFound(_)));
    }

    #[actix_web::test]
    async fn initialize_roles_is_idempotent() {
        let service = service_with(Arc::new(InMemoryUserRepository::default()));

        let first = service.initialize_roles().await.unwrap();
        assert_eq!(first, RoleName::iter().count() as u64);
        assert_eq!(service.initialize_roles().await.unwrap(), 0);
    }
}
