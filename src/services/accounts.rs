use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::core::security;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::services::errors::DomainError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) struct NewAccount<'a> {
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
    pub(crate) role: UserRole,
}

pub(crate) fn check_credentials(email: &str, password: &str) -> Result<(), DomainError> {
    if !email.validate_email() {
        return Err(DomainError::WeakCredential("Invalid email address".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::WeakCredential(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub(crate) async fn register(pool: &PgPool, account: NewAccount<'_>) -> Result<User, DomainError> {
    let email = normalize_email(account.email);
    check_credentials(&email, account.password)?;

    let first_name = account.first_name.trim();
    let last_name = account.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(DomainError::Validation("First and last name are required".to_string()));
    }

    if repositories::users::exists_by_email(pool, &email).await?.is_some() {
        return Err(DomainError::DuplicateEmail);
    }

    let hashed_password = security::hash_password(account.password)?;
    let now = primitive_now_utc();
    let id = Uuid::new_v4().to_string();

    let user = repositories::users::create(
        pool,
        repositories::users::CreateUser {
            id: &id,
            first_name,
            last_name,
            email: &email,
            hashed_password,
            role: account.role,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| DomainError::unique_or(e, DomainError::DuplicateEmail))?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), action = "register", "Account created");
    Ok(user)
}

pub(crate) async fn authenticate(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<User, DomainError> {
    let email = normalize_email(email);
    let user = repositories::users::find_by_email(pool, &email)
        .await?
        .ok_or(DomainError::NotFound("User"))?;

    if !security::verify_password(password, &user.hashed_password)? {
        tracing::info!(user_id = %user.id, action = "signin", "Password verification failed");
        return Err(DomainError::InvalidCredential);
    }

    Ok(user)
}

pub(crate) async fn get_profile(pool: &PgPool, user_id: &str) -> Result<User, DomainError> {
    repositories::users::find_by_id(pool, user_id).await?.ok_or(DomainError::NotFound("User"))
}

pub(crate) struct ProfileUpdate<'a> {
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) biography: Option<&'a str>,
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    user_id: &str,
    update: ProfileUpdate<'_>,
) -> Result<User, DomainError> {
    let email = normalize_email(update.email);
    if !email.validate_email() {
        return Err(DomainError::Validation("Invalid email address".to_string()));
    }
    let first_name = update.first_name.trim();
    let last_name = update.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(DomainError::Validation("First and last name are required".to_string()));
    }

    if let Some(owner) = repositories::users::exists_by_email(pool, &email).await? {
        if owner != user_id {
            return Err(DomainError::DuplicateEmail);
        }
    }

    let updated = repositories::users::update_profile(
        pool,
        user_id,
        repositories::users::UpdateProfile {
            first_name,
            last_name,
            email: &email,
            biography: update.biography.map(str::trim).filter(|value| !value.is_empty()),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| DomainError::unique_or(e, DomainError::DuplicateEmail))?;

    if !updated {
        return Err(DomainError::NotFound("User"));
    }

    tracing::info!(user_id, action = "update_profile", "Profile updated");
    get_profile(pool, user_id).await
}

#[cfg(test)]
mod tests {
    use super::{authenticate, check_credentials, register, NewAccount};
    use crate::db::types::UserRole;
    use crate::services::errors::DomainError;
    use crate::test_support;

    #[test]
    fn credentials_require_valid_email_and_long_password() {
        assert!(check_credentials("ana@example.com", "longenough").is_ok());
        assert!(matches!(
            check_credentials("not-an-email", "longenough"),
            Err(DomainError::WeakCredential(_))
        ));
        assert!(matches!(
            check_credentials("ana@example.com", "short"),
            Err(DomainError::WeakCredential(_))
        ));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let ctx = test_support::setup_test_context().await;
        let account = NewAccount {
            first_name: "Ana",
            last_name: "Lopez",
            email: "ana@example.com",
            password: "secret-pass",
            role: UserRole::Student,
        };
        register(ctx.state.db(), account).await.expect("first registration");

        let duplicate = NewAccount {
            first_name: "Ana",
            last_name: "Lopez",
            email: "ANA@example.com",
            password: "secret-pass",
            role: UserRole::Teacher,
        };
        let err = register(ctx.state.db(), duplicate).await.expect_err("duplicate email");
        assert!(matches!(err, DomainError::DuplicateEmail));
    }

    #[tokio::test]
    async fn authenticate_distinguishes_unknown_email_from_bad_password() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "bob@example.com", UserRole::Teacher, "bob-secret")
            .await;

        let user = authenticate(ctx.state.db(), "bob@example.com", "bob-secret")
            .await
            .expect("valid credentials");
        assert_eq!(user.role, UserRole::Teacher);

        let missing = authenticate(ctx.state.db(), "nobody@example.com", "bob-secret").await;
        assert!(matches!(missing, Err(DomainError::NotFound("User"))));

        let wrong = authenticate(ctx.state.db(), "bob@example.com", "wrong-secret").await;
        assert!(matches!(wrong, Err(DomainError::InvalidCredential)));
    }
}
