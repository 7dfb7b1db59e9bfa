use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    repository::StorefrontRepository,
};

/// Signs a user in, registering the email on first sight.
pub async fn login_user(
    repo: &dyn StorefrontRepository,
    payload: LoginRequest,
) -> AppResult<LoginResponse> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_string();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let (user, action) = match repo.find_user_by_email(&email).await? {
        Some(user) => {
            let parsed_hash = PasswordHash::new(&user.password_hash)
                .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_err()
            {
                return Err(AppError::InvalidCredentials);
            }
            (user, "user_login")
        }
        None => {
            let password_hash = hash_password(&password)?;
            (repo.insert_user(&email, &password_hash).await?, "user_register")
        }
    };

    if let Err(err) = log_audit(
        repo,
        Some(user.id),
        action,
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(LoginResponse::accepted(user.email))
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}
