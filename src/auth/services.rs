use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{dto::CredentialsRequest, jwt::JwtKeys, password};
use crate::{errors::AppError, users::repo::UserRepo};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims/lowercases the email and checks presence and shape of both fields.
pub(crate) fn validate_credentials(req: &mut CredentialsRequest) -> Result<(), AppError> {
    req.email = normalize_email(&req.email);
    if req.email.is_empty() {
        return Err(AppError::Validation("email should not be empty".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password should not be empty".into()));
    }
    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    Ok(())
}

pub async fn signup(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    mut req: CredentialsRequest,
) -> Result<String, AppError> {
    validate_credentials(&mut req)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    if users.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = password::hash_blocking(req.password).await?;
    // A concurrent signup that slipped past the lookup still surfaces as 409.
    let user = users.create(&req.email, &hash).await?;

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

pub async fn login(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    mut req: CredentialsRequest,
) -> Result<String, AppError> {
    validate_credentials(&mut req)?;

    let Some(user) = users.find_by_email(&req.email).await? else {
        warn!(email = %req.email, "login unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !password::verify_blocking(req.password, user.password_hash.clone()).await? {
        warn!(email = %req.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_keys, MemoryUserRepo};

    fn creds(email: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("vlad@gmail.com"));
        assert!(!is_valid_email("vlad"));
        assert!(!is_valid_email("vlad@gmail"));
        assert!(!is_valid_email("a b@c.d"));
    }

    #[test]
    fn validation_normalizes_email() {
        let mut req = creds("  Vlad@GMAIL.com ", "x");
        validate_credentials(&mut req).unwrap();
        assert_eq!(req.email, "vlad@gmail.com");
    }

    #[test]
    fn validation_rejects_missing_fields() {
        assert!(matches!(
            validate_credentials(&mut creds("", "secret123")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials(&mut creds("a@b.io", "")),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn signup_then_login() {
        let users = MemoryUserRepo::default();
        let keys = test_keys();

        let token = signup(&users, &keys, creds("Vlad@Gmail.com", "secret123"))
            .await
            .unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.email, "vlad@gmail.com");

        let token = login(&users, &keys, creds("vlad@gmail.com", "secret123"))
            .await
            .unwrap();
        assert_eq!(keys.verify(&token).unwrap().sub, claims.sub);
    }

    #[tokio::test]
    async fn signup_stores_hash_not_password() {
        let users = MemoryUserRepo::default();
        signup(&users, &test_keys(), creds("a@b.io", "secret123"))
            .await
            .unwrap();
        let user = users.find_by_email("a@b.io").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "secret123");
        assert!(password::verify("secret123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_and_short_password() {
        let users = MemoryUserRepo::default();
        let keys = test_keys();
        signup(&users, &keys, creds("a@b.io", "secret123"))
            .await
            .unwrap();

        let dup = signup(&users, &keys, creds("A@B.io", "another123")).await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        let short = signup(&users, &keys, creds("c@d.io", "short")).await;
        assert!(matches!(short, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_wrong_password() {
        let users = MemoryUserRepo::default();
        let keys = test_keys();
        signup(&users, &keys, creds("a@b.io", "secret123"))
            .await
            .unwrap();

        let wrong = login(&users, &keys, creds("a@b.io", "secret124")).await;
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

        let unknown = login(&users, &keys, creds("x@y.io", "secret123")).await;
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
    }
}
