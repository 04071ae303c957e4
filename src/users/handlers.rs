use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{dto::EditUserRequest, repo_types::{User, UserChanges}};
use crate::{
    auth::{
        services::{is_valid_email, normalize_email},
        AuthUser,
    },
    db::DbError,
    errors::AppError,
    extract::ApiJson,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users", patch(edit_user))
}

#[instrument(skip(state, user), fields(user_id = %user.id, email = %user.email))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let found = state.users.find_by_id(user.id).await?;
    match found {
        Some(u) => Ok(Json(u)),
        None => {
            warn!(user_id = %user.id, "token user no longer exists");
            Err(AppError::Unauthorized("User not found".into()))
        }
    }
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id, email = %user.email))]
pub async fn edit_user(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<EditUserRequest>,
) -> Result<Json<User>, AppError> {
    let changes = validate_edit(payload)?;

    let updated = match state.users.update(user.id, &changes).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(AppError::Unauthorized("User not found".into())),
        Err(DbError::UniqueViolation) => {
            warn!(user_id = %user.id, "email already taken");
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %updated.id, "user updated");
    Ok(Json(updated))
}

fn validate_edit(req: EditUserRequest) -> Result<UserChanges, AppError> {
    let email = match req.email {
        Some(raw) => {
            let email = normalize_email(&raw);
            if !is_valid_email(&email) {
                return Err(AppError::Validation("Invalid email".into()));
            }
            Some(email)
        }
        None => None,
    };
    Ok(UserChanges {
        email,
        first_name: req.first_name,
        last_name: req.last_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_normalizes_and_checks_email() {
        let changes = validate_edit(EditUserRequest {
            email: Some(" New@Mail.com".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.email.as_deref(), Some("new@mail.com"));

        let bad = validate_edit(EditUserRequest {
            email: Some("not-an-email".into()),
            ..Default::default()
        });
        assert!(matches!(bad, Err(AppError::Validation(_))));
    }

    #[test]
    fn user_json_hides_hash() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: Some("Vlad".into()),
            last_name: None,
            created_at: time::OffsetDateTime::now_utc(),
            updated_at: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["firstName"], "Vlad");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
