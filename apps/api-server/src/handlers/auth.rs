//! Authentication handlers.

use actix_web::{HttpResponse, web};

use bookshelf_core::domain::NewUser;
use bookshelf_core::error::RepoError;
use bookshelf_core::ports::{BaseRepository, UserRepository};
use bookshelf_shared::dto::{IdentityResponse, LoginRequest, LoginResponse, RegisterRequest};
use bookshelf_shared::{DataResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, SERVER_ERROR};
use crate::state::AppState;

const REGISTER_FAILED: &str = "Failed to register user";

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// POST /auth/register
///
/// Username uniqueness is enforced by the store; the constraint violation is
/// what produces the duplicate error.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(username), Some(password), Some(first_name), Some(last_name)) = (
        present(req.username),
        present(req.password),
        present(req.first_name),
        present(req.last_name),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    // CPU-bound; runs on the blocking pool.
    let passwords = state.passwords.clone();
    let password_hash = web::block(move || passwords.hash(&password))
        .await
        .map_err(|e| AppError::internal(REGISTER_FAILED, e))?
        .map_err(|e| AppError::internal(REGISTER_FAILED, e))?;

    let new_user = NewUser {
        username,
        password_hash,
        first_name,
        last_name,
    };

    let user = match state.users.insert(new_user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(detail)) => {
            tracing::debug!("Registration rejected: {}", detail);
            return Err(AppError::Duplicate(
                state.duplicate_username_status,
                "Username already exists".to_string(),
            ));
        }
        Err(e) => return Err(AppError::internal(REGISTER_FAILED, e)),
    };

    tracing::info!(user_id = user.id, "User registered");

    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully")))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(username), Some(password)) = (present(req.username), present(req.password)) else {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let user = state
        .users
        .find_by_username(&username)
        .await
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let passwords = state.passwords.clone();
    let stored_hash = user.password_hash.clone();
    let valid = web::block(move || passwords.verify(&password, &stored_hash))
        .await
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?;

    if !valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let token = state
        .tokens
        .generate_token(&user)
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successfully".to_string(),
        token,
    }))
}

/// GET /auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(DataResponse::new(IdentityResponse {
        id: identity.user_id,
        first_name: identity.first_name,
        last_name: identity.last_name,
        expires_at: identity.expires_at,
    })))
}
