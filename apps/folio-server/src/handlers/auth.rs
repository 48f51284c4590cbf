//! Authentication handlers.

use actix_web::{HttpResponse, web};

use folio_shared::dto::{LoginRequest, LoginResponse, MessageResponse, SessionResponse};

use crate::middleware::auth::{OptionalIdentity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let gate = state.auth.clone();

    // Password hashing is CPU-bound
    let token = web::block(move || gate.login(&req.username, &req.password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let cookie = session_cookie(
        token,
        state.auth.token_lifetime_seconds(),
        state.cookie_secure,
    );

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
    }))
}

/// POST /api/auth/logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie(state.cookie_secure))
        .json(MessageResponse::new("Logged out"))
}

/// GET /api/auth/me
pub async fn me(identity: OptionalIdentity) -> HttpResponse {
    let response = match identity.0 {
        Some(identity) => SessionResponse {
            authenticated: true,
            username: Some(identity.username),
            expires_at: Some(identity.expires_at),
        },
        None => SessionResponse {
            authenticated: false,
            username: None,
            expires_at: None,
        },
    };

    HttpResponse::Ok().json(response)
}
