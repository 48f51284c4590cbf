//! Admin session extractors and cookie helpers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use folio_core::services::AdminSession;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the admin token.
pub const ADMIN_COOKIE: &str = "adminToken";

/// Authenticated admin extractor.
///
/// Use this in handlers to require an admin session:
/// ```ignore
/// async fn protected_route(identity: AdminIdentity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
    pub expires_at: i64,
}

impl From<AdminSession> for AdminIdentity {
    fn from(session: AdminSession) -> Self {
        Self {
            username: session.username,
            expires_at: session.expires_at,
        }
    }
}

fn session_from(req: &HttpRequest) -> Option<AdminSession> {
    let state = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state,
        None => {
            tracing::error!("AppState not found in app data");
            return None;
        }
    };

    let cookie = req.cookie(ADMIN_COOKIE);
    state.auth.authenticate(cookie.as_ref().map(|c| c.value()))
}

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match session_from(req) {
            Some(session) => ready(Ok(AdminIdentity::from(session))),
            None => ready(Err(AppError::Unauthorized("Unauthorized".to_string()))),
        }
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<AdminIdentity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(
            session_from(req).map(AdminIdentity::from),
        )))
    }
}

/// Session cookie holding a freshly issued token.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(ADMIN_COOKIE, token)
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// Cookie that clears the admin session in the browser.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(ADMIN_COOKIE, "")
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}
