use actix_web::cookie::{time, Cookie};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use crate::application::ports::in_ports::{
    AuthenticationUseCase, DormancyUseCase, EntryManagementUseCase, PasswordResetUseCase,
    ProfileUseCase, RegistrationUseCase,
};
use crate::domain::entities::entry::EntryForm;
use crate::domain::entities::user::{
    Credentials, KinResetRequestForm, ProfileForm, RegistrationForm, ResetPasswordForm,
    ResetRequestForm, Session,
};
use crate::error::DiaryError;

pub const SESSION_COOKIE: &str = "ediary_session";

/// AppState containing our application services.
pub struct AppState<A, E>
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    pub accounts: Arc<A>,
    pub entries: Arc<E>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub kin_email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub kin_email: String,
}

#[derive(Deserialize)]
pub struct EntryRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct KinResetRequest {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub kin_email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn session_of<A: AuthenticationUseCase>(req: &HttpRequest, accounts: &A) -> Option<Session> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    accounts.session_from_token(cookie.value())
}

/// Maps domain failures onto HTTP responses. Validation failures come back
/// attached to their fields; authentication failures stay deliberately
/// vague.
fn error_response(err: DiaryError) -> HttpResponse {
    match err {
        DiaryError::Validation(errors) => {
            let errors: Vec<_> = errors
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "field": e.field,
                        "message": e.kind.to_string(),
                    })
                })
                .collect();
            HttpResponse::BadRequest().json(serde_json::json!({ "errors": errors }))
        }
        DiaryError::AuthenticationFailed => HttpResponse::Unauthorized().json(serde_json::json!({
            "error": DiaryError::AuthenticationFailed.to_string()
        })),
        DiaryError::InvalidToken => HttpResponse::BadRequest().json(serde_json::json!({
            "error": DiaryError::InvalidToken.to_string(),
            "reset_request": "/reset_password",
        })),
        DiaryError::AlreadyAuthenticated => HttpResponse::Conflict().json(serde_json::json!({
            "error": DiaryError::AlreadyAuthenticated.to_string()
        })),
        DiaryError::Notification(reason) => {
            error!(%reason, "notification dispatch failed");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Could not send email, please try again later"
            }))
        }
        DiaryError::Repository(e) => {
            error!(error = %e, "repository failure");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

fn unauthorized() -> HttpResponse {
    error_response(DiaryError::AuthenticationFailed)
}

/// Home: run the dormancy sweep over all accounts, then list the current
/// user's entries if a session was presented.
pub async fn home<A, E>(req: HttpRequest, data: web::Data<AppState<A, E>>) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    if let Err(e) = data.accounts.check_dormancy(Utc::now()).await {
        // The sweep failing must not take the home page down with it.
        warn!(error = %e, "dormancy sweep failed");
    }

    match session_of(&req, &*data.accounts) {
        Some(session) => match data.entries.list_entries(&session).await {
            Ok(entries) => HttpResponse::Ok().json(serde_json::json!({ "entries": entries })),
            Err(e) => error_response(e),
        },
        None => HttpResponse::Ok().json(serde_json::json!({ "entries": [] })),
    }
}

pub async fn entry_info() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "page": "entries",
        "detail": "Diary entries are private to their author and listed newest first."
    }))
}

pub async fn contact() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "page": "contact",
        "detail": "Reach the E-Diary team at the configured sender address."
    }))
}

pub async fn register<A, E>(
    data: web::Data<AppState<A, E>>,
    body: web::Json<RegisterRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let body = body.into_inner();
    let form = RegistrationForm {
        firstname: body.firstname,
        lastname: body.lastname,
        username: body.username,
        dob: body.dob,
        email: body.email,
        kin_email: body.kin_email,
        password: body.password,
        confirm_password: body.confirm_password,
    };

    match data.accounts.register(form).await {
        Ok(user) => HttpResponse::Created().json(serde_json::json!({
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "message": format!(
                "Account created for {} {}! You may please login",
                user.firstname, user.lastname
            ),
        })),
        Err(e) => error_response(e),
    }
}

pub async fn login<A, E>(
    data: web::Data<AppState<A, E>>,
    query: web::Query<NextQuery>,
    body: web::Json<LoginRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let body = body.into_inner();
    let credentials = Credentials {
        email: body.email,
        password: body.password,
        remember: body.remember,
    };

    match data
        .accounts
        .login(credentials, query.into_inner().next)
        .await
    {
        Ok(outcome) => {
            let max_age = (outcome.token.expires_at - Utc::now()).num_seconds();
            let cookie = Cookie::build(SESSION_COOKIE, outcome.token.token.clone())
                .path("/")
                .http_only(true)
                .max_age(time::Duration::seconds(max_age))
                .finish();

            HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
                "token": outcome.token.token,
                "expires_at": outcome.token.expires_at,
                "redirect_to": outcome.redirect_to.unwrap_or_else(|| "/home".to_string()),
            }))
        }
        Err(e) => error_response(e),
    }
}

pub async fn logout() -> impl Responder {
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    HttpResponse::Ok()
        .cookie(removal)
        .json(serde_json::json!({ "message": "You have been logged out" }))
}

pub async fn new_entry<A, E>(
    req: HttpRequest,
    data: web::Data<AppState<A, E>>,
    body: web::Json<EntryRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let session = match session_of(&req, &*data.accounts) {
        Some(session) => session,
        None => return unauthorized(),
    };

    let body = body.into_inner();
    let form = EntryForm {
        title: body.title,
        content: body.content,
    };

    match data.entries.create_entry(&session, form).await {
        Ok(entry) => HttpResponse::Created().json(entry),
        Err(e) => error_response(e),
    }
}

pub async fn account<A, E>(req: HttpRequest, data: web::Data<AppState<A, E>>) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let session = match session_of(&req, &*data.accounts) {
        Some(session) => session,
        None => return unauthorized(),
    };

    match data.accounts.profile(&session).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(e),
    }
}

pub async fn update_account<A, E>(
    req: HttpRequest,
    data: web::Data<AppState<A, E>>,
    body: web::Json<ProfileRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let session = match session_of(&req, &*data.accounts) {
        Some(session) => session,
        None => return unauthorized(),
    };

    let body = body.into_inner();
    let form = ProfileForm {
        username: body.username,
        kin_email: body.kin_email,
    };

    match data.accounts.update_profile(&session, form).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "username": user.username,
            "kin_email": user.kin_email,
            "message": "Your details have been updated",
        })),
        Err(e) => error_response(e),
    }
}

pub async fn request_reset<A, E>(
    data: web::Data<AppState<A, E>>,
    body: web::Json<ResetRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let form = ResetRequestForm {
        email: body.into_inner().email,
    };

    match data.accounts.request_password_reset(form).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "An email has been sent with instructions to reset your password"
        })),
        Err(e) => error_response(e),
    }
}

pub async fn request_kin_reset<A, E>(
    data: web::Data<AppState<A, E>>,
    body: web::Json<KinResetRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let body = body.into_inner();
    let form = KinResetRequestForm {
        user_email: body.user_email,
        kin_email: body.kin_email,
    };

    match data.accounts.request_kin_password_reset(form).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "An email has been sent to the kin address with instructions to reset the password"
        })),
        Err(e) => error_response(e),
    }
}

pub async fn reset_password<A, E>(
    req: HttpRequest,
    data: web::Data<AppState<A, E>>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
) -> impl Responder
where
    A: RegistrationUseCase
        + AuthenticationUseCase
        + ProfileUseCase
        + PasswordResetUseCase
        + DormancyUseCase,
    E: EntryManagementUseCase,
{
    let session = session_of(&req, &*data.accounts);
    let token = path.into_inner();
    let body = body.into_inner();
    let form = ResetPasswordForm {
        password: body.password,
        confirm_password: body.confirm_password,
    };

    match data
        .accounts
        .reset_password(&token, form, session.as_ref())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Password reset successful, you may login now"
        })),
        Err(e) => error_response(e),
    }
}
