//! Member registration and login.

use actix_web::{HttpResponse, web};

use photogram_core::DomainError;
use photogram_core::domain::Member;
use photogram_shared::ApiResponse;
use photogram_shared::dto::{AuthResponse, LoginRequest, MemberResponse, RegisterMemberRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn issue_token(state: &AppState, member: &Member) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(member.id, &member.name, vec!["member".to_string()])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterMemberRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let name = req.name.trim().to_string();

    Member::validate_name(&name)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if state.members.find_by_name(&name).await?.is_some() {
        let taken = format!("Name '{}' is already registered", name);
        return Err(DomainError::Duplicate(taken).into());
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let member = state.members.save(Member::new(name, password_hash)).await?;
    tracing::info!(member_id = %member.id, "Member registered");

    Ok(HttpResponse::Created().json(issue_token(&state, &member)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let member = state
        .members
        .find_by_name(req.name.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &member.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(member_id = %member.id, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &member)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let member = state
        .members
        .find_by_id(identity.member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {}", identity.member_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MemberResponse {
        id: member.id,
        name: member.name,
    })))
}
