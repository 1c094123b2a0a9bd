//! Member endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        member::{CreateMember, Member},
        Created, Submission,
    },
    AppState,
};

use super::JsonBody;

/// Member list wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MembersResponse {
    pub members: Vec<Member>,
}

/// Create one member or a batch of members
#[utoipa::path(
    post,
    path = "/lms/members",
    tag = "members",
    request_body(content = CreateMember, description = "A member, or an array of members"),
    responses(
        (status = 201, description = "Created member(s)", body = Member),
        (status = 400, description = "Validation or uniqueness failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_members(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> AppResult<(StatusCode, Json<Created<Member>>)> {
    let submission = Submission::<CreateMember>::parse(payload)?;
    let created = state.services.members.create(submission).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List all members
#[utoipa::path(
    get,
    path = "/lms/members",
    tag = "members",
    responses(
        (status = 200, description = "All members", body = MembersResponse),
        (status = 500, description = "Store failure", body = crate::error::FailureResponse)
    )
)]
pub async fn list_members(State(state): State<AppState>) -> AppResult<Json<MembersResponse>> {
    let members = state.services.members.list().await?;
    Ok(Json(MembersResponse { members }))
}

/// List members who joined in the last 60 days
#[utoipa::path(
    get,
    path = "/lms/members/recent",
    tag = "members",
    responses(
        (status = 200, description = "Recent members", body = MembersResponse),
        (status = 500, description = "Store failure", body = crate::error::FailureResponse)
    )
)]
pub async fn list_recent_members(State(state): State<AppState>) -> AppResult<Json<MembersResponse>> {
    let members = state.services.members.recent().await?;
    Ok(Json(MembersResponse { members }))
}

/// List members with a given role
#[utoipa::path(
    get,
    path = "/lms/members/role/{role}",
    tag = "members",
    params(("role" = String, Path, description = "student or faculty")),
    responses(
        (status = 200, description = "Members with the role", body = MembersResponse),
        (status = 500, description = "Store failure", body = crate::error::FailureResponse)
    )
)]
pub async fn list_members_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<Json<MembersResponse>> {
    let members = state.services.members.by_role(&role).await?;
    Ok(Json(MembersResponse { members }))
}
