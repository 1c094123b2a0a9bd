//! Member model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Role;

/// How far back `GET /lms/members/recent` looks
pub const RECENT_WINDOW_DAYS: i64 = 60;

/// Stored member record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Store identity (hex ObjectId)
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "memberID")]
    pub member_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub joined_date: DateTime<Utc>,
    pub is_active: bool,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Create member request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMember {
    /// Unique member number
    #[serde(rename = "memberID")]
    pub member_id: i64,
    #[validate(length(min = 5, message = "Name must be at least 5 characters"))]
    pub name: String,
    /// Unique email address
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    pub department: Option<String>,
    /// Defaults to the creation time
    pub joined_date: Option<DateTime<Utc>>,
    /// Defaults to true
    pub is_active: Option<bool>,
    pub role: Role,
    pub gender: Option<String>,
}

/// Member selection criteria; unset fields do not constrain
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemberFilter {
    pub role: Option<String>,
    pub joined_since: Option<DateTime<Utc>>,
}

impl MemberFilter {
    /// Members who joined within the last [`RECENT_WINDOW_DAYS`] of `now`
    pub fn recent(now: DateTime<Utc>) -> Self {
        Self {
            joined_since: Some(now - Duration::days(RECENT_WINDOW_DAYS)),
            ..Default::default()
        }
    }

    pub fn role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Default::default()
        }
    }
}
