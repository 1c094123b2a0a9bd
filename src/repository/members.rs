//! Member domain methods on Repository

use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{stored_time, Repository, MEMBER_COLLECTION};
use crate::{
    error::AppResult,
    models::{member::{CreateMember, Member, MemberFilter}, Role},
    store::StoreError,
};

/// On-disk shape of a member
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "memberID")]
    member_id: i64,
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    joined_date: DateTime<Utc>,
    is_active: bool,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
}

impl From<CreateMember> for MemberDocument {
    fn from(data: CreateMember) -> Self {
        Self {
            id: ObjectId::new(),
            member_id: data.member_id,
            name: data.name,
            email: data.email,
            department: data.department,
            joined_date: stored_time(data.joined_date),
            is_active: data.is_active.unwrap_or(true),
            role: data.role,
            gender: data.gender,
        }
    }
}

impl From<MemberDocument> for Member {
    fn from(doc: MemberDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            member_id: doc.member_id,
            name: doc.name,
            email: doc.email,
            department: doc.department,
            joined_date: doc.joined_date,
            is_active: doc.is_active,
            role: doc.role,
            gender: doc.gender,
        }
    }
}

impl MemberFilter {
    fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(ref role) = self.role {
            filter.insert("role", role.as_str());
        }
        if let Some(since) = self.joined_since {
            filter.insert("joinedDate", doc! { "$gte": bson::DateTime::from_chrono(since) });
        }
        filter
    }
}

impl Repository {
    /// Insert members in order, returning them as stored
    pub async fn members_create(&self, data: Vec<CreateMember>) -> AppResult<Vec<Member>> {
        let records: Vec<MemberDocument> = data.into_iter().map(MemberDocument::from).collect();
        let documents = records
            .iter()
            .map(bson::to_document)
            .collect::<Result<Vec<Document>, _>>()
            .map_err(StoreError::from)?;

        self.store.insert_many(MEMBER_COLLECTION, documents).await?;

        Ok(records.into_iter().map(Member::from).collect())
    }

    /// Find members matching a filter
    pub async fn members_find(&self, filter: &MemberFilter) -> AppResult<Vec<Member>> {
        let documents = self.store.find(MEMBER_COLLECTION, filter.to_document()).await?;
        let members = documents
            .into_iter()
            .map(|d| bson::from_document::<MemberDocument>(d).map(Member::from))
            .collect::<Result<Vec<Member>, _>>()
            .map_err(StoreError::from)?;
        Ok(members)
    }

    /// List all members
    pub async fn members_list(&self) -> AppResult<Vec<Member>> {
        self.members_find(&MemberFilter::default()).await
    }
}
