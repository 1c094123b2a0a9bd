//! Member service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{CreateMember, Member, MemberFilter},
        Created, Submission,
    },
    repository::Repository,
    store::StoreError,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Persist one member or a validated batch, in order
    pub async fn create(&self, submission: Submission<CreateMember>) -> AppResult<Created<Member>> {
        let batch = submission.is_batch();
        let members = self.repository.members_create(submission.into_records()).await?;
        tracing::info!(count = members.len(), batch, "Members created");

        Created::shaped(batch, members)
            .ok_or_else(|| AppError::Store(StoreError::Backend("no member was stored".to_string())))
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.repository.members_list().await
    }

    /// Members who joined in the last 60 days
    pub async fn recent(&self) -> AppResult<Vec<Member>> {
        self.repository.members_find(&MemberFilter::recent(Utc::now())).await
    }

    pub async fn by_role(&self, role: &str) -> AppResult<Vec<Member>> {
        self.repository.members_find(&MemberFilter::role(role)).await
    }
}
