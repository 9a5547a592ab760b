//! Answer repository port (write side).
//!
//! Defines the contract for persisting per-user answer rows.
//!
//! # Design
//!
//! - **Upsert identity**: at most one row per `(campaign_id, user_id,
//!   field_key)`; concurrent double submits for the same field are resolved
//!   by the storage layer's unique constraint, not by in-process locking.
//! - **Atomic fan-out**: marking a user's answers complete touches every
//!   row for that user in one statement, so a reader never observes a
//!   mixed complete/incomplete set mid-transition.

use async_trait::async_trait;

use crate::domain::flow::{AnswerRecord, NewAnswer};
use crate::domain::foundation::{CampaignId, DomainError, UserId};

/// Repository port for answer persistence.
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    /// Loads all of a user's answers for a campaign.
    async fn find_by_user(
        &self,
        campaign_id: &CampaignId,
        user_id: &UserId,
    ) -> Result<Vec<AnswerRecord>, DomainError>;

    /// Inserts or replaces the answer for `(campaign_id, user_id,
    /// field_key)`, returning the stored row.
    ///
    /// Last write wins; `updated_at` advances on replacement while
    /// `created_at` keeps the original insert time.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, answer: NewAnswer) -> Result<AnswerRecord, DomainError>;

    /// Sets the completion latch on **all** of the user's answer rows for
    /// the campaign in one atomic update, returning the number of rows
    /// touched.
    async fn mark_campaign_complete(
        &self,
        campaign_id: &CampaignId,
        user_id: &UserId,
    ) -> Result<u64, DomainError>;
}
