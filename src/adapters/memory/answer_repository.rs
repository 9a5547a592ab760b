//! In-memory AnswerRepository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::flow::{AnswerRecord, NewAnswer};
use crate::domain::foundation::{CampaignId, DomainError, Timestamp, UserId};
use crate::ports::AnswerRepository;

type AnswerKey = (CampaignId, String, String);

/// In-memory answer store with upsert semantics.
#[derive(Default)]
pub struct InMemoryAnswerRepository {
    rows: RwLock<HashMap<AnswerKey, AnswerRecord>>,
}

impl InMemoryAnswerRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored rows, across all users and campaigns.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn key_for(campaign_id: &CampaignId, user_id: &UserId, field_key: &str) -> AnswerKey {
    (
        *campaign_id,
        user_id.as_str().to_string(),
        field_key.to_string(),
    )
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerRepository {
    async fn find_by_user(
        &self,
        campaign_id: &CampaignId,
        user_id: &UserId,
    ) -> Result<Vec<AnswerRecord>, DomainError> {
        let rows = self.rows.read().await;
        let mut records: Vec<AnswerRecord> = rows
            .values()
            .filter(|r| &r.campaign_id == campaign_id && &r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.field_key.cmp(&b.field_key));
        Ok(records)
    }

    async fn upsert(&self, answer: NewAnswer) -> Result<AnswerRecord, DomainError> {
        let mut rows = self.rows.write().await;
        let key = key_for(&answer.campaign_id, &answer.user_id, &answer.field_key);
        let now = Timestamp::now();

        let record = match rows.get(&key) {
            Some(existing) => AnswerRecord {
                raw_value: answer.raw_value,
                normalized_value: answer.normalized_value,
                username: answer.username.or_else(|| existing.username.clone()),
                updated_at: now,
                ..existing.clone()
            },
            None => AnswerRecord {
                campaign_id: answer.campaign_id,
                user_id: answer.user_id,
                username: answer.username,
                field_key: answer.field_key,
                raw_value: answer.raw_value,
                normalized_value: answer.normalized_value,
                is_complete: false,
                created_at: now,
                updated_at: now,
            },
        };

        rows.insert(key, record.clone());
        Ok(record)
    }

    async fn mark_campaign_complete(
        &self,
        campaign_id: &CampaignId,
        user_id: &UserId,
    ) -> Result<u64, DomainError> {
        let mut rows = self.rows.write().await;
        let mut touched = 0;
        for record in rows.values_mut() {
            if &record.campaign_id == campaign_id && &record.user_id == user_id {
                record.is_complete = true;
                touched += 1;
            }
        }
        Ok(touched)
    }
}
