//! PostgreSQL implementation of AnswerRepository.
//!
//! The upsert leans on the table's unique constraint over
//! `(campaign_id, user_id, field_key)`; two near-simultaneous submits for
//! the same field resolve to one row with the later value. The completion
//! latch is one `UPDATE` statement over every row, so readers never observe
//! a mixed complete/incomplete set.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::flow::{AnswerRecord, NewAnswer};
use crate::domain::foundation::{CampaignId, DomainError, Timestamp, UserId, ValidationError};
use crate::ports::AnswerRepository;

/// PostgreSQL implementation of AnswerRepository.
#[derive(Clone)]
pub struct PostgresAnswerRepository {
    pool: PgPool,
}

impl PostgresAnswerRepository {
    /// Creates a new PostgresAnswerRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerRepository for PostgresAnswerRepository {
    async fn find_by_user(
        &self,
        campaign_id: &CampaignId,
        user_id: &UserId,
    ) -> Result<Vec<AnswerRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT campaign_id, user_id, username, field_key, raw_value,
                   normalized_value, is_complete, created_at, updated_at
            FROM onboarding_responses
            WHERE campaign_id = $1 AND user_id = $2
            ORDER BY field_key
            "#,
        )
        .bind(campaign_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch answers: {}", e)))?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn upsert(&self, answer: NewAnswer) -> Result<AnswerRecord, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO onboarding_responses (
                campaign_id, user_id, username, field_key, raw_value,
                normalized_value, is_complete, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW(), NOW())
            ON CONFLICT (campaign_id, user_id, field_key) DO UPDATE SET
                raw_value = EXCLUDED.raw_value,
                normalized_value = EXCLUDED.normalized_value,
                username = COALESCE(EXCLUDED.username, onboarding_responses.username),
                updated_at = NOW()
            RETURNING campaign_id, user_id, username, field_key, raw_value,
                      normalized_value, is_complete, created_at, updated_at
            "#,
        )
        .bind(answer.campaign_id.as_uuid())
        .bind(answer.user_id.as_str())
        .bind(&answer.username)
        .bind(&answer.field_key)
        .bind(&answer.raw_value)
        .bind(&answer.normalized_value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert answer: {}", e)))?;

        row_to_record(row)
    }

    async fn mark_campaign_complete(
        &self,
        campaign_id: &CampaignId,
        user_id: &UserId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE onboarding_responses
            SET is_complete = TRUE, updated_at = NOW()
            WHERE campaign_id = $1 AND user_id = $2
            "#,
        )
        .bind(campaign_id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to mark campaign complete: {}", e))
        })?;

        Ok(result.rows_affected())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column_err(name: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to read column '{}': {}", name, e))
}

fn row_to_record(row: sqlx::postgres::PgRow) -> Result<AnswerRecord, DomainError> {
    let campaign_id: uuid::Uuid = row
        .try_get("campaign_id")
        .map_err(|e| column_err("campaign_id", e))?;
    let user_id: String = row.try_get("user_id").map_err(|e| column_err("user_id", e))?;
    let username: Option<String> = row
        .try_get("username")
        .map_err(|e| column_err("username", e))?;
    let field_key: String = row
        .try_get("field_key")
        .map_err(|e| column_err("field_key", e))?;
    let raw_value: String = row
        .try_get("raw_value")
        .map_err(|e| column_err("raw_value", e))?;
    let normalized_value: String = row
        .try_get("normalized_value")
        .map_err(|e| column_err("normalized_value", e))?;
    let is_complete: bool = row
        .try_get("is_complete")
        .map_err(|e| column_err("is_complete", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| column_err("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_err("updated_at", e))?;

    Ok(AnswerRecord {
        campaign_id: CampaignId::from_uuid(campaign_id),
        user_id: UserId::new(user_id).map_err(|e: ValidationError| {
            DomainError::database(format!("Invalid stored user_id: {}", e))
        })?,
        username,
        field_key,
        raw_value,
        normalized_value,
        is_complete,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
