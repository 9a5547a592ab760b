//! AnswerRecord and the immutable AnswerSet snapshot.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CampaignId, Timestamp, UserId};

/// One user's stored answer to one field.
///
/// Identity is `(campaign_id, user_id, field_key)`; storage upserts on that
/// key, so at most one record exists per field per user. `is_complete` is
/// the campaign-wide latch flag copied onto every row once the whole flow
/// completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub field_key: String,
    pub raw_value: String,
    pub normalized_value: String,
    pub is_complete: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AnswerRecord {
    /// True when the stored value is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.normalized_value.trim().is_empty()
    }
}

/// A validated answer on its way into storage.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub field_key: String,
    pub raw_value: String,
    pub normalized_value: String,
}

/// Immutable snapshot of one user's answers for one campaign.
///
/// Flow computations take a snapshot and derive from it; they never mutate
/// it. A fresh snapshot is loaded after every write.
#[derive(Debug, Clone, Default)]
pub struct AnswerSet {
    records: Vec<AnswerRecord>,
}

impl AnswerSet {
    /// Wraps loaded records into a snapshot.
    pub fn new(records: Vec<AnswerRecord>) -> Self {
        Self { records }
    }

    /// All records in the snapshot.
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    /// Looks up the record for a field key.
    pub fn get(&self, field_key: &str) -> Option<&AnswerRecord> {
        self.records.iter().find(|r| r.field_key == field_key)
    }

    /// Keys with a non-blank stored value.
    ///
    /// This is a presence check only; it deliberately does not re-run
    /// validation rules against the stored value.
    pub fn answered_keys(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter(|r| !r.is_blank())
            .map(|r| r.field_key.as_str())
            .collect()
    }

    /// Normalized values keyed by field key, for branching evaluation.
    pub fn values(&self) -> HashMap<String, String> {
        self.records
            .iter()
            .map(|r| (r.field_key.clone(), r.normalized_value.clone()))
            .collect()
    }

    /// True if any record carries the campaign-wide completion latch.
    pub fn any_flagged_complete(&self) -> bool {
        self.records.iter().any(|r| r.is_complete)
    }

    /// True when the snapshot holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
