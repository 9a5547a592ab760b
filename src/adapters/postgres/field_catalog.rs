//! PostgreSQL implementation of FieldCatalogReader.
//!
//! Reads fresh on every call; there is no definition cache, so a field
//! disabled by an admin immediately stops participating in flow
//! computation.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::catalog::{
    BranchingRule, FieldCatalog, FieldDefinition, FieldType, ValidationRule,
};
use crate::domain::foundation::{CampaignId, DomainError};
use crate::ports::FieldCatalogReader;

/// PostgreSQL implementation of FieldCatalogReader.
#[derive(Clone)]
pub struct PostgresFieldCatalog {
    pool: PgPool,
}

impl PostgresFieldCatalog {
    /// Creates a new PostgresFieldCatalog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldCatalogReader for PostgresFieldCatalog {
    async fn load_catalog(&self, campaign_id: &CampaignId) -> Result<FieldCatalog, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT field_key, label, field_type, placeholder, description,
                   options, is_required, is_enabled, sort_order, step_number,
                   validation_rules, branching_rules
            FROM field_definitions
            WHERE campaign_id = $1 AND is_enabled = TRUE
            ORDER BY step_number, sort_order
            "#,
        )
        .bind(campaign_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to fetch field definitions: {}", e))
        })?;

        let definitions: Result<Vec<FieldDefinition>, DomainError> =
            rows.into_iter().map(row_to_definition).collect();

        Ok(FieldCatalog::new(definitions?))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column_err(name: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to read column '{}': {}", name, e))
}

/// Parses a stored JSONB rule list, degrading malformed entries to an empty
/// list with a warning instead of failing the whole catalog load.
fn lenient_rules<T: serde::de::DeserializeOwned>(
    field_key: &str,
    column: &str,
    value: Option<serde_json::Value>,
) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    match serde_json::from_value(value) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(
                field_key,
                column,
                error = %e,
                "malformed stored rules, ignoring"
            );
            Vec::new()
        }
    }
}

fn row_to_definition(row: sqlx::postgres::PgRow) -> Result<FieldDefinition, DomainError> {
    let field_key: String = row.try_get("field_key").map_err(|e| column_err("field_key", e))?;
    let label: String = row.try_get("label").map_err(|e| column_err("label", e))?;
    let field_type: String = row
        .try_get("field_type")
        .map_err(|e| column_err("field_type", e))?;
    let placeholder: Option<String> = row
        .try_get("placeholder")
        .map_err(|e| column_err("placeholder", e))?;
    let description: Option<String> = row
        .try_get("description")
        .map_err(|e| column_err("description", e))?;
    let options: Option<serde_json::Value> =
        row.try_get("options").map_err(|e| column_err("options", e))?;
    let is_required: bool = row
        .try_get("is_required")
        .map_err(|e| column_err("is_required", e))?;
    let is_enabled: bool = row
        .try_get("is_enabled")
        .map_err(|e| column_err("is_enabled", e))?;
    let sort_order: i32 = row
        .try_get("sort_order")
        .map_err(|e| column_err("sort_order", e))?;
    let step_number: i32 = row
        .try_get("step_number")
        .map_err(|e| column_err("step_number", e))?;
    let validation_rules: Option<serde_json::Value> = row
        .try_get("validation_rules")
        .map_err(|e| column_err("validation_rules", e))?;
    let branching_rules: Option<serde_json::Value> = row
        .try_get("branching_rules")
        .map_err(|e| column_err("branching_rules", e))?;

    let validation_rules: Vec<ValidationRule> =
        lenient_rules(&field_key, "validation_rules", validation_rules);
    let branching_rules: Vec<BranchingRule> =
        lenient_rules(&field_key, "branching_rules", branching_rules);
    let options: Vec<String> = lenient_rules(&field_key, "options", options);

    Ok(FieldDefinition {
        field_type: FieldType::parse_lenient(&field_type),
        field_key,
        label,
        placeholder,
        description,
        options,
        is_required,
        is_enabled,
        sort_order,
        step_number,
        validation_rules,
        branching_rules,
    })
}
