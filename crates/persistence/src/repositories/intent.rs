//! Intent repository for database operations.

use domain::models::{Intent, IntentExample, IntentWithExamples};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{IntentEntity, IntentExampleEntity};
use crate::metrics::QueryTimer;

/// Repository for intent and example database operations.
#[derive(Clone)]
pub struct IntentRepository {
    pool: PgPool,
}

impl IntentRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an intent for a tenant.
    pub async fn create(&self, tenant_id: Uuid, name: &str) -> Result<Intent, sqlx::Error> {
        let timer = QueryTimer::new("create_intent");
        let entity = sqlx::query_as::<_, IntentEntity>(
            r#"
            INSERT INTO intents (tenant_id, intent_name)
            VALUES ($1, $2)
            RETURNING id, tenant_id, intent_name, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity.into())
    }

    /// Find an intent by id, scoped to a tenant.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        intent_id: Uuid,
    ) -> Result<Option<Intent>, sqlx::Error> {
        let timer = QueryTimer::new("find_intent_by_id");
        let entity = sqlx::query_as::<_, IntentEntity>(
            r#"
            SELECT id, tenant_id, intent_name, created_at
            FROM intents
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// List a tenant's intents without examples.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Intent>, sqlx::Error> {
        let timer = QueryTimer::new("list_intents");
        let entities = sqlx::query_as::<_, IntentEntity>(
            r#"
            SELECT id, tenant_id, intent_name, created_at
            FROM intents
            WHERE tenant_id = $1
            ORDER BY intent_name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Load a tenant's full training corpus: every intent with its examples.
    ///
    /// This is the classifier's input. One query joins examples in; intents
    /// without examples still appear (with an empty example list) so the
    /// classifier can decide they are untrainable.
    pub async fn load_corpus(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<IntentWithExamples>, sqlx::Error> {
        let timer = QueryTimer::new("load_intent_corpus");
        let rows = sqlx::query_as::<_, CorpusRow>(
            r#"
            SELECT i.intent_name, e.example_text
            FROM intents i
            LEFT JOIN intent_examples e ON e.intent_id = i.id
            WHERE i.tenant_id = $1
            ORDER BY i.intent_name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        let mut corpus: Vec<IntentWithExamples> = Vec::new();
        for row in rows {
            match corpus.last_mut() {
                Some(entry) if entry.name == row.intent_name => {
                    if let Some(text) = row.example_text {
                        entry.examples.push(text);
                    }
                }
                _ => {
                    let examples = row.example_text.map(|t| vec![t]).unwrap_or_default();
                    corpus.push(IntentWithExamples::new(row.intent_name, examples));
                }
            }
        }

        Ok(corpus)
    }

    /// Add an example utterance to an intent.
    pub async fn add_example(
        &self,
        intent_id: Uuid,
        text: &str,
    ) -> Result<IntentExample, sqlx::Error> {
        let timer = QueryTimer::new("add_intent_example");
        let entity = sqlx::query_as::<_, IntentExampleEntity>(
            r#"
            INSERT INTO intent_examples (intent_id, example_text)
            VALUES ($1, $2)
            RETURNING id, intent_id, example_text
            "#,
        )
        .bind(intent_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(entity.into())
    }

    /// List the examples of one intent.
    pub async fn list_examples(&self, intent_id: Uuid) -> Result<Vec<IntentExample>, sqlx::Error> {
        let timer = QueryTimer::new("list_intent_examples");
        let entities = sqlx::query_as::<_, IntentExampleEntity>(
            r#"
            SELECT id, intent_id, example_text
            FROM intent_examples
            WHERE intent_id = $1
            ORDER BY id
            "#,
        )
        .bind(intent_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Delete one example.
    pub async fn delete_example(&self, example_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_intent_example");
        let result = sqlx::query("DELETE FROM intent_examples WHERE id = $1")
            .bind(example_id)
            .execute(&self.pool)
            .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }

    /// Delete an intent. Its examples cascade via foreign key.
    pub async fn delete(&self, tenant_id: Uuid, intent_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_intent");
        let result = sqlx::query("DELETE FROM intents WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(intent_id)
            .execute(&self.pool)
            .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CorpusRow {
    intent_name: String,
    example_text: Option<String>,
}
