//! # Document Repository
//!
//! Key-value documents grouped into collections.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    collection → document → fields                       │
//! │                                                                         │
//! │  shops                                                                  │
//! │  ├── "Corner Store"                                                     │
//! │  │     ├── "012345678905" = {"itemName": "Milk 1L", "itemPrice": "1.2"}│
//! │  │     └── "4006381333931" = {"itemName": "Pen", "itemPrice": "0.99"}  │
//! │  └── "Kiosk"                                                            │
//! │                                                                         │
//! │  users                                                                  │
//! │  └── "<uid>"                                                            │
//! │        ├── "email"    = "owner@example.com"                             │
//! │        └── "shopName" = "Corner Store"                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are merges: upserting one field never touches its siblings, and
//! writing into a missing document creates it.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pricepal_core::SHOPS_COLLECTION;

/// A document's fields, keyed by field name.
pub type Document = Map<String, Value>;

#[derive(Debug, sqlx::FromRow)]
struct FieldRow {
    field: String,
    value: String,
}

/// Repository for document operations.
///
/// ## Usage
/// ```rust,ignore
/// let docs = db.documents();
///
/// docs.upsert_field("shops", "Corner Store", "012345678905", &record.to_value()).await?;
/// let shop = docs.fetch("shops", "Corner Store").await?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Lists the document keys of a collection.
    pub async fn list_keys(&self, collection: &str) -> DbResult<Vec<String>> {
        debug!(collection = %collection, "Listing document keys");

        let keys: Vec<String> =
            sqlx::query_scalar("SELECT key FROM documents WHERE collection = ?1 ORDER BY key")
                .bind(collection)
                .fetch_all(&self.pool)
                .await?;

        Ok(keys)
    }

    /// Names of every shop.
    pub async fn shop_names(&self) -> DbResult<Vec<String>> {
        self.list_keys(SHOPS_COLLECTION).await
    }

    /// Checks whether a document exists.
    pub async fn exists(&self, collection: &str, key: &str) -> DbResult<bool> {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT key FROM documents WHERE collection = ?1 AND key = ?2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Fetches a document by key.
    ///
    /// ## Returns
    /// * `Ok(Some(fields))` - Document exists (possibly with no fields)
    /// * `Ok(None)` - No such document
    pub async fn fetch(&self, collection: &str, key: &str) -> DbResult<Option<Document>> {
        debug!(collection = %collection, key = %key, "Fetching document");

        if !self.exists(collection, key).await? {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, FieldRow>(
            r#"
            SELECT field, value
            FROM document_fields
            WHERE collection = ?1 AND key = ?2
            ORDER BY field
            "#,
        )
        .bind(collection)
        .bind(key)
        .fetch_all(&self.pool)
        .await?;

        let mut document = Document::new();
        for row in rows {
            let value = serde_json::from_str(&row.value).map_err(|e| DbError::InvalidValue {
                collection: collection.to_string(),
                key: key.to_string(),
                field: row.field.clone(),
                reason: e.to_string(),
            })?;
            document.insert(row.field, value);
        }

        Ok(Some(document))
    }

    /// Sets one field, creating the document if missing.
    pub async fn upsert_field(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> DbResult<()> {
        debug!(collection = %collection, key = %key, field = %field, "Upserting field");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        touch_document(&mut tx, collection, key, now).await?;
        write_field(&mut tx, collection, key, field, value, now).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Merges several fields into a document in one transaction.
    pub async fn set_fields(&self, collection: &str, key: &str, fields: &Document) -> DbResult<()> {
        debug!(
            collection = %collection,
            key = %key,
            count = fields.len(),
            "Merging fields"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        touch_document(&mut tx, collection, key, now).await?;
        for (field, value) in fields {
            write_field(&mut tx, collection, key, field, value, now).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes one field of an existing document.
    ///
    /// ## Returns
    /// * `Ok(true)` - Field removed
    /// * `Ok(false)` - Document exists but had no such field
    /// * `Err(DbError::NotFound)` - No such document
    pub async fn delete_field(&self, collection: &str, key: &str, field: &str) -> DbResult<bool> {
        debug!(collection = %collection, key = %key, field = %field, "Deleting field");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            "UPDATE documents SET updated_at = ?3 WHERE collection = ?1 AND key = ?2",
        )
        .bind(collection)
        .bind(key)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Document",
                format!("{}/{}", collection, key),
            ));
        }

        let result = sqlx::query(
            "DELETE FROM document_fields WHERE collection = ?1 AND key = ?2 AND field = ?3",
        )
        .bind(collection)
        .bind(key)
        .bind(field)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Inserts the document row, or bumps its `updated_at`.
async fn touch_document(
    conn: &mut SqliteConnection,
    collection: &str,
    key: &str,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO documents (collection, key, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        ON CONFLICT (collection, key) DO UPDATE SET updated_at = excluded.updated_at
        "#,
    )
    .bind(collection)
    .bind(key)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}

async fn write_field(
    conn: &mut SqliteConnection,
    collection: &str,
    key: &str,
    field: &str,
    value: &Value,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO document_fields (collection, key, field, value, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (collection, key, field) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(collection)
    .bind(key)
    .bind(field)
    .bind(value.to_string())
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
