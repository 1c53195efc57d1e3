//! # Support Repository
//!
//! Stores help-desk requests. Nothing reads them back through the
//! storefront; they're for the support team's tooling.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use furnish_core::support::{SupportRequest, ValidatedSupport};

#[derive(Debug, Clone)]
pub struct SupportRepository {
    pool: SqlitePool,
}

impl SupportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupportRepository { pool }
    }

    pub async fn create(&self, request: &ValidatedSupport) -> DbResult<SupportRequest> {
        let record = SupportRequest {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            order_number: request.order_number.clone(),
            kind: request.kind,
            subject: request.subject.clone(),
            description: request.description.clone(),
            created_at: Utc::now(),
        };

        debug!(id = %record.id, kind = ?record.kind, "Recording support request");

        sqlx::query(
            r#"
            INSERT INTO support_requests (
                id, name, email, phone, order_number, kind, subject, description, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.order_number)
        .bind(record.kind)
        .bind(&record.subject)
        .bind(&record.description)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SupportRequest>> {
        let request = sqlx::query_as::<_, SupportRequest>(
            r#"
            SELECT id, name, email, phone, order_number, kind, subject, description, created_at
            FROM support_requests
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use furnish_core::support::{SupportKind, SupportRequestForm};

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = test_db().await;
        let form = SupportRequestForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: Some("9876543210".into()),
            order_number: Some("FS123457".into()),
            kind: Some(SupportKind::Order),
            subject: "Late delivery".into(),
            description: "Still waiting on my dining set.".into(),
        };

        let created = db.support().create(&form.validate().unwrap()).await.unwrap();
        let stored = db.support().get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(stored.kind, SupportKind::Order);
        assert_eq!(stored.order_number.as_deref(), Some("FS123457"));
        assert_eq!(stored.phone.as_deref(), Some("9876543210"));
        assert!(db.support().get_by_id("missing").await.unwrap().is_none());
    }
}
