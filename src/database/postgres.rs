use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{LatestStatus, StatusEvent, UserParticulars};
use crate::database::store::Store;

const PARTICULARS_COLUMNS: &str = "id, elderly_name, elderly_address, caregiver_name, caregiver_phone, \
     caregiver_email, password_hash, role";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_status(&self, event: &StatusEvent) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"INSERT INTO status_events (device_id, status, "timestamp", recorded_at)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&event.device_id)
        .bind(&event.status)
        .bind(&event.timestamp)
        .bind(event.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_particulars_if_absent(
        &self,
        p: &UserParticulars,
    ) -> Result<bool, DatabaseError> {
        let inserted = sqlx::query_scalar::<_, String>(
            "INSERT INTO user_particulars
                 (id, elderly_name, elderly_address, caregiver_name, caregiver_phone,
                  caregiver_email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO NOTHING
             RETURNING id",
        )
        .bind(&p.id)
        .bind(&p.elderly_name)
        .bind(&p.elderly_address)
        .bind(&p.caregiver_name)
        .bind(&p.caregiver_phone)
        .bind(&p.caregiver_email)
        .bind(&p.password_hash)
        .bind(&p.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(inserted.is_some())
    }

    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE user_particulars SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_particulars(&self, id: &str) -> Result<Option<UserParticulars>, DatabaseError> {
        let sql = format!("SELECT {} FROM user_particulars WHERE id = $1", PARTICULARS_COLUMNS);
        let row = sqlx::query_as::<_, UserParticulars>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_particulars_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserParticulars>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM user_particulars WHERE caregiver_email = $1",
            PARTICULARS_COLUMNS
        );
        let row = sqlx::query_as::<_, UserParticulars>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn history(&self, device_id: &str) -> Result<Vec<StatusEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, StatusEvent>(
            r#"SELECT device_id, status, "timestamp", recorded_at
               FROM status_events
               WHERE device_id = $1
               ORDER BY recorded_at DESC, seq DESC"#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn latest_statuses(
        &self,
        device_id: Option<&str>,
    ) -> Result<Vec<LatestStatus>, DatabaseError> {
        // NULL filter means every device
        let rows = sqlx::query_as::<_, LatestStatus>(
            r#"SELECT DISTINCT ON (device_id)
                   device_id, status AS latest_status, "timestamp"
               FROM status_events
               WHERE $1::text IS NULL OR device_id = $1
               ORDER BY device_id, recorded_at DESC, seq DESC"#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
