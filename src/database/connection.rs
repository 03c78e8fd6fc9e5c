use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::PgPool as Pool;
use uuid::Uuid;

use crate::models::session::{CodingSession, InterviewSession};
use crate::store::record_store::RecordStore;

pub struct Database {
    pool: Pool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interview_sessions (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                role TEXT NOT NULL,
                company TEXT NOT NULL,
                interview_type TEXT NOT NULL
                    CHECK (interview_type IN ('Technical', 'Behavioral', 'System Design')),
                duration INTEGER NOT NULL CHECK (duration > 0),
                summary TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coding_sessions (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                platform_name TEXT NOT NULL,
                platform_url TEXT NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Both listings filter on owner and sort on created_at
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS interview_sessions_user_created ON interview_sessions (user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS coding_sessions_user_created ON coding_sessions (user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for Database {
    async fn list_interview_sessions(&self, user_id: Uuid) -> Result<Vec<InterviewSession>> {
        let sessions = sqlx::query_as::<_, InterviewSession>(
            "SELECT id, user_id, role, company, interview_type, duration, summary, created_at FROM interview_sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn list_coding_sessions(&self, user_id: Uuid) -> Result<Vec<CodingSession>> {
        let sessions = sqlx::query_as::<_, CodingSession>(
            "SELECT id, user_id, platform_name, platform_url, created_at FROM coding_sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn delete_interview_session(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM interview_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_coding_session(&self, session: &CodingSession) -> Result<()> {
        sqlx::query(
            "INSERT INTO coding_sessions (id, user_id, platform_name, platform_url, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.platform_name)
        .bind(&session.platform_url)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
