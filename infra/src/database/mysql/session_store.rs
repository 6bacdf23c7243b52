//! MySQL store for sign-in sessions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use ambry_core::domain::entities::session::SignInSession;
use ambry_core::errors::{DomainError, DomainResult, RepositoryError};
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::session::SessionFilter;

use super::{col, map_sqlx_error, parse_uuid};

/// Session persistence over the `signin_sessions` table
pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &MySqlRow) -> DomainResult<SignInSession> {
        let id: String = col(row, "id")?;
        let user_id: String = col(row, "user_id")?;
        Ok(SignInSession {
            id: parse_uuid(&id, "id")?,
            user_id: parse_uuid(&user_id, "user_id")?,
            ip: col(row, "ip")?,
            user_agent: col(row, "user_agent")?,
            client_token: col(row, "client_token")?,
            expires_at: col(row, "expires_at")?,
            created_at: col(row, "created_at")?,
            updated_at: col(row, "updated_at")?,
            deleted_at: col(row, "deleted_at")?,
        })
    }

    fn select_with_filter(filter: &SessionFilter) -> QueryBuilder<'static, MySql> {
        let mut qb = QueryBuilder::new("SELECT * FROM signin_sessions WHERE 1=1");
        if !filter.include_deleted {
            qb.push(" AND deleted_at IS NULL");
        }
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if filter.active_only {
            qb.push(" AND deleted_at IS NULL AND expires_at > ")
                .push_bind(Utc::now());
        }
        qb.push(" ORDER BY created_at ASC");
        qb
    }
}

#[async_trait]
impl EntityStore<SignInSession> for MySqlSessionStore {
    async fn insert(&self, session: SignInSession) -> DomainResult<SignInSession> {
        sqlx::query(
            r#"
            INSERT INTO signin_sessions (
                id, user_id, ip, user_agent, client_token,
                expires_at, created_at, updated_at, deleted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.ip)
        .bind(&session.user_agent)
        .bind(&session.client_token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.updated_at)
        .bind(session.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(session)
    }

    async fn fetch(&self, id: &Uuid) -> DomainResult<Option<SignInSession>> {
        let row = sqlx::query("SELECT * FROM signin_sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn fetch_first(&self, filter: &SessionFilter) -> DomainResult<Option<SignInSession>> {
        let mut qb = Self::select_with_filter(filter);
        qb.push(" LIMIT 1");
        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn fetch_many(
        &self,
        filter: &SessionFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<SignInSession>> {
        let mut qb = Self::select_with_filter(filter);
        match (limit, skip) {
            (Some(limit), skip) => {
                qb.push(format_args!(" LIMIT {limit} OFFSET {skip}"));
            }
            (None, 0) => {}
            (None, skip) => {
                // MySQL has no OFFSET without LIMIT
                qb.push(format_args!(" LIMIT 18446744073709551615 OFFSET {skip}"));
            }
        }
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_session).collect()
    }

    async fn persist(&self, session: SignInSession) -> DomainResult<SignInSession> {
        let result = sqlx::query(
            r#"
            UPDATE signin_sessions SET
                ip = ?, user_agent = ?, client_token = ?,
                expires_at = ?, updated_at = ?, deleted_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&session.ip)
        .bind(&session.user_agent)
        .bind(&session.client_token)
        .bind(session.expires_at)
        .bind(session.updated_at)
        .bind(session.deleted_at)
        .bind(session.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Repository(RepositoryError::Unknown {
                message: format!("no session row with id {} to persist", session.id),
            }));
        }
        Ok(session)
    }

    async fn remove(&self, id: &Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM signin_sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn current_timestamp(&self) -> DomainResult<DateTime<Utc>> {
        super::db_now(&self.pool).await
    }
}
