//! MySQL store for user accounts

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use ambry_core::domain::entities::user::User;
use ambry_core::errors::{DomainError, DomainResult, RepositoryError};
use ambry_core::repositories::entity::EntityStore;
use ambry_core::repositories::user::UserFilter;

use super::{col, map_sqlx_error, parse_uuid};

/// User persistence over the `users` table
pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> DomainResult<User> {
        let id: String = col(row, "id")?;
        let locked_by: Option<String> = col(row, "locked_by")?;
        let deleted_by: Option<String> = col(row, "deleted_by")?;
        Ok(User {
            id: parse_uuid(&id, "id")?,
            username: col(row, "username")?,
            nickname: col(row, "nickname")?,
            email: col(row, "email")?,
            email_verified_at: col::<Option<DateTime<Utc>>>(row, "email_verified_at")?,
            email_secret: col(row, "email_secret")?,
            password_hash: col(row, "password_hash")?,
            password_updated_at: col(row, "password_updated_at")?,
            last_signin_at: col(row, "last_signin_at")?,
            signin_fail_count: col::<u32>(row, "signin_fail_count")?,
            signin_failed_at: col(row, "signin_failed_at")?,
            locked_at: col(row, "locked_at")?,
            locked_by: locked_by.as_deref().map(|v| parse_uuid(v, "locked_by")).transpose()?,
            locked_reason: col(row, "locked_reason")?,
            created_at: col(row, "created_at")?,
            updated_at: col(row, "updated_at")?,
            deleted_at: col(row, "deleted_at")?,
            deleted_by: deleted_by.as_deref().map(|v| parse_uuid(v, "deleted_by")).transpose()?,
        })
    }

    fn select_with_filter(filter: &UserFilter) -> QueryBuilder<'static, MySql> {
        let mut qb = QueryBuilder::new("SELECT * FROM users WHERE 1=1");
        if !filter.include_deleted {
            qb.push(" AND deleted_at IS NULL");
        }
        if let Some(username) = &filter.username {
            qb.push(" AND username = ").push_bind(username.clone());
        }
        if let Some(nickname) = &filter.nickname {
            qb.push(" AND nickname = ").push_bind(nickname.clone());
        }
        if let Some(email) = &filter.email {
            qb.push(" AND LOWER(email) = LOWER(").push_bind(email.clone());
            qb.push(")");
        }
        qb.push(" ORDER BY created_at ASC");
        qb
    }
}

#[async_trait]
impl EntityStore<User> for MySqlUserStore {
    async fn insert(&self, user: User) -> DomainResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, nickname, email, email_verified_at, email_secret,
                password_hash, password_updated_at, last_signin_at,
                signin_fail_count, signin_failed_at,
                locked_at, locked_by, locked_reason,
                created_at, updated_at, deleted_at, deleted_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(user.email_verified_at)
        .bind(&user.email_secret)
        .bind(&user.password_hash)
        .bind(user.password_updated_at)
        .bind(user.last_signin_at)
        .bind(user.signin_fail_count)
        .bind(user.signin_failed_at)
        .bind(user.locked_at)
        .bind(user.locked_by.map(|u| u.to_string()))
        .bind(&user.locked_reason)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .bind(user.deleted_by.map(|u| u.to_string()))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(user)
    }

    async fn fetch(&self, id: &Uuid) -> DomainResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn fetch_first(&self, filter: &UserFilter) -> DomainResult<Option<User>> {
        let mut qb = Self::select_with_filter(filter);
        qb.push(" LIMIT 1");
        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn fetch_many(
        &self,
        filter: &UserFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<User>> {
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
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn persist(&self, user: User) -> DomainResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = ?, nickname = ?, email = ?,
                email_verified_at = ?, email_secret = ?,
                password_hash = ?, password_updated_at = ?,
                last_signin_at = ?, signin_fail_count = ?, signin_failed_at = ?,
                locked_at = ?, locked_by = ?, locked_reason = ?,
                updated_at = ?, deleted_at = ?, deleted_by = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(user.email_verified_at)
        .bind(&user.email_secret)
        .bind(&user.password_hash)
        .bind(user.password_updated_at)
        .bind(user.last_signin_at)
        .bind(user.signin_fail_count)
        .bind(user.signin_failed_at)
        .bind(user.locked_at)
        .bind(user.locked_by.map(|u| u.to_string()))
        .bind(&user.locked_reason)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .bind(user.deleted_by.map(|u| u.to_string()))
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Repository(RepositoryError::Unknown {
                message: format!("no user row with id {} to persist", user.id),
            }));
        }
        Ok(user)
    }

    async fn remove(&self, id: &Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
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
