use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use crate::domain::entities::{Repository, RepositorySettings};
use crate::domain::value_objects::{Host, Scm, Slug};
use crate::ports::repository::RepositoryPort;
use crate::shared::error::RepoError;
use crate::shared::result::Result;

const SELECT_COLUMNS: &str = r#"
    SELECT id, slug, host, owner, name, private, disabled, disabled_pr,
           scm, url, username, password, public_key, private_key, params,
           timeout, priveleged, user_id, team_id, created, updated
    FROM repos
"#;

/// SQLite 仓库仓储实现
pub struct SqliteRepositoryRepository {
    pool: SqlitePool,
}

impl SqliteRepositoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// 构建参数以 bincode 存为 BLOB
fn encode_params(params: &HashMap<String, String>) -> Result<Vec<u8>> {
    Ok(bincode::serialize(params)?)
}

fn decode_params(blob: Option<Vec<u8>>) -> Result<HashMap<String, String>> {
    match blob {
        Some(bytes) if !bytes.is_empty() => Ok(bincode::deserialize(&bytes)?),
        _ => Ok(HashMap::new()),
    }
}

fn timestamp(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| RepoError::Parse(format!("invalid timestamp: {}", ts)))
}

fn row_to_repository(r: &SqliteRow) -> Result<Repository> {
    let host: String = r.get("host");
    let owner: String = r.get("owner");
    let name: String = r.get("name");
    let slug: String = r.get("slug");
    let host: Host = host.parse()?;

    let repo = Repository {
        id: r.get("id"),
        slug: Slug::new(host.as_str(), &owner, &name),
        host,
        owner,
        name,
        private: r.get("private"),
        disabled: r.get("disabled"),
        disabled_pr: r.get("disabled_pr"),
        scm: Scm::from(r.get::<String, _>("scm")),
        url: r.get("url"),
        username: r.get("username"),
        password: r.get("password"),
        public_key: r.get("public_key"),
        private_key: r.get("private_key"),
        params: decode_params(r.get("params"))?,
        timeout: r.get("timeout"),
        priveleged: r.get("priveleged"),
        user_id: r.get("user_id"),
        team_id: r.get("team_id"),
        created: timestamp(r.get("created"))?,
        updated: timestamp(r.get("updated"))?,
    };

    if repo.slug.as_str() != slug {
        return Err(RepoError::Parse(format!(
            "stored slug {} does not match {}",
            slug, repo.slug
        )));
    }

    Ok(repo)
}

#[async_trait]
impl RepositoryPort for SqliteRepositoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Repository>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_repository).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Repository>> {
        let row = sqlx::query(&format!("{} WHERE slug = ?", SELECT_COLUMNS))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_repository).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Repository>> {
        let rows = sqlx::query(&format!("{} ORDER BY slug ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_repository).collect()
    }

    async fn insert(&self, repo: &Repository) -> Result<i64> {
        let params = encode_params(&repo.params)?;

        let result = sqlx::query(
            r#"
            INSERT INTO repos (slug, host, owner, name, private, disabled, disabled_pr,
                               scm, url, username, password, public_key, private_key, params,
                               timeout, priveleged, user_id, team_id, created, updated)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(repo.slug.as_str())
        .bind(repo.host.as_str())
        .bind(&repo.owner)
        .bind(&repo.name)
        .bind(repo.private)
        .bind(repo.disabled)
        .bind(repo.disabled_pr)
        .bind(repo.scm.as_str())
        .bind(&repo.url)
        .bind(&repo.username)
        .bind(&repo.password)
        .bind(&repo.public_key)
        .bind(&repo.private_key)
        .bind(params)
        .bind(repo.timeout)
        .bind(repo.priveleged)
        .bind(repo.user_id)
        .bind(repo.team_id)
        .bind(repo.created.timestamp())
        .bind(repo.updated.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepoError::RepositoryExists(repo.slug.to_string())
            }
            other => RepoError::Sqlx(other),
        })?;

        let id: i64 = result.get("id");
        info!("Stored repository {} with id {}", repo.slug, id);
        Ok(id)
    }

    async fn update_settings(&self, id: i64, settings: RepositorySettings) -> Result<Repository> {
        let mut repo = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::RepositoryNotFound(id.to_string()))?;

        repo.apply_settings(settings);
        let params = encode_params(&repo.params)?;

        sqlx::query(
            r#"
            UPDATE repos
            SET disabled = ?, disabled_pr = ?, timeout = ?, priveleged = ?, params = ?, updated = ?
            WHERE id = ?
            "#,
        )
        .bind(repo.disabled)
        .bind(repo.disabled_pr)
        .bind(repo.timeout)
        .bind(repo.priveleged)
        .bind(params)
        .bind(repo.updated.timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!("Updated settings of repository {}", repo.slug);
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::RepositoryNotFound(id.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM repos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::RepositoryNotFound(id.to_string()));
        }
        Ok(())
    }
}
