use serde::{Deserialize, Serialize};
use crate::domain::entities::Repository;
use crate::infrastructure::keys::public_key_fingerprint;

/// 仓库 DTO
///
/// 对外形式：不包含 username、password、private_key 和 params。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDto {
    pub id: i64,
    pub slug: String,
    pub host: String,
    pub owner: String,
    pub name: String,
    pub private: bool,
    pub disabled: bool,
    pub disabled_pr: bool,
    pub scm: String,
    pub url: String,
    pub default_branch: String,
    pub public_key: String,
    pub key_fingerprint: Option<String>,
    pub timeout: i64,
    pub priveleged: bool,
    pub user_id: i64,
    pub team_id: i64,
    pub created: String,
    pub updated: String,
}

impl From<Repository> for RepositoryDto {
    fn from(repo: Repository) -> Self {
        Self {
            id: repo.id,
            default_branch: repo.default_branch().to_string(),
            key_fingerprint: public_key_fingerprint(&repo.public_key),
            slug: repo.slug.to_string(),
            host: repo.host.to_string(),
            owner: repo.owner,
            name: repo.name,
            private: repo.private,
            disabled: repo.disabled,
            disabled_pr: repo.disabled_pr,
            scm: repo.scm.into(),
            url: repo.url,
            public_key: repo.public_key,
            timeout: repo.timeout,
            priveleged: repo.priveleged,
            user_id: repo.user_id,
            team_id: repo.team_id,
            created: repo.created.to_rfc3339(),
            updated: repo.updated.to_rfc3339(),
        }
    }
}
