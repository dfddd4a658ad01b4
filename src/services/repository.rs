use std::sync::Arc;
use serde::Deserialize;
use tracing::{info, warn};
use crate::domain::clone_url::HostedProvider;
use crate::domain::entities::{Repository, RepositorySettings};
use crate::domain::value_objects::{Host, Scm, Slug};
use crate::infrastructure::keys::public_key_fingerprint;
use crate::ports::keys::KeyProvisioner;
use crate::ports::repository::RepositoryPort;
use crate::shared::config::Config;
use crate::shared::error::RepoError;
use crate::shared::result::Result;

/// 注册仓库的请求
#[derive(Debug, Clone, Deserialize)]
pub struct NewRepository {
    pub host: Host,
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    /// 托管平台的仓库固定为 git，只接受省略或 git
    pub scm: Option<Scm>,
    /// 只用于没有模板的主机，且为必填
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub team_id: i64,
}

/// 仓库注册服务
pub struct RepositoryService {
    config: Arc<Config>,
    repository_store: Arc<dyn RepositoryPort>,
    keys: Arc<dyn KeyProvisioner>,
}

impl RepositoryService {
    pub fn new(
        config: Arc<Config>,
        repository_store: Arc<dyn RepositoryPort>,
        keys: Arc<dyn KeyProvisioner>,
    ) -> Self {
        Self {
            config,
            repository_store,
            keys,
        }
    }

    /// 按主机选择构造方式并生成密钥，不访问存储
    ///
    /// 有模板的主机只走模板，不接受 url 和 git 以外的 scm。
    pub fn build(&self, request: NewRepository) -> Result<Repository> {
        validate_path_segment("owner", &request.owner)?;
        validate_path_segment("name", &request.name)?;

        let keys = self.keys.as_ref();
        let mut repo = match (HostedProvider::from_host(request.host), request.url) {
            (Some(_), Some(_)) => {
                return Err(RepoError::Parse(format!(
                    "host {} derives its clone url; url must not be supplied",
                    request.host
                )))
            }
            (Some(provider), None) => {
                if let Some(scm) = request.scm.as_ref().filter(|scm| **scm != Scm::Git) {
                    return Err(RepoError::Parse(format!(
                        "host {} only supports git, got {}",
                        request.host, scm
                    )));
                }
                Repository::hosted(provider, request.owner, request.name, request.private, keys)?
            }
            (None, Some(url)) => {
                let scm = request.scm.unwrap_or(Scm::Git);
                let mut repo =
                    Repository::new(request.host, request.owner, request.name, scm, url, keys)?;
                repo.private = request.private;
                repo
            }
            (None, None) => return Err(RepoError::MissingCloneUrl(request.host.to_string())),
        };

        match (request.username, request.password) {
            (Some(username), Some(password)) => repo = repo.with_credentials(username, password),
            (None, None) => {}
            _ => {
                return Err(RepoError::Parse(
                    "username and password must be supplied together".to_string(),
                ))
            }
        }

        repo.timeout = self.config.build.default_timeout_secs;
        repo.priveleged = self.config.build.default_privileged;
        Ok(repo.with_owners(request.user_id, request.team_id))
    }

    /// 注册新仓库并持久化
    ///
    /// RSA 生成是 CPU 密集操作，放到阻塞线程池执行。
    pub async fn register(self: &Arc<Self>, request: NewRepository) -> Result<Repository> {
        let slug = Slug::new(request.host.as_str(), &request.owner, &request.name);
        if self.repository_store.find_by_slug(slug.as_str()).await?.is_some() {
            return Err(RepoError::RepositoryExists(slug.to_string()));
        }

        let service = Arc::clone(self);
        let repo = tokio::task::spawn_blocking(move || service.build(request))
            .await
            .map_err(|e| RepoError::Internal(format!("Key generation task failed: {}", e)))?
            .inspect_err(|e| warn!("Failed to provision repository {}: {}", slug, e))?;

        let id = self.repository_store.insert(&repo).await?;
        // 以存储中的形式返回，时间戳精度与之后的读取一致
        let repo = self
            .repository_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::RepositoryNotFound(id.to_string()))?;

        info!(
            "Registered repository {} ({}), key {}",
            repo.slug,
            repo.url,
            public_key_fingerprint(&repo.public_key).unwrap_or_default()
        );
        Ok(repo)
    }

    pub async fn list(&self) -> Result<Vec<Repository>> {
        self.repository_store.list_all().await
    }

    pub async fn get(&self, slug: &str) -> Result<Repository> {
        self.repository_store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| RepoError::RepositoryNotFound(slug.to_string()))
    }

    pub async fn update(&self, slug: &str, settings: RepositorySettings) -> Result<Repository> {
        let repo = self.get(slug).await?;
        self.repository_store.update_settings(repo.id, settings).await
    }

    pub async fn remove(&self, slug: &str) -> Result<()> {
        let repo = self.get(slug).await?;
        self.repository_store.delete(repo.id).await?;
        info!("Removed repository {}", slug);
        Ok(())
    }
}

/// owner 和 name 不能为空，也不能包含 `/`，否则 slug 会产生歧义
fn validate_path_segment(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RepoError::Parse(format!("{} must not be empty", field)));
    }
    if value.contains('/') {
        return Err(RepoError::Parse(format!("{} must not contain '/': {}", field, value)));
    }
    Ok(())
}
