use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::clone_url::HostedProvider;
use crate::domain::value_objects::{DefaultBranch, Host, Scm, Slug};
use crate::ports::keys::{KeyGenerationError, KeyProvisioner};

/// 仓库实体
///
/// 这是持久化形式，包含凭据；对外的 API 形式见 `RepositoryDto`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,

    /// 规范名称，例如 github.com/octocat/hello-world
    pub slug: Slug,
    pub host: Host,
    pub owner: String,
    pub name: String,

    pub private: bool,
    /// 为 true 时不执行任何构建
    pub disabled: bool,
    /// 为 true 时不为 pull request 执行构建
    pub disabled_pr: bool,

    pub scm: Scm,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,

    /// 注入构建环境 .ssh/id_rsa.pub
    pub public_key: String,
    /// 注入构建环境 .ssh/id_rsa
    pub private_key: String,

    /// 构建时注入的参数
    pub params: HashMap<String, String>,
    /// 构建超时，单位秒
    pub timeout: i64,
    pub priveleged: bool,

    pub user_id: i64,
    pub team_id: i64,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Repository {
    /// 通用构造：计算 slug 并生成密钥对
    ///
    /// 密钥生成失败时不返回任何实体。
    pub fn new(
        host: Host,
        owner: String,
        name: String,
        scm: Scm,
        url: String,
        keys: &dyn KeyProvisioner,
    ) -> Result<Self, KeyGenerationError> {
        let slug = Slug::new(host.as_str(), &owner, &name);
        let key_pair = keys.generate()?;
        let now = Utc::now();

        Ok(Self {
            id: 0, // 将由数据库生成
            slug,
            host,
            owner,
            name,
            private: false,
            disabled: false,
            disabled_pr: false,
            scm,
            url,
            username: None,
            password: None,
            public_key: key_pair.public_key,
            private_key: key_pair.private_key,
            params: HashMap::new(),
            timeout: 0,
            priveleged: false,
            user_id: 0,
            team_id: 0,
            created: now,
            updated: now,
        })
    }

    /// 托管平台构造：按模板生成克隆地址，再交给通用构造
    pub fn hosted(
        provider: HostedProvider,
        owner: String,
        name: String,
        private: bool,
        keys: &dyn KeyProvisioner,
    ) -> Result<Self, KeyGenerationError> {
        let url = provider.template(private).render(&owner, &name);
        let mut repo = Self::new(provider.host(), owner, name, Scm::Git, url, keys)?;
        repo.private = private;
        Ok(repo)
    }

    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    pub fn with_owners(mut self, user_id: i64, team_id: i64) -> Self {
        self.user_id = user_id;
        self.team_id = team_id;
        self
    }

    pub fn default_branch(&self) -> DefaultBranch {
        self.scm.default_branch()
    }

    /// 修改构建相关的可变字段
    pub fn apply_settings(&mut self, settings: RepositorySettings) {
        if let Some(disabled) = settings.disabled {
            self.disabled = disabled;
        }
        if let Some(disabled_pr) = settings.disabled_pr {
            self.disabled_pr = disabled_pr;
        }
        if let Some(timeout) = settings.timeout {
            self.timeout = timeout;
        }
        if let Some(priveleged) = settings.priveleged {
            self.priveleged = priveleged;
        }
        if let Some(params) = settings.params {
            self.params = params;
        }
        self.updated = Utc::now();
    }
}

/// 仓库创建后允许修改的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySettings {
    pub disabled: Option<bool>,
    pub disabled_pr: Option<bool>,
    pub timeout: Option<i64>,
    pub priveleged: Option<bool>,
    pub params: Option<HashMap<String, String>>,
}
