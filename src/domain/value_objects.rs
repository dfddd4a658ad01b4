use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::shared::error::RepoError;

/// 仓库的规范名称，形如 `github.com/octocat/hello-world`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// 原样拼接，不做大小写或斜杠处理
    pub fn new(host: &str, owner: &str, name: &str) -> Self {
        Self(format!("{}/{}/{}", host, owner, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 代码托管平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Host {
    #[serde(rename = "github.com")]
    GitHub,
    #[serde(rename = "bitbucket.org")]
    Bitbucket,
    #[serde(rename = "code.google.com")]
    GoogleCode,
    #[serde(rename = "custom")]
    Custom,
}

impl Host {
    pub fn as_str(&self) -> &'static str {
        match self {
            Host::GitHub => "github.com",
            Host::Bitbucket => "bitbucket.org",
            Host::GoogleCode => "code.google.com",
            Host::Custom => "custom",
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Host {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github.com" => Ok(Host::GitHub),
            "bitbucket.org" => Ok(Host::Bitbucket),
            "code.google.com" => Ok(Host::GoogleCode),
            "custom" => Ok(Host::Custom),
            other => Err(RepoError::Parse(format!("unknown host: {}", other))),
        }
    }
}

/// 版本控制系统类型
///
/// 持久化层可能存有未知的值，这里保留原文而不是拒绝。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scm {
    Git,
    Hg,
    Svn,
    Unknown(String),
}

impl Scm {
    pub fn as_str(&self) -> &str {
        match self {
            Scm::Git => "git",
            Scm::Hg => "hg",
            Scm::Svn => "svn",
            Scm::Unknown(s) => s,
        }
    }

    /// 各类型约定的默认分支，未知类型按 git 处理
    pub fn default_branch(&self) -> DefaultBranch {
        match self {
            Scm::Git => DefaultBranch::Master,
            Scm::Hg => DefaultBranch::Default,
            Scm::Svn => DefaultBranch::Trunk,
            Scm::Unknown(_) => DefaultBranch::Master,
        }
    }
}

impl From<&str> for Scm {
    fn from(s: &str) -> Self {
        match s {
            "git" => Scm::Git,
            "hg" => Scm::Hg,
            "svn" => Scm::Svn,
            other => Scm::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Scm {
    fn from(s: String) -> Self {
        match Scm::from(s.as_str()) {
            Scm::Unknown(_) => Scm::Unknown(s),
            known => known,
        }
    }
}

impl From<Scm> for String {
    fn from(scm: Scm) -> Self {
        match scm {
            Scm::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Scm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 默认分支名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultBranch {
    Master,
    Default,
    Trunk,
}

impl DefaultBranch {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultBranch::Master => "master",
            DefaultBranch::Default => "default",
            DefaultBranch::Trunk => "trunk",
        }
    }
}

impl fmt::Display for DefaultBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
