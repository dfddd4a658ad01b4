use crate::domain::value_objects::Host;

const GITHUB_PUBLIC: &str = "git://github.com/%s/%s.git";
const GITHUB_PRIVATE: &str = "git@github.com:%s/%s.git";
const BITBUCKET_PUBLIC: &str = "https://bitbucket.org/%s/%s.git";
const BITBUCKET_PRIVATE: &str = "git@bitbucket.org:%s/%s.git";

const PLACEHOLDER: &str = "%s";

/// 有克隆地址模板的托管平台
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostedProvider {
    GitHub,
    Bitbucket,
}

impl HostedProvider {
    pub fn from_host(host: Host) -> Option<Self> {
        match host {
            Host::GitHub => Some(HostedProvider::GitHub),
            Host::Bitbucket => Some(HostedProvider::Bitbucket),
            Host::GoogleCode | Host::Custom => None,
        }
    }

    pub fn host(&self) -> Host {
        match self {
            HostedProvider::GitHub => Host::GitHub,
            HostedProvider::Bitbucket => Host::Bitbucket,
        }
    }

    pub fn template(&self, private: bool) -> CloneUrlTemplate {
        let template = match (self, private) {
            (HostedProvider::GitHub, false) => GITHUB_PUBLIC,
            (HostedProvider::GitHub, true) => GITHUB_PRIVATE,
            (HostedProvider::Bitbucket, false) => BITBUCKET_PUBLIC,
            (HostedProvider::Bitbucket, true) => BITBUCKET_PRIVATE,
        };
        CloneUrlTemplate(template)
    }
}

/// 克隆地址模板，两个占位符依次为 owner 和 name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneUrlTemplate(&'static str);

impl CloneUrlTemplate {
    /// 替换后的文本不会再被当作占位符展开
    pub fn render(&self, owner: &str, name: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + owner.len() + name.len());
        let mut args = [owner, name].into_iter();
        let mut parts = self.0.split(PLACEHOLDER).peekable();
        while let Some(part) = parts.next() {
            out.push_str(part);
            if parts.peek().is_some() {
                out.push_str(args.next().unwrap_or_default());
            }
        }
        out
    }
}
