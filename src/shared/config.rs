use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use crate::infrastructure::keys::{DEFAULT_KEY_BITS, MIN_KEY_BITS};
use crate::shared::error::RepoError;
use crate::shared::result::Result;

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub keys: KeysConfig,
    pub build: BuildConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub sqlite_path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("repohub.db"),
            max_connections: 10,
        }
    }
}

/// 密钥配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeysConfig {
    /// RSA 模数位数，不小于 2048
    pub bits: usize,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_KEY_BITS,
        }
    }
}

/// 新仓库的构建默认值
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    pub default_timeout_secs: i64,
    pub default_privileged: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 3600,
            default_privileged: false,
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RepoError::Config(e.to_string()))?;
        Ok(config)
    }

    /// 从命令行参数和文件加载配置，命令行优先
    pub fn from_args_and_file(
        config_path: &Path,
        db_path: Option<PathBuf>,
        bind_address: Option<SocketAddr>,
        key_bits: Option<usize>,
    ) -> Result<Self> {
        let mut config = if config_path.exists() {
            Self::from_file(config_path)?
        } else {
            tracing::warn!(
                "Config file {} not found, using defaults",
                config_path.display()
            );
            Config::default()
        };

        if let Some(db_path) = db_path {
            config.database.sqlite_path = db_path;
        }
        if let Some(bind_address) = bind_address {
            config.server.bind_address = bind_address;
        }
        if let Some(bits) = key_bits {
            config.keys.bits = bits;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keys.bits < MIN_KEY_BITS {
            return Err(format!(
                "keys.bits must be at least {}, got {}",
                MIN_KEY_BITS, self.keys.bits
            )
            .into());
        }
        if self.build.default_timeout_secs < 0 {
            return Err("build.default_timeout_secs must not be negative".into());
        }
        if self.database.max_connections == 0 {
            return Err("database.max_connections must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [keys]
            bits = 4096

            [build]
            default_timeout_secs = 900
            "#,
        )
        .unwrap();

        let config = Config::from_args_and_file(&path, None, None, None).unwrap();
        assert_eq!(config.keys.bits, 4096);
        assert_eq!(config.build.default_timeout_secs, 900);
        assert!(!config.build.default_privileged);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.server.bind_address.port(), 8080);
    }

    #[test]
    fn test_args_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\nsqlite_path = \"from-file.db\"\n").unwrap();

        let config = Config::from_args_and_file(
            &path,
            Some(PathBuf::from("from-args.db")),
            Some("0.0.0.0:9000".parse().unwrap()),
            None,
        )
        .unwrap();
        assert_eq!(config.database.sqlite_path, PathBuf::from("from-args.db"));
        assert_eq!(config.server.bind_address.port(), 9000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            Config::from_args_and_file(&dir.path().join("absent.toml"), None, None, None).unwrap();
        assert_eq!(config.keys.bits, DEFAULT_KEY_BITS);
    }

    #[test]
    fn test_weak_key_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_args_and_file(&dir.path().join("absent.toml"), None, None, Some(1024))
            .unwrap_err();
        assert!(matches!(err, RepoError::Config(msg) if msg.contains("2048")));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[keys\nbits = ").unwrap();
        assert!(matches!(Config::from_file(&path), Err(RepoError::Config(_))));
    }
}
