/// 为仓库生成的密钥对，注入构建环境的 `.ssh/id_rsa` 与 `.ssh/id_rsa.pub`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// OpenSSH authorized_keys 格式
    pub public_key: String,
    /// PEM 格式 (PKCS#1)
    pub private_key: String,
}

/// 密钥生成失败
#[derive(Debug, thiserror::Error)]
pub enum KeyGenerationError {
    #[error("RSA modulus of {bits} bits is below the minimum of {min}")]
    ModulusTooSmall { bits: usize, min: usize },

    #[error("RSA key generation failed: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("PEM encoding failed: {0}")]
    Pem(#[from] rsa::pkcs1::Error),

    #[error("OpenSSH encoding failed: {0}")]
    OpenSsh(#[from] ssh_key::Error),
}

/// 密钥生成接口
///
/// 每次调用都生成一对全新的密钥，实现不得缓存或复用。
pub trait KeyProvisioner: Send + Sync {
    fn generate(&self) -> Result<KeyPair, KeyGenerationError>;
}
