use async_trait::async_trait;
use crate::domain::entities::{Repository, RepositorySettings};
use crate::shared::result::Result;

/// 仓库仓储接口（Repository Pattern）
///
/// 存储的是完整的持久化形式，包括凭据和构建参数。
#[async_trait]
pub trait RepositoryPort: Send + Sync {
    /// 根据 ID 查找仓库
    async fn find_by_id(&self, id: i64) -> Result<Option<Repository>>;

    /// 根据 slug 查找仓库
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Repository>>;

    /// 列出所有仓库
    async fn list_all(&self) -> Result<Vec<Repository>>;

    /// 插入新仓库，返回分配的 ID；slug 重复时返回 RepositoryExists
    async fn insert(&self, repo: &Repository) -> Result<i64>;

    /// 修改构建相关字段，返回修改后的仓库
    async fn update_settings(&self, id: i64, settings: RepositorySettings) -> Result<Repository>;

    /// 删除仓库
    async fn delete(&self, id: i64) -> Result<()>;
}
