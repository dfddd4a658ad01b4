use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use crate::domain::entities::RepositorySettings;
use crate::domain::value_objects::Slug;
use crate::presentation::dto::RepositoryDto;
use crate::presentation::routes::AppContext;
use crate::services::repository::NewRepository;
use crate::shared::result::Result;

/// 路径中的 host/owner/name
type SlugPath = Path<(String, String, String)>;

fn slug_of((host, owner, name): &(String, String, String)) -> Slug {
    Slug::new(host, owner, name)
}

/// API: 列出所有仓库
pub async fn api_list_repositories(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<RepositoryDto>>> {
    let repos = ctx.repository_service.list().await?;
    Ok(Json(repos.into_iter().map(RepositoryDto::from).collect()))
}

/// API: 注册仓库
pub async fn api_create_repository(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<NewRepository>,
) -> Result<impl IntoResponse> {
    let repo = ctx.repository_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(RepositoryDto::from(repo))))
}

/// API: 获取单个仓库
pub async fn api_get_repository(
    State(ctx): State<Arc<AppContext>>,
    Path(parts): SlugPath,
) -> Result<Json<RepositoryDto>> {
    let repo = ctx.repository_service.get(slug_of(&parts).as_str()).await?;
    Ok(Json(repo.into()))
}

/// API: 修改构建设置
pub async fn api_update_repository(
    State(ctx): State<Arc<AppContext>>,
    Path(parts): SlugPath,
    Json(settings): Json<RepositorySettings>,
) -> Result<Json<RepositoryDto>> {
    let repo = ctx
        .repository_service
        .update(slug_of(&parts).as_str(), settings)
        .await?;
    Ok(Json(repo.into()))
}

/// API: 删除仓库
pub async fn api_delete_repository(
    State(ctx): State<Arc<AppContext>>,
    Path(parts): SlugPath,
) -> Result<StatusCode> {
    ctx.repository_service.remove(slug_of(&parts).as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// API: 公钥，供用户添加为 deploy key
pub async fn api_get_public_key(
    State(ctx): State<Arc<AppContext>>,
    Path(parts): SlugPath,
) -> Result<impl IntoResponse> {
    let repo = ctx.repository_service.get(slug_of(&parts).as_str()).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        repo.public_key,
    ))
}
