use crate::{
    db,
    error::AppError,
    services,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use super::articles::AppState;

pub async fn list_article_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let versions = db::list_versions(&state.pool, &id).await?;
    Ok(Json(json!({ "versions": versions })))
}

pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let version = db::get_version(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!(version)))
}

/// `GET /articles/:id/versions/:version_id/diff`
/// — 지정한 버전(old)과 현재 본문(new)의 단어 단위 변경 시퀀스를 반환합니다.
///
/// 응답: `{ "old_version": n, "current_version": m, "changes": [...] }`
/// 순수 계산이므로 아무 상태도 남기지 않습니다.
pub async fn diff_against_current(
    State(state): State<AppState>,
    Path((id, version_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let version = db::get_version(&state.pool, &version_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if version.article_id != id {
        return Err(AppError::NotFound);
    }

    let current = services::read_content(&state.content_path, &article.file_path).await?;
    let changes = services::diff::diff(&version.content, &current);

    Ok(Json(json!({
        "old_version": version.version_number,
        "current_version": article.version,
        "changes": changes,
    })))
}
