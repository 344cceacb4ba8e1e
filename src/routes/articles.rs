//! # 글(Article) 라우트 핸들러
//!
//! 글의 CRUD와 본문 읽기/쓰기를 처리하는 HTTP 핸들러 함수들입니다.
//! 상태 전이 엔드포인트는 `routes/workflow.rs`에 있습니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/articles`             → 글 목록 조회
//! - `POST   /api/v1/articles`             → 새 글 생성 (작성자)
//! - `GET    /api/v1/articles/:id`         → 단일 글 조회
//! - `PATCH  /api/v1/articles/:id`         → 글 메타데이터 수정 (작성자)
//! - `DELETE /api/v1/articles/:id`         → 글 삭제 (작성자 또는 관리자)
//! - `GET    /api/v1/articles/:id/content` → 본문 조회
//! - `PUT    /api/v1/articles/:id/content` → 본문 수정 (작성자, 편집 가능 상태)
//!
//! 본문 수정은 낙관적 동시성 계약을 따릅니다: 호출자는 자신이 읽은
//! `expected_version`을 제시해야 하고, 불일치하면 409 Conflict로 거절되며
//! 아무것도 바뀌지 않습니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::Actor,
    models::*,
    services,
    workflow,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 본문(.md) 파일 저장 디렉토리 경로
    pub content_path: String,
    /// 상위 인증 서비스가 발급한 JWT의 검증용 비밀키
    pub jwt_secret: String,
}

/// `GET /articles` — 전체 글 목록을 조회합니다.
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let articles = db::list_articles(&state.pool).await?;
    Ok(Json(json!({ "articles": articles })))
}

/// `GET /articles/:id` — 단일 글을 조회합니다.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(article))
}

/// `POST /articles` — 작성자가 새 글을 초안(draft) 상태로 생성합니다.
///
/// 글 행과 버전 1 스냅샷을 한 트랜잭션으로 기록하고, 빈 본문 파일 쓰기까지
/// 성공한 뒤에만 커밋합니다. 어느 단계가 실패해도 고아 행이나
/// 고아 파일이 남지 않습니다.
pub async fn create_article(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateArticleRequest>,
) -> Result<Json<Article>, AppError> {
    let title = req.title.as_deref().unwrap_or("Untitled");

    let id = uuid::Uuid::now_v7().to_string();
    let file_path = services::generate_file_path(title, &id);
    let slug = slug::slugify(title);

    let mut tx = state.pool.begin().await?;
    db::insert_article(&mut *tx, &id, title, &slug, &file_path, &actor.id).await?;
    // 초기 버전 스냅샷 (버전 1, 빈 본문)
    db::insert_version(&mut *tx, &id, 1, "", 0, 0).await?;

    services::write_content(&state.content_path, &file_path, "").await?;
    tx.commit().await?;

    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created article".to_string()))?;

    tracing::info!("Article {} created by {}", id, actor.id);
    Ok(Json(article))
}

/// `PATCH /articles/:id` — 글 메타데이터(제목)를 수정합니다. 작성자 전용.
pub async fn update_article(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if article.author_id != actor.id && !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "only the article's author may update it".to_string(),
        ));
    }

    let article = db::update_article(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(article))
}

/// `DELETE /articles/:id` — 글과 모든 자식 레코드를 삭제합니다.
///
/// 코멘트/추적 변경/평결/버전이 하나의 트랜잭션에서 함께 삭제된 뒤
/// 디스크의 본문 파일을 제거합니다. 성공 시 HTTP 204.
pub async fn delete_article(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if article.author_id != actor.id && !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "only the article's author or an admin may delete it".to_string(),
        ));
    }

    let deleted = db::delete_article_cascade(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    services::remove_content(&state.content_path, &article.file_path).await;

    tracing::info!("Article {} deleted by {}", id, actor.id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /articles/:id/content` — 현재 본문을 조회합니다.
pub async fn get_article_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleContent>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let content = services::read_content(&state.content_path, &article.file_path).await?;
    Ok(Json(ArticleContent { content }))
}

/// `PUT /articles/:id/content` — 본문을 수정합니다 (edit_content).
///
/// 1. 워크플로우 가드: 작성자 본인 + 편집 가능 상태(draft / revision_requested)
/// 2. 낙관적 동시성: `expected_version`이 저장된 버전과 다르면 409 Conflict
/// 3. 성공 시 버전이 정확히 1 증가하고 새 버전 스냅샷이 기록됩니다.
///    상태(status)는 바뀌지 않습니다.
///
/// 버전 증가와 스냅샷은 한 트랜잭션이고, 본문 파일 쓰기가 성공한 뒤에만
/// 커밋합니다. 어느 단계가 실패해도 스냅샷 없는 버전 번호가 남지 않습니다.
pub async fn edit_article_content(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<EditContentRequest>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    workflow::check_edit(&article, &actor)?;

    let word_count = services::count_words(&req.content) as i64;
    let char_count = services::count_chars(&req.content) as i64;

    let mut tx = state.pool.begin().await?;

    // 버전 검사를 통과해야만 스냅샷/디스크 쓰기로 진행합니다.
    let bumped =
        db::bump_version(&mut *tx, &id, req.expected_version, word_count, char_count).await?;
    if !bumped {
        return Err(AppError::Conflict(format!(
            "expected version {} but the article has moved on",
            req.expected_version
        )));
    }

    // 가드를 통과했으므로 새 버전 번호는 expected_version + 1
    db::insert_version(
        &mut *tx,
        &id,
        req.expected_version + 1,
        &req.content,
        word_count,
        char_count,
    )
    .await?;

    services::write_content(&state.content_path, &article.file_path, &req.content).await?;
    tx.commit().await?;

    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(article))
}
