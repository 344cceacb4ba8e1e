//! # Pyeonjip 웹 서버 진입점
//!
//! 편집 워크플로우 백엔드의 시작점(entry point)입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 본문 저장 디렉토리 생성
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod workflow;

use anyhow::Result;
use axum::{
    routing::{get, patch, post},
    Router,
};
use config::Config;
use routes::{articles::AppState, *};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG 환경변수로 로그 레벨 제어, 없으면 기본값 사용
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pyeonjip=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Pyeonjip server on {}:{}", config.host, config.port);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // 본문 파일을 저장할 디렉토리가 없으면 생성합니다.
    let content_path = Path::new(&config.content_path);
    if !content_path.exists() {
        tokio::fs::create_dir_all(content_path).await?;
        tracing::info!("Created content directory: {}", config.content_path);
    }

    let state = AppState {
        pool: pool.clone(),
        content_path: config.content_path.clone(),
        jwt_secret: config.jwt_secret.clone(),
    };

    // 워크플로우 전이 엔드포인트 (모두 POST — 동작이지 리소스가 아니므로)
    let workflow_routes = Router::new()
        .route("/articles/{id}/submit", post(submit_article))
        .route("/articles/{id}/approve", post(approve_article))
        .route("/articles/{id}/reject", post(reject_article))
        .route("/articles/{id}/assign", post(assign_reviewer))
        .route("/articles/{id}/review", post(submit_review))
        .route("/articles/{id}/request-revision", post(request_revision))
        .route("/articles/{id}/publish", post(publish_article));

    let api_routes = Router::new()
        // 글 CRUD와 본문
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article).patch(update_article).delete(delete_article),
        )
        .route(
            "/articles/{id}/content",
            get(get_article_content).put(edit_article_content),
        )
        // 버전 스냅샷과 diff
        .route("/articles/{id}/versions", get(list_article_versions))
        .route("/versions/{id}", get(get_version))
        .route(
            "/articles/{id}/versions/{version_id}/diff",
            get(diff_against_current),
        )
        // 워크플로우 전이
        .merge(workflow_routes)
        // 리뷰 산출물: 코멘트 / 추적 변경 / 평결
        .route(
            "/articles/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/comments/{id}",
            patch(update_comment_status).delete(delete_comment),
        )
        .route(
            "/articles/{id}/changes",
            get(list_changes).post(propose_change),
        )
        .route("/changes/{id}/decide", post(decide_change))
        .route("/articles/{id}/decisions", get(list_decisions))
        // 헬스체크
        .route("/health", get(health_check))
        .with_state(state);

    // 개발 환경용 CORS (프로덕션에서는 특정 도메인만 허용해야 합니다)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
