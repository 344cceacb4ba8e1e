//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! ## 에러 분류 (워크플로우 계약)
//! - `Unauthorized`: 역할/소유권 불일치 (403)
//! - `InvalidTransition`: 현재 상태에서 허용되지 않는 동작 (409)
//! - `Validation`: 필수 데이터 누락/형식 오류 — 짧은 피드백, 범위 밖 앵커 등 (400)
//! - `Conflict`: 낙관적 동시성 충돌 — expected_version 불일치 (409)
//! - `NotFound`: 참조한 글/코멘트/변경이 존재하지 않음 (404)
//!
//! 모든 실패는 호출자에게 타입 있는 실패로 반환될 뿐,
//! 자동 재시도나 묵시적 복구는 없습니다. 검증 실패는 어떤 상태 변경도
//! 일으키지 않은 채로 반환되어야 합니다 (all-or-nothing).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 역할 또는 소유권 불일치 (HTTP 403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 현재 상태에서 허용되지 않는 워크플로우 동작 (HTTP 409)
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// 요청 데이터 검증 실패 (HTTP 400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 낙관적 동시성 충돌 — 호출자가 읽은 버전이 이미 지나감 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환 (`?` 연산자용)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Unauthorized(ref msg) => {
                (StatusCode::FORBIDDEN, "unauthorized", msg.clone())
            }
            AppError::InvalidTransition(ref msg) => {
                (StatusCode::CONFLICT, "invalid_transition", msg.clone())
            }
            AppError::Validation(ref msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "...", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
