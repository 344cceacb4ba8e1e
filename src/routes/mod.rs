//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `articles`: 글 CRUD와 본문 읽기/쓰기 (AppState 정의 포함)
//! - `workflow`: 승인 파이프라인의 상태 전이 엔드포인트
//! - `comments`: 인라인 리뷰 코멘트
//! - `changes`: 추적 변경과 평결 이력
//! - `versions`: 버전 스냅샷 조회와 diff
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod articles;
pub mod changes;
pub mod comments;
pub mod health;
pub mod versions;
pub mod workflow;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::list_articles`처럼 바로 접근 가능하게 합니다.
pub use articles::*;
pub use changes::*;
pub use comments::*;
pub use health::*;
pub use versions::*;
pub use workflow::*;
