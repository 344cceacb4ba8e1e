//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `articles`: 글 CRUD, 가드된 상태 전이, 버전 증가, 명시적 연쇄 삭제
//! - `versions`: 본문 버전 스냅샷
//! - `comments`: 인라인 리뷰 코멘트 (리뷰 산출물 저장소)
//! - `changes`: 추적 변경과 승인/반려 결정
//! - `decisions`: 리뷰어 평결 기록
//!
//! 리뷰 산출물 모듈(comments/changes/decisions)은 글의 status를
//! 절대 쓰지 않습니다 — 상태의 유일한 기록자는 워크플로우 경로입니다.

pub mod articles;
pub mod changes;
pub mod comments;
pub mod decisions;
pub mod versions;

// 하위 모듈의 공개 함수를 재공개(re-export)하여
// `crate::db::get_article`처럼 바로 접근할 수 있게 합니다.
pub use articles::*;
pub use changes::*;
pub use comments::*;
pub use decisions::*;
pub use versions::*;
