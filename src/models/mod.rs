//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `article`: 글(Article)과 워크플로우 상태 enum
//! - `comment`: 인라인 리뷰 코멘트
//! - `change`: 추적 변경(제안 편집)
//! - `decision`: 리뷰어의 최종 평결
//! - `version`: 글 버전 스냅샷
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.
//! 예: `crate::models::article::Article` 대신 `crate::models::Article`로 접근 가능

pub mod article;
pub mod change;
pub mod comment;
pub mod decision;
pub mod version;

pub use article::*;
pub use change::*;
pub use comment::*;
pub use decision::*;
pub use version::*;
