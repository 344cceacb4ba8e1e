//! # 서비스 계층
//!
//! 라우트 핸들러가 사용하는 도메인 로직/유틸리티 모듈입니다.
//! - `content`: 본문 파일 I/O와 텍스트 통계
//! - `diff`: 단어 단위 변경 비교 (순수 함수)

pub mod content;
pub mod diff;

pub use content::*;
