//! # 본문 파일 I/O 서비스
//!
//! 글의 현재 본문은 마크다운(.md) 파일로 디스크에 저장하고,
//! DB에는 메타데이터와 버전 스냅샷만 둡니다.
//!
//! 이 모듈의 함수들:
//! - `read_content()` / `write_content()`: 본문 파일 읽기/쓰기
//! - `count_words()` / `count_chars()`: 텍스트 통계
//! - `generate_file_path()`: 제목으로부터 저장 경로 생성

use crate::error::AppError;
use std::path::PathBuf;
use tokio::fs;

pub async fn read_content(content_path: &str, file_path: &str) -> Result<String, AppError> {
    let full_path = PathBuf::from(content_path).join(file_path);
    let content = fs::read_to_string(&full_path).await?;
    Ok(content)
}

/// 본문을 디스크 파일에 저장합니다. 부모 디렉토리가 없으면 생성합니다.
pub async fn write_content(
    content_path: &str,
    file_path: &str,
    content: &str,
) -> Result<(), AppError> {
    let full_path = PathBuf::from(content_path).join(file_path);

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    fs::write(&full_path, content).await?;
    Ok(())
}

/// 글 삭제 시 본문 파일도 함께 제거합니다. 파일이 이미 없어도 무시합니다.
pub async fn remove_content(content_path: &str, file_path: &str) {
    let full_path = PathBuf::from(content_path).join(file_path);
    let _ = fs::remove_file(&full_path).await;
}

/// 공백 구분 단어 수. diff 서비스의 토큰화와 같은 규칙을 사용합니다.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 유니코드 문자 수 (한글 1자 = 1문자).
/// `.len()`은 바이트 수이므로 멀티바이트 문자에는 부적합합니다.
/// 코멘트 앵커(start/end offset)도 이 단위를 사용합니다.
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// 글 제목으로 파일 저장 경로를 생성합니다.
///
/// 같은 제목의 글이 여러 개 있을 수 있으므로 id를 접미사로 붙입니다.
/// 예: ("First Draft", "0192…") → "first-draft-0192….md"
pub fn generate_file_path(title: &str, id: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        format!("{}.md", id)
    } else {
        format!("{}-{}.md", slug, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_unicode_aware() {
        assert_eq!(count_words("hello big world"), 3);
        assert_eq!(count_chars("한글"), 2);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn file_path_includes_slug_and_id() {
        assert_eq!(generate_file_path("Hello World!", "abc"), "hello-world-abc.md");
        // slug로 변환되지 않는 제목은 id만 사용
        assert_eq!(generate_file_path("!!!", "abc"), "abc.md");
    }
}
