use serde::{Deserialize, Serialize};

/// 글의 워크플로우 상태.
///
/// DB에는 snake_case TEXT로 저장되고, JSON에서도 같은 표기를 사용합니다.
/// 흩어진 문자열 비교 대신 닫힌 enum으로 관리하여,
/// 허용되지 않는 상태가 아예 타입 수준에서 존재할 수 없게 합니다.
/// 상태 전이 규칙은 `workflow` 모듈의 전이 테이블이 담당합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    RevisionRequested,
    Rejected,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Submitted => "submitted",
            ArticleStatus::UnderReview => "under_review",
            ArticleStatus::Approved => "approved",
            ArticleStatus::RevisionRequested => "revision_requested",
            ArticleStatus::Rejected => "rejected",
            ArticleStatus::Published => "published",
        }
    }

    /// 작성자가 본문을 수정할 수 있는 상태인지.
    /// 초안이거나, 리뷰어/작성자 경로로 수정 요청이 걸린 상태에서만 편집 가능합니다.
    pub fn is_editable(&self) -> bool {
        matches!(self, ArticleStatus::Draft | ArticleStatus::RevisionRequested)
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub file_path: String,
    pub status: ArticleStatus,
    pub version: i64,
    pub author_id: String,
    /// 배정된 리뷰어 — 관리자가 assign 하기 전까지는 None
    pub reviewer_id: Option<String>,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleContent {
    pub content: String,
}

/// `PUT /articles/:id/content` 요청 본문.
///
/// `expected_version`: 호출자가 마지막으로 읽은 버전.
/// 저장된 버전과 다르면 동시 수정이 있었던 것이므로 Conflict로 거절합니다.
#[derive(Debug, Deserialize)]
pub struct EditContentRequest {
    pub content: String,
    pub expected_version: i64,
}

#[derive(Debug, Deserialize)]
pub struct AssignReviewerRequest {
    pub reviewer_id: String,
}

/// 관리자 반려 / 작성자 재수정 요청의 공용 본문
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}
