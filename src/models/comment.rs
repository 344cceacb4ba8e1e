use serde::{Deserialize, Serialize};

/// 리뷰 코멘트의 처리 상태: 대기 → (작성자가 반영) addressed → (리뷰어가 확인) resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CommentStatus {
    Pending,
    Addressed,
    Resolved,
}

/// 인라인 리뷰 코멘트 — DB의 `review_comments` 테이블 한 행에 대응합니다.
///
/// 작성 시점의 본문 문자 범위(start_offset..end_offset)에 고정되거나,
/// 범위 없이 글 전체에 대한 일반 코멘트로 달릴 수 있습니다.
/// 앵커는 작성 시점에만 검증하며, 이후 본문이 바뀌어도 재검증하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewComment {
    pub id: String,
    pub article_id: String,
    pub reviewer_id: String,
    pub selected_text: Option<String>,
    pub start_offset: Option<i64>,
    pub end_offset: Option<i64>,
    pub body: String,
    pub color: String,
    pub status: CommentStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
    pub selected_text: Option<String>,
    pub start_offset: Option<i64>,
    pub end_offset: Option<i64>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentStatusRequest {
    pub status: CommentStatus,
}
