use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Accept,
    Reject,
    RequestRevision,
}

/// 리뷰어의 최종 평결 — DB의 `review_decisions` 테이블 한 행에 대응합니다.
/// 리뷰 사이클당 한 번 생성되며, 생성 후 수정 경로가 없습니다 (불변).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewDecision {
    pub id: String,
    pub article_id: String,
    pub reviewer_id: String,
    pub decision: ReviewVerdict,
    pub feedback: String,
    pub created_at: String,
}

/// `POST /articles/:id/review` 요청 본문.
/// reject / request_revision일 때 feedback은 10자 이상이어야 합니다.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub decision: ReviewVerdict,
    pub feedback: String,
}
