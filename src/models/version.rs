use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleVersion {
    pub id: String,
    pub article_id: String,
    pub version_number: i64,
    pub content: String,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
}

/// 목록 조회용 요약 — 본문(content)을 제외하여 응답 크기를 줄입니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleVersionSummary {
    pub id: String,
    pub article_id: String,
    pub version_number: i64,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
}
