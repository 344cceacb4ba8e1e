use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ChangeType {
    Add,
    Delete,
    Modify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ChangeStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ChangeStatus::Pending => "pending",
            ChangeStatus::Approved => "approved",
            ChangeStatus::Rejected => "rejected",
        })
    }
}

/// 승인 대기 중인 제안 편집 — DB의 `tracked_changes` 테이블 한 행에 대응합니다.
///
/// 텍스트 요구사항은 종류에 따라 다릅니다:
/// - add: new_text 필수
/// - delete: old_text 필수
/// - modify: 둘 다 필수
///
/// pending에서 approved/rejected로 정확히 한 번만 결정되며,
/// 재오픈 경로는 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackedChange {
    pub id: String,
    pub article_id: String,
    pub version_id: String,
    pub change_type: ChangeType,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
    pub position: i64,
    pub status: ChangeStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<String>,
    /// 결정에 첨부된 선택적 사유
    pub decision_reason: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ProposeChangeRequest {
    pub version_id: String,
    pub change_type: ChangeType,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DecideChangeRequest {
    /// approved 또는 rejected (pending으로 되돌릴 수 없음)
    pub decision: ChangeStatus,
    pub reason: Option<String>,
}
