//! # 워크플로우 엔진
//!
//! 글의 상태(status)에 대한 유일한 권위자입니다. 모든 상태 전이는
//! `(현재 상태, 액터 역할/소유권, 동작)` 조합을 검사하는
//! 명시적 전이 테이블을 통과해야 합니다.
//!
//! ```text
//!                submit                approve              publish
//!   draft ────────────────▶ submitted ─────────▶ approved ──────────▶ published
//!     ▲                      │      │                │
//!     │                      │reject│assign          │assign
//!     │                      ▼      ▼                ▼
//!     │               rejected    under_review ◀─────┘
//!     │                  │          │ submit_review
//!     │ (편집 가능)       │          ├─ accept           → approved
//!     │                  │          ├─ reject           → rejected
//!     │                  ▼          └─ request_revision → revision_requested
//!     └──────── revision_requested ◀┘
//!        (작성자 request_revision / 재편집 후 submit으로 복귀)
//! ```
//!
//! 이 모듈은 순수 함수만 담습니다. DB 접근 없이 메모리 위의
//! `Article` 스냅샷과 `Actor`만 보고 다음 상태 또는 타입 있는 실패를
//! 반환하므로, 영속 계층 없이 전이 규칙 전체를 단위 테스트할 수 있습니다.
//! 영속화(가드된 UPDATE)는 `db::articles`가 담당합니다.

use thiserror::Error;

use crate::error::AppError;
use crate::middleware::auth::Actor;
use crate::models::{Article, ArticleStatus, ReviewVerdict};

/// reject / request_revision 평결에 요구되는 피드백 최소 길이(문자 수)
pub const MIN_FEEDBACK_LEN: usize = 10;

/// 전이 실패의 세 가지 종류.
/// 어떤 실패도 저장된 글에 부분 변경을 남기지 않습니다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("cannot {action} an article in status '{from}'")]
    InvalidTransition {
        from: ArticleStatus,
        action: &'static str,
    },

    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Unauthorized(msg) => AppError::Unauthorized(msg),
            WorkflowError::InvalidTransition { .. } => {
                AppError::InvalidTransition(err.to_string())
            }
            WorkflowError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

fn require_author(article: &Article, actor: &Actor, action: &str) -> Result<(), WorkflowError> {
    if article.author_id != actor.id {
        return Err(WorkflowError::Unauthorized(format!(
            "only the article's author may {action}"
        )));
    }
    Ok(())
}

fn require_admin(actor: &Actor, action: &str) -> Result<(), WorkflowError> {
    if !actor.is_admin() {
        return Err(WorkflowError::Unauthorized(format!(
            "only an admin may {action}"
        )));
    }
    Ok(())
}

/// 작성자가 초안(또는 재수정 상태)의 글을 제출합니다. → `submitted`
pub fn submit(article: &Article, actor: &Actor) -> Result<ArticleStatus, WorkflowError> {
    require_author(article, actor, "submit")?;
    match article.status {
        ArticleStatus::Draft | ArticleStatus::RevisionRequested => Ok(ArticleStatus::Submitted),
        from => Err(WorkflowError::InvalidTransition {
            from,
            action: "submit",
        }),
    }
}

/// 관리자가 제출된 글을 승인합니다. → `approved`
pub fn approve(article: &Article, actor: &Actor) -> Result<ArticleStatus, WorkflowError> {
    require_admin(actor, "approve an article")?;
    match article.status {
        ArticleStatus::Submitted => Ok(ArticleStatus::Approved),
        from => Err(WorkflowError::InvalidTransition {
            from,
            action: "approve",
        }),
    }
}

/// 관리자가 제출된 글을 반려합니다. 사유(reason)는 비어 있을 수 없습니다. → `rejected`
pub fn reject(
    article: &Article,
    actor: &Actor,
    reason: &str,
) -> Result<ArticleStatus, WorkflowError> {
    require_admin(actor, "reject an article")?;
    if reason.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "a rejection reason is required".to_string(),
        ));
    }
    match article.status {
        ArticleStatus::Submitted => Ok(ArticleStatus::Rejected),
        from => Err(WorkflowError::InvalidTransition {
            from,
            action: "reject",
        }),
    }
}

/// 관리자가 제출/승인된 글을 리뷰어에게 배정합니다. → `under_review`
pub fn assign_reviewer(article: &Article, actor: &Actor) -> Result<ArticleStatus, WorkflowError> {
    require_admin(actor, "assign a reviewer")?;
    match article.status {
        ArticleStatus::Submitted | ArticleStatus::Approved => Ok(ArticleStatus::UnderReview),
        from => Err(WorkflowError::InvalidTransition {
            from,
            action: "assign a reviewer to",
        }),
    }
}

/// 배정된 리뷰어(또는 관리자)가 리뷰 평결을 제출합니다.
///
/// - accept → `approved`
/// - reject → `rejected`
/// - request_revision → `revision_requested`
///
/// reject / request_revision에는 10자 이상의 피드백이 필요합니다.
pub fn submit_review(
    article: &Article,
    actor: &Actor,
    verdict: ReviewVerdict,
    feedback: &str,
) -> Result<ArticleStatus, WorkflowError> {
    let is_assigned = article.reviewer_id.as_deref() == Some(actor.id.as_str());
    if !is_assigned && !actor.is_admin() {
        return Err(WorkflowError::Unauthorized(
            "only the assigned reviewer or an admin may submit a review".to_string(),
        ));
    }

    if article.status != ArticleStatus::UnderReview {
        return Err(WorkflowError::InvalidTransition {
            from: article.status,
            action: "review",
        });
    }

    // 부정적 평결에는 실질적인 피드백을 요구 (10자 미만은 거절)
    if matches!(verdict, ReviewVerdict::Reject | ReviewVerdict::RequestRevision)
        && feedback.chars().count() < MIN_FEEDBACK_LEN
    {
        return Err(WorkflowError::Validation(format!(
            "feedback must be at least {MIN_FEEDBACK_LEN} characters for this decision"
        )));
    }

    Ok(match verdict {
        ReviewVerdict::Accept => ArticleStatus::Approved,
        ReviewVerdict::Reject => ArticleStatus::Rejected,
        ReviewVerdict::RequestRevision => ArticleStatus::RevisionRequested,
    })
}

/// 반려된 글의 작성자가 재수정을 요청합니다. → `revision_requested`
///
/// 이후 작성자는 본문을 편집하고 submit으로 제출 단계로 복귀할 수 있습니다.
pub fn request_revision(
    article: &Article,
    actor: &Actor,
    reason: &str,
) -> Result<ArticleStatus, WorkflowError> {
    require_author(article, actor, "request a revision")?;
    if reason.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "a revision reason is required".to_string(),
        ));
    }
    match article.status {
        ArticleStatus::Rejected => Ok(ArticleStatus::RevisionRequested),
        from => Err(WorkflowError::InvalidTransition {
            from,
            action: "request a revision for",
        }),
    }
}

/// 관리자가 승인된 글을 발행합니다. → `published` (종단 상태)
pub fn publish(article: &Article, actor: &Actor) -> Result<ArticleStatus, WorkflowError> {
    require_admin(actor, "publish an article")?;
    match article.status {
        ArticleStatus::Approved => Ok(ArticleStatus::Published),
        from => Err(WorkflowError::InvalidTransition {
            from,
            action: "publish",
        }),
    }
}

/// 본문 편집 가드. 상태를 바꾸지 않으므로 다음 상태 대신 ()를 반환합니다.
/// 버전 증가와 expected_version 검사는 `db::articles::bump_version`이 수행합니다.
pub fn check_edit(article: &Article, actor: &Actor) -> Result<(), WorkflowError> {
    require_author(article, actor, "edit the content")?;
    if !article.status.is_editable() {
        return Err(WorkflowError::InvalidTransition {
            from: article.status,
            action: "edit",
        });
    }
    Ok(())
}
