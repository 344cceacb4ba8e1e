//! # 단어 단위 변경 비교(diff) 서비스
//!
//! 두 본문 스냅샷(old, new)을 단어 단위로 정렬하여
//! 리뷰 화면의 나란히 보기(side-by-side) 하이라이트에 쓰는
//! 변경 레코드 시퀀스를 계산합니다.
//!
//! ## 알고리즘
//! 공백으로 토큰화한 두 시퀀스를 커서 i, j로 함께 걷습니다.
//! 토큰이 다를 때는 한 토큰만 미리보기(lookahead)하여
//! 삭제/추가/수정 중 하나로 탐욕적으로 분류합니다.
//!
//! 이것은 최소 편집 거리(LCS/Myers) diff가 아닙니다. 사람이 쓴 짧은
//! 수정에는 충분히 좋은 결과를 싸게 내고, 어떤 입력에도 항상 종료합니다.
//! 하이라이트 위치가 이 휴리스틱의 구체적인 출력에 의존하므로,
//! 알고리즘을 바꾸면 화면 표시가 달라집니다. 그대로 유지할 것.
//!
//! 순수 함수이고 공유 상태가 없으므로 동시 호출에 안전합니다.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// 변경 레코드 하나. `index`는 해당 토큰의 시퀀스 내 위치입니다
/// (added는 new 쪽, removed는 old 쪽, modified는 old 쪽 기준).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordChange {
    pub kind: ChangeKind,
    pub index: usize,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl WordChange {
    fn added(index: usize, word: &str) -> Self {
        Self {
            kind: ChangeKind::Added,
            index,
            old: None,
            new: Some(word.to_string()),
        }
    }

    fn removed(index: usize, word: &str) -> Self {
        Self {
            kind: ChangeKind::Removed,
            index,
            old: Some(word.to_string()),
            new: None,
        }
    }

    fn modified(index: usize, old: &str, new: &str) -> Self {
        Self {
            kind: ChangeKind::Modified,
            index,
            old: Some(old.to_string()),
            new: Some(new.to_string()),
        }
    }
}

/// 두 본문의 단어 단위 변경 시퀀스를 계산합니다.
///
/// 어떤 입력 쌍에 대해서도 실패하지 않습니다. 빈 문자열은
/// 전부-추가 또는 전부-삭제 시퀀스를 만듭니다.
pub fn diff(old: &str, new: &str) -> Vec<WordChange> {
    let old_words: Vec<&str> = old.split_whitespace().collect();
    let new_words: Vec<&str> = new.split_whitespace().collect();

    let mut changes = Vec::new();
    let mut i = 0; // old 커서
    let mut j = 0; // new 커서

    while i < old_words.len() || j < new_words.len() {
        if i >= old_words.len() {
            changes.push(WordChange::added(j, new_words[j]));
            j += 1;
        } else if j >= new_words.len() {
            changes.push(WordChange::removed(i, old_words[i]));
            i += 1;
        } else if old_words[i] == new_words[j] {
            i += 1;
            j += 1;
        } else if i + 1 < old_words.len() && old_words[i + 1] == new_words[j] {
            // old[i]를 삭제로 보고 정렬을 다시 시도
            changes.push(WordChange::removed(i, old_words[i]));
            i += 1;
        } else if j + 1 < new_words.len() && new_words[j + 1] == old_words[i] {
            changes.push(WordChange::added(j, new_words[j]));
            j += 1;
        } else {
            changes.push(WordChange::modified(i, old_words[i], new_words[j]));
            i += 1;
            j += 1;
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_produce_empty_sequence() {
        assert!(diff("the quick brown fox", "the quick brown fox").is_empty());
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn empty_old_is_all_added() {
        let changes = diff("", "a b");
        assert_eq!(
            changes,
            vec![WordChange::added(0, "a"), WordChange::added(1, "b")]
        );
    }

    #[test]
    fn empty_new_is_all_removed() {
        let changes = diff("a b", "");
        assert_eq!(
            changes,
            vec![WordChange::removed(0, "a"), WordChange::removed(1, "b")]
        );
    }

    #[test]
    fn single_word_replacement_is_modified() {
        let changes = diff("the quick fox", "the lazy fox");
        assert_eq!(changes, vec![WordChange::modified(1, "quick", "lazy")]);
    }

    #[test]
    fn lookahead_detects_deletion() {
        // old[i+1] == new[j] → old[i]는 삭제
        let changes = diff("the very quick fox", "the quick fox");
        assert_eq!(changes, vec![WordChange::removed(1, "very")]);
    }

    #[test]
    fn lookahead_detects_insertion() {
        // new[j+1] == old[i] → new[j]는 추가
        let changes = diff("the quick fox", "the very quick fox");
        assert_eq!(changes, vec![WordChange::added(1, "very")]);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let old = "one two three four five";
        let new = "one 2 three five six";
        assert_eq!(diff(old, new), diff(old, new));
    }

    #[test]
    fn trailing_additions_and_removals() {
        let changes = diff("a b", "a b c d");
        assert_eq!(
            changes,
            vec![WordChange::added(2, "c"), WordChange::added(3, "d")]
        );

        let changes = diff("a b c", "a");
        assert_eq!(
            changes,
            vec![WordChange::removed(1, "b"), WordChange::removed(2, "c")]
        );
    }

    #[test]
    fn whitespace_only_differences_are_invisible() {
        // 토큰화가 공백을 정규화하므로 공백 배치 변화는 변경이 아님
        assert!(diff("a  b\nc", "a b c").is_empty());
    }
}
