//! Answer matching against the expected answer list

use std::collections::BTreeSet;

use serde::Serialize;

/// Answers found so far in the current round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerProgress {
    /// Normalized forms of the matched expected answers
    pub matched: BTreeSet<String>,
    /// Number of distinct normalized expected answers
    pub total: usize,
}

impl AnswerProgress {
    /// Empty progress for the given expected answers
    pub fn for_answers(expected: &[String]) -> Self {
        let distinct: BTreeSet<String> = expected.iter().map(|a| normalize(a)).collect();
        Self {
            matched: BTreeSet::new(),
            total: distinct.len(),
        }
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// True once every expected answer has been found
    pub fn is_complete(&self) -> bool {
        !self.matched.is_empty() && self.matched.len() == self.total
    }

    /// Drop every match, keeping the total
    pub fn cleared(&self) -> Self {
        Self {
            matched: BTreeSet::new(),
            total: self.total,
        }
    }
}

/// Trim surrounding whitespace and case fold
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Match `input` against `expected`, returning the resulting progress.
///
/// Unknown and already matched inputs return `progress` unchanged.
pub fn submit(input: &str, progress: &AnswerProgress, expected: &[String]) -> AnswerProgress {
    let candidate = normalize(input);
    if candidate.is_empty() || progress.matched.contains(&candidate) {
        return progress.clone();
    }

    if expected.iter().any(|answer| normalize(answer) == candidate) {
        let mut next = progress.clone();
        next.matched.insert(candidate);
        next
    } else {
        progress.clone()
    }
}

/// Display forms of the matched answers, in expected order
pub fn matched_answers(progress: &AnswerProgress, expected: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    expected
        .iter()
        .filter(|answer| {
            let key = normalize(answer);
            progress.matched.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}
