/// Aggregate counts over a session's navigation items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: u32,
    pub answered: u32,
    pub flagged: u32,
}

impl QuizProgress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_when_all_answered() {
        let progress = QuizProgress {
            total: 3,
            answered: 3,
            flagged: 1,
        };
        assert!(progress.is_complete());
        assert_eq!(progress.remaining(), 0);
    }

    #[test]
    fn remaining_counts_unanswered() {
        let progress = QuizProgress {
            total: 5,
            answered: 2,
            flagged: 0,
        };
        assert!(!progress.is_complete());
        assert_eq!(progress.remaining(), 3);
    }
}
