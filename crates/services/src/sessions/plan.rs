use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionBank};

/// Picks the questions for one session.
///
/// The bank is copied, shuffled with Fisher–Yates, and truncated to the
/// requested count. Asking for more questions than the bank holds yields the
/// whole bank in random order.
pub struct QuestionSetBuilder<'a> {
    bank: &'a QuestionBank,
    limit: usize,
}

impl<'a> QuestionSetBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, question_count: u32) -> Self {
        Self {
            bank,
            limit: usize::try_from(question_count).unwrap_or(usize::MAX),
        }
    }

    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<Question> {
        let take = self.limit.min(self.bank.len());
        let mut questions = self.bank.questions().to_vec();
        questions.shuffle(rng);
        questions.truncate(take);
        questions
    }
}
