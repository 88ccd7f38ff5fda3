use std::fmt;
use std::io::Write;

use tracing::warn;

use quiz_core::model::{OptionIndex, Question, Selection};
use quiz_services::{Feedback, PresentationPort, ReviewItem, Screen, SessionResult};

const BELL: char = '\u{7}';
const TIMER_WIDTH: usize = 20;

/// Line-oriented presenter writing to any `Write` sink.
pub struct TerminalPresenter<W: Write> {
    out: W,
    animate: bool,
    timer_line_open: bool,
}

impl<W: Write> TerminalPresenter<W> {
    #[must_use]
    pub fn new(out: W, animate: bool) -> Self {
        Self {
            out,
            animate,
            timer_line_open: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    #[cfg(test)]
    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.timer_line_open {
            self.timer_line_open = false;
            self.write_raw(format_args!("\n"));
        }
        self.write_raw(args);
    }

    fn write_raw(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            warn!(%err, "terminal write failed");
        }
    }

    pub fn render_result(&mut self, result: &SessionResult) {
        self.emit(format_args!(
            "Score: {} / {}  ({}%)\nCorrect: {}  Wrong: {}  Time: {}s\n",
            result.correct_count,
            result.total_questions,
            result.percentage,
            result.correct_count,
            result.wrong_count,
            result.total_elapsed_seconds,
        ));
        self.emit(format_args!("[r] review answers  [p] play again  [q] quit\n"));
    }

    pub fn render_review(&mut self, items: &[ReviewItem]) {
        for (pos, item) in items.iter().enumerate() {
            self.emit(format_args!("\nQ{}. {}\n", pos + 1, item.question_text));
            for index in OptionIndex::all() {
                let mark = if index == item.correct {
                    "✔"
                } else if item.wrong_pick() == Some(index) {
                    "✘"
                } else {
                    " "
                };
                self.emit(format_args!(
                    "  {mark} {}. {}\n",
                    index.label(),
                    item.options[index.as_usize()]
                ));
            }
            self.emit(format_args!("  {}\n", review_meta(item)));
        }
        self.emit(format_args!("\n[h] home  [p] play again  [q] quit\n"));
    }
}

/// `Your answer: B • Correct • Time: 3s`
#[must_use]
pub fn review_meta(item: &ReviewItem) -> String {
    let you = match item.user_selection {
        Selection::Option(index) => index.label().to_string(),
        Selection::Unanswered => "No answer".to_string(),
    };
    let verdict = if item.was_correct { "Correct" } else { "Incorrect" };
    format!(
        "Your answer: {you} • {verdict} • Time: {}s",
        item.seconds_taken
    )
}

fn timer_bar(time_remaining: u32, seconds_per_question: u32) -> String {
    let filled = if seconds_per_question == 0 {
        0
    } else {
        (time_remaining as usize * TIMER_WIDTH) / seconds_per_question as usize
    };
    let filled = filled.min(TIMER_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(TIMER_WIDTH - filled))
}

impl<W: Write> PresentationPort for TerminalPresenter<W> {
    fn show_screen(&mut self, screen: Screen) {
        match screen {
            Screen::Start => self.emit(format_args!(
                "\n=== Quiz ===\n[enter] start  [q] quit\n"
            )),
            Screen::Quiz => self.emit(format_args!(
                "\nKeys: 1-4 answer, s skip, n next, q quit\n"
            )),
            Screen::Result => self.emit(format_args!("\n=== Results ===\n")),
            Screen::Review => self.emit(format_args!("\n=== Review ===\n")),
        }
    }

    fn render_question(
        &mut self,
        question: &Question,
        index: usize,
        total: usize,
        _time_remaining: u32,
    ) {
        if self.animate {
            self.emit(format_args!("\n{}\n", "·".repeat(24)));
        } else {
            self.emit(format_args!("\n"));
        }
        self.emit(format_args!(
            "Question {} / {}\n{}\n",
            index + 1,
            total,
            question.text()
        ));
        for option in OptionIndex::all() {
            self.emit(format_args!(
                "  {}. {}\n",
                option.label(),
                question.option(option)
            ));
        }
    }

    fn update_progress(&mut self, percent: u32) {
        self.emit(format_args!("Progress {percent}%\n"));
    }

    fn update_timer(&mut self, time_remaining: u32, seconds_per_question: u32) {
        let bar = timer_bar(time_remaining, seconds_per_question);
        self.write_raw(format_args!("\rTime: {time_remaining:>3}s {bar} "));
        self.timer_line_open = true;
    }

    fn reveal_correct_answer(&mut self, correct: OptionIndex) {
        self.emit(format_args!("Answer: {correct}\n"));
    }

    fn highlight_selection(&mut self, selected: OptionIndex, was_correct: bool) {
        let verdict = if was_correct { "correct" } else { "wrong" };
        self.emit(format_args!("You chose {selected}: {verdict}\n"));
    }

    fn play_feedback(&mut self, feedback: Feedback) {
        let cue = match feedback {
            Feedback::Correct => "✔",
            Feedback::Wrong => "✘",
            Feedback::Neutral => "•",
        };
        self.emit(format_args!("{BELL}{cue}  [n] next\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, QuestionId};

    fn output(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    fn question() -> Question {
        QuestionDraft::new("Which is the smallest prime number?", ["0", "1", "2", "3"], 2)
            .validate(QuestionId::new(9))
            .unwrap()
    }

    #[test]
    fn renders_question_with_letter_labels() {
        let mut p = TerminalPresenter::new(Vec::new(), false);
        p.render_question(&question(), 1, 5, 12);
        let text = output(p);
        assert!(text.contains("Question 2 / 5"));
        assert!(text.contains("  C. 2\n"));
        assert!(!text.contains('·'));
    }

    #[test]
    fn timer_line_is_closed_before_next_output() {
        let mut p = TerminalPresenter::new(Vec::new(), true);
        p.update_timer(6, 12);
        p.reveal_correct_answer(OptionIndex::from_u8(2).unwrap());
        let text = output(p);
        assert!(text.starts_with("\rTime:   6s ██████████░░░░░░░░░░ \n"));
        assert!(text.ends_with("Answer: C\n"));
    }

    #[test]
    fn review_meta_reads_like_the_result_page() {
        let q = question();
        let record = quiz_core::model::AnswerRecord::answered(OptionIndex::from_u8(1).unwrap(), 3);
        let item = ReviewItem::from_record(&q, &record);
        assert_eq!(review_meta(&item), "Your answer: B • Incorrect • Time: 3s");

        let skipped = ReviewItem::from_record(&q, &quiz_core::model::AnswerRecord::unanswered(12));
        assert_eq!(
            review_meta(&skipped),
            "Your answer: No answer • Incorrect • Time: 12s"
        );
    }

    #[test]
    fn result_lists_score_and_time() {
        let mut p = TerminalPresenter::new(Vec::new(), true);
        p.render_result(&SessionResult {
            correct_count: 1,
            wrong_count: 2,
            total_questions: 3,
            percentage: 33,
            total_elapsed_seconds: 16,
        });
        let text = output(p);
        assert!(text.contains("Score: 1 / 3  (33%)"));
        assert!(text.contains("Time: 16s"));
    }
}
