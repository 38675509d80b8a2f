//! Plain-text rendering and command parsing for the terminal exam.

use std::fmt::Write as _;

use exam_core::model::format_clock;
use exam_core::overview::SessionOverview;
use exam_core::scoring::{Outcome, QuestionReview, ResultStats};
use exam_core::session::{StartSummary, SubmitReason};
use services::{QuestionView, SessionOutcome, SessionSnapshot};

//
// ─── INPUT ─────────────────────────────────────────────────────────────────────
//

/// One line typed by the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Option number (1-based) or the option text itself.
    Answer(String),
    Next,
    Previous,
    Jump(usize),
    Overview,
    Submit,
    Confirm,
    Cancel,
    Help,
    Quit,
    Blank,
    Unknown(String),
}

impl Input {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Input::Blank,
            "a" | "answer" if !rest.is_empty() => Input::Answer(rest.to_owned()),
            "n" | "next" => Input::Next,
            "p" | "prev" | "previous" => Input::Previous,
            "j" | "jump" => rest
                .parse()
                .map_or_else(|_| Input::Unknown(line.to_owned()), Input::Jump),
            "o" | "overview" => Input::Overview,
            "s" | "submit" => Input::Submit,
            "y" | "confirm" => Input::Confirm,
            "c" | "cancel" => Input::Cancel,
            "h" | "help" | "?" => Input::Help,
            "q" | "quit" => Input::Quit,
            _ => Input::Unknown(line.to_owned()),
        }
    }
}

/// Resolve what the learner typed to one of the question's options.
#[must_use]
pub fn resolve_option<'a>(view: &'a QuestionView, typed: &str) -> Option<&'a str> {
    let options = view.question.options();
    if let Ok(n) = typed.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| options.get(i)) {
            return Some(option.as_str());
        }
    }
    options.iter().find(|o| o.as_str() == typed).map(String::as_str)
}

pub const HELP: &str = "\
commands:
  a <n|text>  toggle an option on the current question
  n / p       next / previous question
  j <k>       jump to question k
  o           overview of answered questions
  s           submit (asks for confirmation)
  y / c       confirm / cancel submission
  q           quit without submitting";

//
// ─── SCREENS ───────────────────────────────────────────────────────────────────
//

#[must_use]
pub fn render_start(summary: &StartSummary) -> String {
    let mut out = format!(
        "selected {} of {} requested questions",
        summary.selected, summary.requested
    );
    if summary.is_underfilled() {
        out.push_str(" (not enough eligible questions)");
    }
    out
}

#[must_use]
pub fn render_question(view: &QuestionView, snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let clock = snapshot.remaining_secs.map_or_else(String::new, format_clock);
    let _ = writeln!(
        out,
        "[{}/{}] {}  ({} left)",
        view.index,
        view.total,
        view.question.subject(),
        clock
    );
    let _ = writeln!(out, "{}", view.question.text());
    for (i, option) in view.question.options().iter().enumerate() {
        let mark = if view.selected.as_deref() == Some(option.as_str()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, " {mark} {}. {option}", i + 1);
    }
    out
}

#[must_use]
pub fn render_overview(overview: &SessionOverview) -> String {
    let mut out = String::new();
    for subject in &overview.subjects {
        let _ = writeln!(
            out,
            "{}: {} answered, {} unanswered",
            subject.subject, subject.answered, subject.unanswered
        );
        let grid: Vec<String> = subject
            .entries
            .iter()
            .map(|e| {
                if e.answered {
                    format!("[{}]", e.index)
                } else {
                    format!(" {} ", e.index)
                }
            })
            .collect();
        let _ = writeln!(out, "  {}", grid.join(""));
    }
    let _ = write!(
        out,
        "total: {} answered, {} unanswered",
        overview.answered, overview.unanswered
    );
    out
}

#[must_use]
pub fn render_confirmation(estimated_score: i32, snapshot: &SessionSnapshot) -> String {
    format!(
        "{} answered, {} unanswered. Estimated score {estimated_score}. Submit? (y / c)",
        snapshot.answered, snapshot.unanswered
    )
}

#[must_use]
pub fn render_result(outcome: &SessionOutcome) -> String {
    let stats = &outcome.stats;
    let mut out = String::new();
    if outcome.submission.reason == SubmitReason::TimeExpired {
        let _ = writeln!(out, "time is up, the exam was submitted automatically");
    }
    render_stats(&mut out, stats);
    let _ = writeln!(out);
    for line in &outcome.review {
        let _ = writeln!(out, "{}", render_review_line(line));
    }
    out
}

fn render_stats(out: &mut String, stats: &ResultStats) {
    let _ = writeln!(out, "score: {} / {}", stats.total_score, stats.max_score);
    let _ = writeln!(
        out,
        "correct {}, incorrect {}, unselected {}",
        stats.correct_count, stats.incorrect_count, stats.unselected_count
    );
    let _ = writeln!(out, "accuracy: {}%", stats.accuracy_percent);
    let _ = writeln!(
        out,
        "average time per question: {:.2}s",
        stats.average_time_per_question_secs
    );
    for subject in &stats.by_subject {
        let _ = writeln!(
            out,
            "  {}: {} / {} ({} correct, {} incorrect, {} unselected)",
            subject.subject,
            subject.score,
            subject.max_score,
            subject.correct,
            subject.incorrect,
            subject.unselected
        );
    }
}

fn render_review_line(line: &QuestionReview) -> String {
    let verdict = match line.outcome {
        Outcome::Correct => "correct",
        Outcome::Incorrect => "wrong",
        Outcome::Unselected => "skipped",
    };
    format!(
        "{:>3}. {:<8} {:+} picked {} answer {}",
        line.index,
        verdict,
        line.marks,
        line.selected.as_deref().unwrap_or("-"),
        line.correct_answer
    )
}
