use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use exam_core::model::{ParseIdError, QuestionId, SessionDraft};
use exam_core::session::Dispatch;
use services::{Clock, ExamService, SessionHandle};
use storage::JsonQuestionBank;

mod presenter;

use presenter::{HELP, Input};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidSeed { raw: String },
    InvalidQuestionId(ParseIdError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid question count: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidQuestionId(err) => write!(f, "invalid --blacklist entry: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <path>] [--count <n>] [--subjects a,b]");
    eprintln!("                      [--chapters x,y] [--blacklist 1,2] [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank demos/question_bank.json");
    eprintln!("  --subjects  every subject in the bank");
    eprintln!("  --chapters  every chapter of the chosen subjects");
    eprintln!();
    eprintln!("Question counts: 30, 50, 90, 120, 150, 180 (one minute each)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_BANK_PATH, EXAM_QUESTION_COUNT, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    bank_path: PathBuf,
    question_count: Option<u32>,
    subjects: Vec<String>,
    chapters: Vec<String>,
    blacklist: Vec<QuestionId>,
    seed: Option<u64>,
}

impl Args {
    /// Flags win over `env`, which wins over the defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            bank_path: env("EXAM_BANK_PATH")
                .map_or_else(|| PathBuf::from("demos/question_bank.json"), PathBuf::from),
            question_count: env("EXAM_QUESTION_COUNT")
                .map(|raw| parse_count(&raw))
                .transpose()?,
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => parsed.bank_path = require_value(args, "--bank")?.into(),
                "--count" => {
                    parsed.question_count = Some(parse_count(&require_value(args, "--count")?)?);
                }
                "--subjects" => parsed.subjects = split_list(&require_value(args, "--subjects")?),
                "--chapters" => parsed.chapters = split_list(&require_value(args, "--chapters")?),
                "--blacklist" => {
                    parsed.blacklist = split_list(&require_value(args, "--blacklist")?)
                        .iter()
                        .map(|raw| raw.parse())
                        .collect::<Result<_, _>>()
                        .map_err(ArgsError::InvalidQuestionId)?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.seed = Some(seed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

// Range checks happen in `SessionDraft::validate`.
fn parse_count(raw: &str) -> Result<u32, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidCount {
        raw: raw.to_owned(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "app=info,services=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = Arc::new(JsonQuestionBank::new(&args.bank_path));
    let service = ExamService::new(Clock::default(), repo).with_seed(args.seed);

    let subjects = if args.subjects.is_empty() {
        service.subjects().await?
    } else {
        args.subjects
    };
    let chapters = if args.chapters.is_empty() {
        let bank = service.load(&subjects).await?;
        bank.chapters(&subjects)
            .into_iter()
            .map(str::to_owned)
            .collect()
    } else {
        args.chapters
    };
    tracing::info!(
        bank = %args.bank_path.display(),
        subjects = subjects.len(),
        chapters = chapters.len(),
        "exam setup"
    );

    let mut draft = SessionDraft::new(subjects)
        .with_chapters(chapters)
        .with_blacklist(args.blacklist);
    if let Some(count) = args.question_count {
        draft = draft.with_question_count(count);
    }

    let (handle, summary) = service.launch(draft).await?;
    println!("{}", presenter::render_start(&summary));
    if summary.selected == 0 {
        println!("nothing to answer; submit with `s` then `y`");
    }
    println!("{HELP}");

    let result = drive(&handle).await;
    if result.is_ok() {
        if let Some(outcome) = handle.outcome().await? {
            println!("{}", presenter::render_result(&outcome));
        }
    }
    handle.shutdown().await;
    result
}

/// Read commands until the exam is submitted or the learner quits.
async fn drive(handle: &SessionHandle) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = handle.subscribe();
    let mut cursor = 1;
    show_question(handle, cursor).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(()) };
                match Input::parse(&line) {
                    Input::Answer(typed) => {
                        let Some(view) = handle.question(cursor).await? else {
                            println!("no question to answer");
                            continue;
                        };
                        let Some(option) = presenter::resolve_option(&view, &typed) else {
                            println!("no such option: {typed}");
                            continue;
                        };
                        handle.select(view.question.id(), option).await?;
                        show_question(handle, cursor).await?;
                    }
                    Input::Next => cursor = navigate(handle, cursor, cursor + 1).await?,
                    Input::Previous => {
                        cursor = navigate(handle, cursor, cursor.saturating_sub(1)).await?;
                    }
                    Input::Jump(target) => cursor = navigate(handle, cursor, target).await?,
                    Input::Overview => {
                        if let Some(overview) = handle.overview().await? {
                            println!("{}", presenter::render_overview(&overview));
                        }
                    }
                    Input::Submit => match handle.request_submit().await? {
                        Dispatch::Confirming { estimated_score } => {
                            println!(
                                "{}",
                                presenter::render_confirmation(estimated_score, &handle.snapshot())
                            );
                        }
                        _ => println!("already confirming; answer y or c"),
                    },
                    Input::Confirm => {
                        if let Dispatch::Submitted(_) = handle.approve_submit().await? {
                            return Ok(());
                        }
                        println!("nothing to confirm; use s to submit");
                    }
                    Input::Cancel => {
                        if handle.cancel_submit().await? == Dispatch::Resumed {
                            show_question(handle, cursor).await?;
                        }
                    }
                    Input::Help => println!("{HELP}"),
                    Input::Quit => {
                        println!("quitting without submitting");
                        return Ok(());
                    }
                    Input::Blank => {}
                    Input::Unknown(raw) => println!("unknown command: {raw} (h for help)"),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() || updates.borrow_and_update().is_submitted() {
                    return Ok(());
                }
            }
        }
    }
}

/// Move to `target` if it is a valid question number, then show the current one.
async fn navigate(
    handle: &SessionHandle,
    cursor: usize,
    target: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let total = handle.snapshot().total;
    let cursor = if (1..=total).contains(&target) {
        target
    } else {
        println!("question {target} is out of range 1..={total}");
        cursor
    };
    show_question(handle, cursor).await?;
    Ok(cursor)
}

async fn show_question(
    handle: &SessionHandle,
    index: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(view) = handle.question(index).await? {
        print!("{}", presenter::render_question(&view, &handle.snapshot()));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let code = match run().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            2
        }
    };
    // Stdin is read on a blocking thread the runtime cannot cancel.
    std::process::exit(code);
}
