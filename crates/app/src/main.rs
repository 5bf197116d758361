use std::fmt;
use std::io::BufRead;

use quiz_core::model::{GlobalStats, QuestionRecord, Section, SessionSummary};
use services::session::{MockParams, SessionProgress, SessionService};
use services::{Clock, PresentationSink, SessionError, SessionLoopService};
use storage::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownSection(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownSection(raw) => write!(f, "unknown section: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
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
    eprintln!("  prepquiz sections                      list sections and question counts");
    eprintln!("  prepquiz section <name>                practice one section");
    eprintln!("  prepquiz mixed [--topics a,b,c]        practice across sections");
    eprintln!("  prepquiz mock --questions N --minutes M  timed mock exam");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  --questions-dir <dir>   question bank directory (default: questions)");
    eprintln!("  --stats-file <file>     global stats file (default: stats.json)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREPQUIZ_QUESTIONS_DIR, PREPQUIZ_STATS_FILE");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Sections,
    Section(Section),
    Mixed(Vec<Section>),
    Mock(MockParams),
}

#[derive(Debug)]
struct Args {
    questions_dir: String,
    stats_file: String,
    command: Command,
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut questions_dir = std::env::var("PREPQUIZ_QUESTIONS_DIR")
            .unwrap_or_else(|_| "questions".to_string());
        let mut stats_file =
            std::env::var("PREPQUIZ_STATS_FILE").unwrap_or_else(|_| "stats.json".to_string());

        let mut subcommand: Option<String> = None;
        let mut section_name: Option<String> = None;
        let mut topics: Vec<Section> = Vec::new();
        let mut num_questions: usize = 10;
        let mut minutes: u32 = 15;

        while let Some(arg) = argv.next() {
            match arg.as_str() {
                "--questions-dir" => {
                    questions_dir = require_value(&mut argv, "--questions-dir")?;
                }
                "--stats-file" => {
                    stats_file = require_value(&mut argv, "--stats-file")?;
                }
                "--topics" => {
                    let raw = require_value(&mut argv, "--topics")?;
                    topics = raw
                        .split(',')
                        .map(|part| {
                            part.trim()
                                .parse::<Section>()
                                .map_err(|_| ArgsError::UnknownSection(part.trim().to_string()))
                        })
                        .collect::<Result<_, _>>()?;
                }
                "--questions" => {
                    let raw = require_value(&mut argv, "--questions")?;
                    num_questions = raw.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--questions",
                        raw,
                    })?;
                }
                "--minutes" => {
                    let raw = require_value(&mut argv, "--minutes")?;
                    minutes = raw.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--minutes",
                        raw,
                    })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other if other.starts_with("--") => {
                    return Err(ArgsError::UnknownArg(other.to_string()));
                }
                other if subcommand.is_none() => subcommand = Some(other.to_string()),
                other if subcommand.as_deref() == Some("section") && section_name.is_none() => {
                    section_name = Some(other.to_string());
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }

        let command = match subcommand.as_deref() {
            None | Some("sections") => Command::Sections,
            Some("section") => {
                let raw = section_name.ok_or(ArgsError::MissingValue { flag: "section" })?;
                let section = raw
                    .parse()
                    .map_err(|_| ArgsError::UnknownSection(raw.clone()))?;
                Command::Section(section)
            }
            Some("mixed") => Command::Mixed(topics),
            Some("mock") => Command::Mock(MockParams::new(num_questions, minutes)),
            Some(other) => return Err(ArgsError::UnknownArg(other.to_string())),
        };

        Ok(Self {
            questions_dir,
            stats_file,
            command,
        })
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prepquiz=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ─── Terminal presentation ─────────────────────────────────────────────────────

const OPTION_PREFIXES: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

struct ConsoleSink;

impl PresentationSink for ConsoleSink {
    fn show_question(
        &mut self,
        question: &QuestionRecord,
        progress: &SessionProgress,
        prior_attempts: u32,
    ) {
        println!();
        let mut meta = format!(
            "Question {} of {} [{}] ({})",
            progress.answered + 1,
            progress.total,
            question.section().display_name(),
            question.difficulty().as_str(),
        );
        if prior_attempts > 0 {
            meta.push_str(&format!(" - {} attempt", ordinal(prior_attempts + 1)));
        }
        println!("{meta}");
        println!("{}", question.prompt());
        for (index, option) in question.options().iter().enumerate() {
            let prefix = OPTION_PREFIXES
                .get(index)
                .copied()
                .unwrap_or_else(|| char::from_digit((index + 1) as u32 % 10, 10).unwrap_or('?'));
            println!("  {}. {option}", prefix);
        }
    }

    fn notify_answer(&mut self, correct: bool, explanation: &str) {
        if correct {
            println!("Correct!");
        } else {
            println!("Incorrect.");
        }
        println!("Explanation: {explanation}");
    }

    fn show_summary(&mut self, summary: &SessionSummary, global: &GlobalStats) {
        println!();
        println!("Session complete.");
        println!(
            "  Correct:  {} / {} ({}%)",
            summary.correct(),
            summary.answered(),
            summary.accuracy()
        );
        println!("  Sessions so far: {}", global.total_sessions());
        println!("  Best accuracy:   {}%", global.best_accuracy());
        println!(
            "  Time practiced:  {} min",
            global.time_spent_secs() / 60
        );
    }
}

// ─── Interactive session loop ──────────────────────────────────────────────────

enum Input {
    Answer(usize),
    Previous,
    Quit,
    Unknown,
}

fn read_input(lines: &mut impl Iterator<Item = std::io::Result<String>>) -> Option<Input> {
    let line = lines.next()?.ok()?;
    let trimmed = line.trim();
    Some(match trimmed {
        "q" | "quit" => Input::Quit,
        "p" | "prev" => Input::Previous,
        _ => match trimmed.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Answer(n - 1),
            _ => Input::Unknown,
        },
    })
}

async fn run_session(
    loop_svc: &mut SessionLoopService,
    mut session: SessionService,
    sink: &mut ConsoleSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if loop_svc.check_timer(&mut session) {
            println!();
            println!("Time's up!");
            break;
        }

        let Some(question) = session.current().cloned() else {
            break;
        };
        let progress = session.progress();
        let prior = loop_svc.attempt_count(question.id());
        sink.show_question(&question, &progress, prior);

        if let Some(left) = session.time_remaining(loop_svc.clock().now()) {
            println!("  ({}:{:02} left)", left.num_minutes(), left.num_seconds() % 60);
        }
        println!(
            "Answer 1-{}, p = previous, q = quit",
            question.options().len()
        );

        let Some(input) = read_input(&mut lines) else {
            break;
        };
        match input {
            Input::Quit => break,
            Input::Previous => {
                if session.go_back().is_none() {
                    println!("Nothing to go back to.");
                }
            }
            Input::Answer(selected) => {
                match loop_svc.answer_current(&mut session, selected) {
                    Ok(result) => {
                        sink.notify_answer(
                            result.outcome.correct,
                            result.outcome.question.explanation(),
                        );
                    }
                    Err(SessionError::InvalidOption { len, .. }) => {
                        println!("Pick an option between 1 and {len}.");
                    }
                    Err(SessionError::AlreadyAnswered) => {}
                    Err(SessionError::Completed) => break,
                    Err(err) => return Err(err.into()),
                }
            }
            Input::Unknown => {
                println!("Type an option number, p for previous, or q to quit.");
            }
        }
    }

    let summary = loop_svc.finish_session(&mut session).await?;
    sink.show_summary(&summary, loop_svc.global_stats());
    Ok(())
}

async fn list_sections(loop_svc: &mut SessionLoopService) {
    // Degraded sections simply show up with zero questions.
    let _ = loop_svc.preload_bank().await;
    let bank = loop_svc.bank();
    println!("Sections:");
    for section in Section::ALL {
        println!(
            "  {:<18} {:>4} questions",
            section.key(),
            bank.section(section).len()
        );
    }
    println!("  {:<18} {:>4} questions", "(all)", bank.len());
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::json(&args.questions_dir, &args.stats_file);
    let mut loop_svc =
        SessionLoopService::init(Clock::default_clock(), storage.questions, storage.stats).await;

    if matches!(args.command, Command::Sections) {
        list_sections(&mut loop_svc).await;
        return Ok(());
    }

    let session = match &args.command {
        Command::Section(section) => loop_svc.start_section(*section).await,
        Command::Mixed(topics) => loop_svc.start_mixed(topics).await,
        Command::Mock(params) => {
            println!(
                "Mock exam: {} questions in {} minute(s).",
                params.num_questions, params.duration_mins
            );
            loop_svc.start_mock(*params).await
        }
        Command::Sections => unreachable!("handled above"),
    };

    let session = match session {
        Ok(session) => session,
        Err(SessionError::Empty | SessionError::Bank(_)) => {
            eprintln!("No questions available for that selection.");
            eprintln!("Check the question files under {}.", args.questions_dir);
            std::process::exit(1);
        }
        Err(SessionError::MockParams(err)) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    run_session(&mut loop_svc, session, &mut ConsoleSink).await
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
