//! timefocus - Pomodoro timer and productivity tracker
//!
//! Usage:
//!   timefocus pomodoro [--task TEXT]     Start a pomodoro (default: 25 mins)
//!   timefocus work MINS [--task TEXT]    Start a custom work session
//!   timefocus break [--long] [-m MINS]   Take a break (default: 5 mins)
//!   timefocus stats [--week]             Show today's or this week's stats
//!   timefocus history                    List recorded sessions
//!   timefocus reset                      Delete all recorded sessions

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Weekday};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use timefocus::display::{self, color, TerminalDisplay, BOLD, CYAN, GREEN, MAGENTA, NC, YELLOW};
use timefocus::prompt::{answer_or_interrupt, read_line_in_background};
use timefocus::stats::{DayStats, WeekStats};
use timefocus::{run_session, timer, HistoryStore, SessionKind, SessionPlan, SessionRecord};
use timefocus_core::format::{draw_bar, format_minutes, format_percent};
use timefocus_core::paths::DATA_ENV;
use timefocus_core::{Config, Paths, MAX_SESSION_MINUTES};

/// TimeFocus - Pomodoro timer and productivity tracker
#[derive(Parser)]
#[command(name = "timefocus")]
#[command(about = "Pomodoro timer with session history and productivity statistics")]
#[command(version)]
#[command(after_help = r#"EXAMPLES:
    timefocus pomodoro                        # 25-minute pomodoro
    timefocus pomodoro --task "Write docs"    # Pomodoro with a task
    timefocus work 45                         # 45-minute work session
    timefocus break                           # 5-minute break
    timefocus break --long                    # 15-minute break
    timefocus stats                           # Today's productivity
    timefocus stats --week                    # This week's productivity

Press Ctrl-C to stop a running timer. The session is recorded as incomplete.

CONFIG:
    ~/.config/timefocus/config.toml    durations, week_start, bell, data_file
    TIMEFOCUS_DATA                     history file override

ALIASES:
    timefocus pomo    # pomodoro
"#)]
struct Cli {
    /// History file (default: ~/.local/share/timefocus/timefocus.json)
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Config file (default: ~/.config/timefocus/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a pomodoro work session
    #[command(alias = "pomo")]
    Pomodoro {
        /// What you're working on
        #[arg(long, short)]
        task: Option<String>,

        /// Don't offer a break afterwards
        #[arg(long)]
        no_break: bool,
    },

    /// Start a work session of custom length
    Work {
        /// Session duration in minutes
        #[arg(
            value_name = "MINS",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SESSION_MINUTES))
        )]
        minutes: u32,

        /// What you're working on
        #[arg(long, short)]
        task: Option<String>,
    },

    /// Take a break
    Break {
        /// Long break
        #[arg(long)]
        long: bool,

        /// Custom break duration in minutes, overrides --long
        #[arg(
            long,
            short,
            value_name = "MINS",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SESSION_MINUTES))
        )]
        minutes: Option<u32>,
    },

    /// Show productivity statistics
    #[command(alias = "statistics")]
    Stats {
        /// Show the whole week instead of one day
        #[arg(long, short)]
        week: bool,

        /// Reference date, YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        /// First day of the week (default: from config, monday)
        #[arg(long, value_name = "DAY")]
        week_start: Option<Weekday>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recorded sessions
    History {
        /// Only show the most recent N sessions
        #[arg(long, short = 'n', value_name = "N")]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all recorded sessions
    Reset {
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so they never break the countdown line
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Paths::new();
    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let config = Config::load(&config_path)?;

    let env_data = std::env::var_os(DATA_ENV).map(PathBuf::from);
    let data_file = paths.resolve_history_file(
        config.data_file.as_deref(),
        env_data.as_deref(),
        cli.data.as_deref(),
    );
    tracing::debug!(data = %data_file.display(), config = %config_path.display(), "resolved paths");
    let store = HistoryStore::new(data_file);

    match cli.command {
        Some(Commands::Pomodoro { task, no_break }) => {
            timer_runtime()?.block_on(cmd_pomodoro(&store, &config, task, no_break))
        }
        Some(Commands::Work { minutes, task }) => {
            timer_runtime()?.block_on(cmd_work(&store, &config, minutes, task))
        }
        Some(Commands::Break { long, minutes }) => {
            timer_runtime()?.block_on(take_break(&store, &config, &break_plan(&config, long, minutes)))
        }
        Some(Commands::Stats {
            week,
            date,
            week_start,
            json,
        }) => cmd_stats(&store, &config, week, date, week_start, json),
        Some(Commands::History { limit, json }) => cmd_history(&store, limit, json),
        Some(Commands::Reset { yes }) => cmd_reset(&store, yes),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// One runtime per timer command, shared by the countdowns and prompts it runs
fn timer_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start timer runtime")
}

/// Run one session to completion or Ctrl-C and record it
async fn run_plan(store: &HistoryStore, config: &Config, plan: &SessionPlan) -> Result<SessionRecord> {
    let mut countdown = TerminalDisplay::stdout(plan.kind.countdown_label(), config.bell);
    let record = run_session(store, plan, timer::ctrl_c(), &mut countdown).await?;

    if !record.completed {
        println!(
            "{} Session recorded as incomplete",
            color(YELLOW, "[stopped]")
        );
    }
    Ok(record)
}

/// Start a pomodoro, then offer a break
async fn cmd_pomodoro(
    store: &HistoryStore,
    config: &Config,
    task: Option<String>,
    no_break: bool,
) -> Result<()> {
    let plan = SessionPlan::work(config.work_minutes, task);

    println!();
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "POMODORO"));
    print_plan(&plan);

    let record = run_plan(store, config, &plan).await?;
    if !record.completed {
        return Ok(());
    }
    println!("{}", display::notification("Work session complete! Time for a break."));

    if no_break {
        return Ok(());
    }

    let today = Local::now().date_naive();
    let completed_today = store
        .load()?
        .iter()
        .filter(|s| s.kind.is_work() && s.completed && s.date() == today)
        .count() as u32;

    let (break_plan, size) = if config.long_break_due(completed_today) {
        (SessionPlan::long_break(config.long_break_minutes), "long")
    } else {
        (SessionPlan::short_break(config.short_break_minutes), "short")
    };

    print!("Take a {}-minute {} break now? (y/n): ", break_plan.minutes, size);
    io::stdout().flush()?;

    // Ctrl-C here skips the break instead of being swallowed by the countdown's handler
    let line = read_line_in_background(io::BufReader::new(io::stdin()));
    match answer_or_interrupt(line, timer::ctrl_c())
        .await
        .context("Failed to read answer")?
    {
        Some(answer) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") => {
            take_break(store, config, &break_plan).await
        }
        Some(_) => Ok(()),
        None => {
            println!();
            println!("Break skipped");
            Ok(())
        }
    }
}

/// Start a custom work session
async fn cmd_work(store: &HistoryStore, config: &Config, minutes: u32, task: Option<String>) -> Result<()> {
    let plan = SessionPlan::work(minutes, task);

    println!();
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "FOCUS"));
    print_plan(&plan);

    let record = run_plan(store, config, &plan).await?;
    if record.completed {
        println!(
            "{}",
            display::notification(&format!("{}-minute session complete!", minutes))
        );
    }
    Ok(())
}

/// Short, long or custom break. An explicit duration beats `--long`.
fn break_plan(config: &Config, long: bool, minutes: Option<u32>) -> SessionPlan {
    match minutes {
        Some(m) => SessionPlan::custom_break(m),
        None if long => SessionPlan::long_break(config.long_break_minutes),
        None => SessionPlan::short_break(config.short_break_minutes),
    }
}

async fn take_break(store: &HistoryStore, config: &Config, plan: &SessionPlan) -> Result<()> {
    println!();
    println!("{}", color(&format!("{}{}", BOLD, GREEN), "BREAK TIME"));
    println!();
    println!("  {}  {} minutes", color(CYAN, "Duration:"), plan.minutes);
    println!("  Step away from your computer!");
    println!();

    let record = run_plan(store, config, plan).await?;
    if record.completed {
        println!("{}", display::notification("Break over! Back to work."));
    }
    Ok(())
}

fn print_plan(plan: &SessionPlan) {
    println!();
    println!("  {}  {} minutes", color(CYAN, "Duration:"), plan.minutes);
    if let Some(ref task) = plan.task {
        println!("  {}      {}", color(CYAN, "Task:"), task);
    }
    println!();
}

/// Show today's or this week's statistics
fn cmd_stats(
    store: &HistoryStore,
    config: &Config,
    week: bool,
    date: Option<NaiveDate>,
    week_start: Option<Weekday>,
    json: bool,
) -> Result<()> {
    let sessions = store.load()?;
    let today = Local::now().date_naive();
    let reference = date.unwrap_or(today);

    if week {
        let stats = WeekStats::for_week(&sessions, reference, week_start.unwrap_or(config.week_start));
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_week(&stats, today);
        }
    } else {
        let stats = DayStats::for_day(&sessions, reference);
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_day(&stats, today);
        }
    }
    Ok(())
}

fn print_day(stats: &DayStats, today: NaiveDate) {
    let title = if stats.date == today {
        "Today's Productivity".to_string()
    } else {
        format!("Productivity for {}", stats.date.format("%A %Y-%m-%d"))
    };
    let totals = &stats.totals;

    println!();
    println!("{}{}{}", BOLD, title, NC);
    println!();
    println!("  {}        {}", color(CYAN, "Work time:"), format_minutes(totals.work_minutes));
    println!("  {}       {}", color(CYAN, "Break time:"), format_minutes(totals.break_minutes));
    println!(
        "  {}    {}/{}",
        color(CYAN, "Sessions done:"),
        totals.completed_sessions,
        totals.total_sessions
    );
    println!(
        "  {}  {}",
        color(CYAN, "Completion rate:"),
        format_percent(totals.completion_rate)
    );
    println!();
}

fn print_week(stats: &WeekStats, today: NaiveDate) {
    let progress = if stats.in_progress(today) { ", in progress" } else { "" };
    let totals = &stats.totals;

    println!();
    println!(
        "{}Week of {} to {}{}{}",
        BOLD, stats.start, stats.end, progress, NC
    );
    println!();
    println!("  {}     {}", color(CYAN, "Total work time:"), format_minutes(totals.work_minutes));
    println!("  {}          {}", color(CYAN, "Break time:"), format_minutes(totals.break_minutes));
    println!(
        "  {}  {}/{} ({})",
        color(CYAN, "Sessions completed:"),
        totals.completed_sessions,
        totals.total_sessions,
        format_percent(totals.completion_rate)
    );
    if totals.work_minutes > 0 {
        println!(
            "  {}     {}",
            color(CYAN, "Average per day:"),
            format_minutes(stats.average_work_per_active_day)
        );
    }

    let busiest = stats
        .by_day
        .iter()
        .map(|d| d.totals.work_minutes)
        .max()
        .unwrap_or(0);

    println!();
    println!("  {}", color(BOLD, "By day:"));
    for day in &stats.by_day {
        println!(
            "    {:10} {} {}",
            day.date.format("%A").to_string(),
            draw_bar(day.totals.work_minutes, busiest, 20),
            format_minutes(day.totals.work_minutes)
        );
    }
    println!();
}

/// List recorded sessions, oldest first
fn cmd_history(store: &HistoryStore, limit: Option<usize>, json: bool) -> Result<()> {
    let sessions = store.load()?;
    let skip = limit.map_or(0, |n| sessions.len().saturating_sub(n));
    let shown = &sessions[skip..];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No sessions recorded yet");
        println!();
        println!("Start one with: timefocus pomodoro");
        return Ok(());
    }

    for session in shown {
        let status = if session.completed {
            color(GREEN, "done")
        } else {
            color(YELLOW, "stopped")
        };
        let task = match (&session.kind, &session.task_label) {
            (SessionKind::Work, Some(task)) => task.as_str(),
            _ => "",
        };
        println!(
            "{}  {:12} {:>7}  {:7}  {}",
            session.timestamp.format("%Y-%m-%d %H:%M"),
            session.kind.as_str(),
            format_minutes(u64::from(session.duration_minutes)),
            status,
            task
        );
    }
    Ok(())
}

/// Delete the history after confirmation
fn cmd_reset(store: &HistoryStore, yes: bool) -> Result<()> {
    if !yes {
        let answer = prompt("Reset all data? This cannot be undone. (yes/no): ")?;
        if !answer.eq_ignore_ascii_case("yes") {
            println!("Reset cancelled");
            return Ok(());
        }
    }

    let removed = store.reset()?;
    println!(
        "{} All data reset ({} sessions removed)",
        color(GREEN, "[ok]"),
        removed
    );
    Ok(())
}

/// Ask a question on stdout and read one trimmed line. EOF reads as empty.
fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(answer.trim().to_string())
}
