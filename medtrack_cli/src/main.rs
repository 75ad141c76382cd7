use chrono::Local;
use clap::{Parser, Subcommand};
use medtrack_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "Daily medication schedule and adherence tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's schedule and progress (default)
    Today,

    /// Mark a dose as taken
    Take {
        /// Dose id from today's schedule
        id: u32,
    },

    /// Record today's adherence in the history
    CloseDay {
        /// Label for the day (defaults to today's date)
        #[arg(long)]
        label: Option<String>,
    },

    /// Show the adherence trend
    Trend {
        /// Days in the trailing window (defaults to config)
        #[arg(long)]
        window: Option<usize>,
    },

    /// List medications that need a refill
    Refills,
}

/// Files kept in the data directory
struct DataPaths {
    schedule: PathBuf,
    events: PathBuf,
    history: PathBuf,
    supplies: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            schedule: data_dir.join("schedule.json"),
            events: data_dir.join("events").join("dose_events.wal"),
            history: data_dir.join("adherence.csv"),
            supplies: data_dir.join("supplies.json"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        medtrack_core::logging::init_with_level("debug");
    } else {
        medtrack_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Some(Commands::Today) | None => cmd_today(&paths),
        Some(Commands::Take { id }) => cmd_take(&paths, DoseId(id)),
        Some(Commands::CloseDay { label }) => cmd_close_day(&paths, label),
        Some(Commands::Trend { window }) => cmd_trend(&paths, window, &config),
        Some(Commands::Refills) => cmd_refills(&paths, &config),
    }
}

fn cmd_today(paths: &DataPaths) -> Result<()> {
    let store = ScheduleStore::load(&paths.schedule)?;

    println!("Today's schedule");
    println!("─────────────────────────────────────────");

    if store.count_total() == 0 {
        println!("  No doses scheduled for today.");
    }

    for entry in store.entries() {
        display_entry(entry);
    }

    println!();
    print_progress(&store);

    let now = Local::now().time();
    if let Some(next) = next_pending_after(store.entries(), now) {
        println!(
            "Next medication: {} {} {} ({} pending)",
            next.scheduled_time.format("%H:%M"),
            next.medication_name,
            next.dosage,
            pending_count(store.entries())
        );
    } else if store.count_total() > 0 {
        println!("All doses taken for today.");
    }

    Ok(())
}

fn cmd_take(paths: &DataPaths, id: DoseId) -> Result<()> {
    // Event must be on disk before the schedule records Taken
    let (before, after) = ScheduleStore::update(&paths.schedule, |store| {
        let next = store.mark_taken(id);
        if let (Some(was), Some(now)) = (store.get(id), next.get(id)) {
            if was.is_pending() && now.is_taken() {
                let event = DoseEvent::for_entry(now, chrono::Utc::now());
                let mut sink = JsonlSink::new(&paths.events);
                sink.append(&event)?;
            }
        }
        Ok(next)
    })?;

    match (before.get(id), after.get(id)) {
        (Some(was), Some(now)) if was.is_pending() && now.is_taken() => {
            println!("✓ Logged {} {}", now.medication_name, now.dosage);
        }
        (Some(was), _) => {
            println!("{} {} was already taken.", was.medication_name, was.dosage);
        }
        (None, _) => {
            tracing::debug!("Take requested for unknown dose {}", id);
            println!("No dose with id {} in today's schedule.", id);
        }
    }

    print_progress(&after);
    Ok(())
}

fn cmd_close_day(paths: &DataPaths, label: Option<String>) -> Result<()> {
    let store = ScheduleStore::load(&paths.schedule)?;
    let label = label.unwrap_or_else(|| Local::now().date_naive().to_string());

    let sample = sample_from_entries(label, store.entries());
    append_sample(&paths.history, &sample)?;

    println!(
        "✓ Recorded {}% adherence for {}",
        sample.percentage(),
        sample.label()
    );
    Ok(())
}

fn cmd_trend(paths: &DataPaths, window: Option<usize>, config: &Config) -> Result<()> {
    let window = window.unwrap_or(config.adherence.window_days);
    if window == 0 {
        return Err(Error::Config("--window must be at least 1".into()));
    }

    let samples = load_samples(&paths.history)?;
    if samples.is_empty() {
        println!("No adherence history yet.");
        return Ok(());
    }

    let goal = config.adherence.goal_percentage;
    let summary = summarize(&samples, goal);

    println!(
        "Overall adherence: {}% over {} days",
        summary.average, summary.days
    );
    println!(
        "Last {} days: {}%",
        window.min(samples.len()),
        trailing_average(&samples, window)
    );
    println!("Lowest: {}%  Highest: {}%", summary.lowest, summary.highest);
    println!(
        "Days at or above {}%: {}/{}",
        goal, summary.days_at_or_above_goal, summary.days
    );

    println!();
    println!("  {:<12} {:>5} {:>9}", "Day", "Daily", "Smoothed");
    let smoothed = rolling_window(&samples, window);
    for (sample, avg) in samples.iter().zip(smoothed) {
        println!(
            "  {:<12} {:>4}% {:>8}%",
            sample.label(),
            sample.percentage(),
            avg
        );
    }

    Ok(())
}

fn cmd_refills(paths: &DataPaths, config: &Config) -> Result<()> {
    let supplies = load_supplies(&paths.supplies)?;
    let low = low_stock(&supplies, config.inventory.low_stock_threshold);

    println!("Refills needed: {}", low.len());
    for supply in low {
        println!(
            "  {}: {} remaining",
            supply.medication_name, supply.remaining
        );
    }

    Ok(())
}

fn display_entry(entry: &DoseEntry) {
    let mark = if entry.is_taken() { "✓" } else { " " };
    println!(
        "  [{}] #{:<3} {}  {} {}  ({})",
        mark,
        entry.id.0,
        entry.scheduled_time.format("%H:%M"),
        entry.medication_name,
        entry.dosage,
        entry.status
    );
    if let Some(ref instructions) = entry.instructions {
        println!("            {}", instructions);
    }
}

fn print_progress(store: &ScheduleStore) {
    println!(
        "Taken: {}/{} ({}%)",
        store.count_taken(),
        store.count_total(),
        store.today_percentage()
    );
}
