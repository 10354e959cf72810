use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dosetrack_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dosetrack")]
#[command(about = "GLP-1 dose log and estimated medication level tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Medication to track (defaults to the configured regimen)
    #[arg(long, global = true)]
    medication: Option<String>,

    /// Reference time (RFC 3339) used instead of the current clock
    #[arg(long, global = true)]
    now: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an injection
    Log {
        /// Dose in mg
        #[arg(long)]
        dose: f64,

        /// When the dose was taken (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Free-form note (injection site, etc.)
        #[arg(long)]
        note: Option<String>,
    },

    /// Show the estimated medication level (default)
    Level {
        /// Evaluate at this time instead of now (RFC 3339)
        #[arg(long)]
        at: Option<String>,
    },

    /// Show when the next dose is due
    Next,

    /// Print or export the level curve for a chart period
    Curve {
        /// week, month, 90d or all
        #[arg(long, default_value = "week")]
        period: String,

        /// Write the curve to this CSV file instead of stdout
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Everything a command needs, resolved once from flags and config
struct Context {
    journal_path: PathBuf,
    medication: Medication,
    params: DecayParameters,
    now: DateTime<Utc>,
    config: Config,
}

fn main() -> Result<()> {
    dosetrack_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let (medication, params) = match cli.medication.as_deref() {
        Some(name) => {
            let medication: Medication = name.parse()?;
            let params = if medication == config.regimen.medication {
                config.regimen.decay_parameters()?
            } else {
                DecayParameters::for_medication(medication)
            };
            (medication, params)
        }
        None => (
            config.regimen.medication,
            config.regimen.decay_parameters()?,
        ),
    };

    let now = match cli.now.as_deref() {
        Some(s) => parse_time(s)?,
        None => Utc::now(),
    };

    tracing::debug!(
        "Tracking {} with half-life {} days, reference time {}",
        medication,
        params.half_life_days(),
        now
    );

    let ctx = Context {
        journal_path: data_dir.join("doses.jsonl"),
        medication,
        params,
        now,
        config,
    };

    match cli.command {
        Some(Commands::Log { dose, at, note }) => cmd_log(&ctx, dose, at, note),
        Some(Commands::Level { at }) => cmd_level(&ctx, at),
        Some(Commands::Next) => cmd_next(&ctx),
        Some(Commands::Curve { period, csv }) => cmd_curve(&ctx, &period, csv.as_deref()),
        None => cmd_level(&ctx, None),
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidInput(format!("invalid timestamp '{}': {}", s, e)))
}

fn cmd_log(ctx: &Context, dose: f64, at: Option<String>, note: Option<String>) -> Result<()> {
    let administered_at = match at.as_deref() {
        Some(s) => parse_time(s)?,
        None => ctx.now,
    };

    let record = DoseRecord::new(ctx.medication, dose, administered_at, note)?;
    let mut journal = JsonlJournal::new(&ctx.journal_path);
    journal.append(&record)?;

    println!(
        "✓ Dose logged: {} mg {} at {}",
        record.dose_mg,
        record.medication,
        record.administered_at.to_rfc3339()
    );
    Ok(())
}

fn cmd_level(ctx: &Context, at: Option<String>) -> Result<()> {
    let at = match at.as_deref() {
        Some(s) => parse_time(s)?,
        None => ctx.now,
    };

    let events = history::load_events_for(&ctx.journal_path, ctx.medication)?;
    if events.is_empty() {
        println!("No doses logged yet");
    }

    let level = current_level(&events, at, &ctx.params);
    println!("Estimated level: {:.3} mg", level);
    println!(
        "  {} (half-life {:.2} days), {} doses",
        ctx.medication,
        ctx.params.half_life_days(),
        events.len()
    );
    Ok(())
}

fn cmd_next(ctx: &Context) -> Result<()> {
    let events = history::load_events_for(&ctx.journal_path, ctx.medication)?;

    match next_due_date(&events, ctx.config.regimen.interval())? {
        Some(due) => {
            println!("Next dose due: {}", due.to_rfc3339());
            let hours = (due - ctx.now).num_hours();
            if hours >= 0 {
                println!("  in {}d {}h", hours / 24, hours % 24);
            } else {
                println!("  overdue by {}d {}h", -hours / 24, -hours % 24);
            }
        }
        None => println!("No doses logged yet"),
    }
    Ok(())
}

fn cmd_curve(ctx: &Context, period: &str, csv: Option<&Path>) -> Result<()> {
    let period: ChartPeriod = period.parse()?;
    let events = history::load_events_for(&ctx.journal_path, ctx.medication)?;

    let series = render_series(
        &events,
        period,
        ctx.now,
        ctx.config.chart.projection(),
        ctx.config.chart.max_points,
        &ctx.params,
    )?;

    if series.is_empty() {
        println!("No doses logged yet");
        return Ok(());
    }

    if let Some(path) = csv {
        let count = export::write_curve_csv(path, series.points(), ctx.now)?;
        println!("✓ Exported {} points to {}", count, path.display());
        return Ok(());
    }

    for point in &series.historical {
        println!("{}  {:>9.3}", point.at.to_rfc3339(), point.level_mg);
    }
    for point in &series.projected {
        println!("{}  {:>9.3}  *", point.at.to_rfc3339(), point.level_mg);
    }
    println!();
    println!("* projected, assuming no further doses");
    Ok(())
}
