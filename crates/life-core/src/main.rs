//! Life Together
//!
//! Headless driver for the relationship simulation: starts or loads a
//! session, plays a number of days automatically and prints what happened.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use life_core::config::default_config_toml;
use life_core::content::load_content;
use life_core::{EngineConfig, NewGameOptions, Session, TurnReport};
use life_events::DifficultyLevel;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "life_sim")]
#[command(about = "A turn-based relationship and life simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of days to play
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// cozy, balanced, dramatic or chaotic
    #[arg(long, default_value = "balanced")]
    difficulty: DifficultyLevel,

    /// Comma-separated partner names
    #[arg(long, value_delimiter = ',', default_value = "Riley")]
    partners: Vec<String>,

    /// Player name
    #[arg(long, default_value = "Jordan")]
    player: String,

    /// Allow intimate events
    #[arg(long)]
    intimate: bool,

    /// Content directory
    #[arg(long, default_value = "content")]
    content: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume from a saved session instead of starting a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the session here when done
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn print_turn(turn: &TurnReport) {
    let day = &turn.day;
    let weather = day.weather.map(|w| format!(" ({})", w)).unwrap_or_default();
    println!("[Day {:>4}]{} energy {}", day.day, weather, day.energy);

    if let Some(season) = day.season {
        println!("    The season turns to {}", season);
    }
    for line in &day.anniversaries {
        println!("    {}", line);
    }
    if let Some(arc) = &day.arc_started {
        println!("    A new story begins: {}", arc);
    }
    if let Some(moment) = &day.daily_moment {
        println!("    {}", moment);
    }
    for surprise in &day.surprises_revealed {
        println!("    {} surprised you: {}", surprise.partner, surprise.kind);
    }
    for goal in &day.goals_completed {
        println!("    Goal achieved: {}", goal);
    }
    for achievement in &day.achievements {
        println!("    Achievement unlocked: {}", achievement);
    }

    for resolved in turn.event.iter().chain(turn.cascade.iter()) {
        let verdict = if resolved.outcome.success { "success" } else { "failure" };
        println!(
            "    {} - rolled {} vs DC {} ({})",
            resolved.event.title, resolved.outcome.roll, resolved.outcome.adjusted_dc, verdict
        );
        if let Some(joke) = &resolved.bonding.inside_joke {
            println!("    New inside joke: {}", joke);
        }
    }
    for resolved in &turn.partner_actions {
        let verdict = if resolved.outcome.success { "success" } else { "failure" };
        println!(
            "    {}: {} ({})",
            resolved.action.partner, resolved.action.event.title, verdict
        );
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.print_default_config {
        print!("{}", default_config_toml());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let content = load_content(&args.content);

    let mut session = match &args.load {
        Some(path) => Session::load(path, content, config, args.seed)?,
        None => {
            let options = NewGameOptions::new(args.player.clone(), args.partners.clone())
                .with_difficulty(args.difficulty)
                .with_intimate(args.intimate);
            Session::new_game(options, content, config, args.seed)
        }
    };

    println!("Life Together");
    println!("=============");
    println!("Seed: {}", args.seed);
    println!("Days: {}", args.days);
    println!();

    for _ in 0..args.days {
        let turn = session.play_day();
        print_turn(&turn);
    }

    println!();
    print!("{}", session.summary());

    if let Some(path) = &args.save {
        session.save(path)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
