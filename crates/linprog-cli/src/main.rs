use clap::{Parser, Subcommand, ValueEnum};
use linprog_model::{Problem, print_summary, print_table, write_json};
use linprog_solver::{Backend, CbcBackend, SimplexBackend, SolverConfig};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod scenarios;

use scenarios::{Runner, STEPS, Schedule};

#[derive(Parser)]
#[command(name = "linprog")]
#[command(about = "Build, solve and report small linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty, global = true)]
    format: Format,

    /// Solver backend
    #[arg(short, long, value_enum, default_value_t = BackendKind::Simplex, global = true)]
    backend: BackendKind,

    /// TOML file with solver settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also write each model in LP format into this directory
    #[arg(long, value_name = "DIR", global = true)]
    write_lp: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Minimize 3x - 5y with an integer y
    Simple,
    /// Maximize utility of four goods under a budget
    Utility,
    /// Schedule household appliances against hourly prices
    Schedule,
    /// Run every model in turn
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendKind {
    Simplex,
    Cbc,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading solver config");
            SolverConfig::load(path)?
        }
        None => SolverConfig::default(),
    };

    let simplex = SimplexBackend;
    let cbc = CbcBackend::new();
    let backend: &dyn Backend = match cli.backend {
        BackendKind::Simplex => &simplex,
        BackendKind::Cbc => &cbc,
    };
    info!(backend = backend.name(), "running models");

    let runner = Runner { backend, config };
    let all = cli.command == Commands::All;

    if all || cli.command == Commands::Simple {
        let problem = runner.simple_minimization()?;
        report(cli, &problem, "simple")?;
    }
    if all || cli.command == Commands::Utility {
        let problem = runner.maximize_utility()?;
        report(cli, &problem, "utility")?;
    }
    if all || cli.command == Commands::Schedule {
        let schedule = runner.appliance_schedule()?;
        report(cli, &schedule.problem, "schedule")?;
        if matches!(cli.format, Format::Pretty) && schedule.problem.status().is_optimal() {
            println!();
            print_table(&schedule.problem, &schedule.on, &STEPS, &Schedule::appliance_names())?;
        }
    }
    Ok(())
}

fn report(cli: &Cli, problem: &Problem, stem: &str) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = &cli.write_lp {
        write_lp_file(problem, dir, stem)?;
    }
    match cli.format {
        Format::Pretty => {
            println!("== {} ==", problem.name());
            print_summary(problem)?;
            println!();
        }
        Format::Json => write_json(problem, std::io::stdout().lock())?,
    }
    Ok(())
}

fn write_lp_file(problem: &Problem, dir: &Path, stem: &str) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.lp", stem));
    problem.write_lp(std::fs::File::create(&path)?)?;
    info!(path = %path.display(), "wrote LP file");
    Ok(())
}
