use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use sw_study::{
    RunSummary, StudyConfig, StudyResult, load_yaml, run_buck_study, run_spring_mass_study,
    study_figures, validate_config,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sw-cli")]
#[command(about = "Stepwise CLI - fixed-step integrator comparison", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Study configuration YAML (defaults to the reference experiment)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the plot description as JSON to this file
    #[arg(long)]
    figure: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare Forward and Backward Euler on the spring-mass system
    SpringMass(RunArgs),
    /// Integrate the buck converter with RK4
    Buck(RunArgs),
    /// Run both studies
    Study(RunArgs),
    /// Print the default configuration as YAML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> StudyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::SpringMass(args) => cmd_run(&args, true, false),
        Commands::Buck(args) => cmd_run(&args, false, true),
        Commands::Study(args) => cmd_run(&args, true, true),
        Commands::Config { output } => cmd_config(output.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> StudyResult<StudyConfig> {
    match path {
        Some(path) => {
            println!("Loading config: {}", path.display());
            load_yaml(path)
        }
        None => {
            let config = StudyConfig::default();
            validate_config(&config)?;
            Ok(config)
        }
    }
}

fn cmd_run(args: &RunArgs, spring_mass: bool, buck: bool) -> StudyResult<()> {
    let config = load_config(args.config.as_deref())?;

    let runs = if spring_mass {
        println!("Running spring-mass study");
        let runs = run_spring_mass_study(&config)?;
        for run in &runs {
            print_summary(&run.summary());
        }
        runs
    } else {
        Vec::new()
    };

    let buck_run = if buck {
        println!("Running buck converter study");
        let run = run_buck_study(&config)?;
        print_summary(&run.summary());
        println!(
            "  Steady state: iL = {:.4} A, uC = {:.4} V",
            run.steady_state.0, run.steady_state.1
        );
        Some(run)
    } else {
        None
    };

    let figures = study_figures(&runs, buck_run.as_ref())?;
    for figure in &figures {
        println!("✓ {} ({} panels)", figure.title, figure.panels.len());
    }
    if let Some(path) = &args.figure {
        std::fs::write(path, serde_json::to_string_pretty(&figures)?)?;
        tracing::info!(path = %path.display(), figures = figures.len(), "figures written");
        println!("✓ Wrote figures to {}", path.display());
    }
    Ok(())
}

fn cmd_config(output: Option<&Path>) -> StudyResult<()> {
    let yaml = serde_yaml::to_string(&StudyConfig::default())?;
    if let Some(path) = output {
        std::fs::write(path, yaml)?;
        println!("✓ Wrote default config to {}", path.display());
    } else {
        print!("{}", yaml);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let finals: Vec<String> = summary
        .final_values
        .iter()
        .map(|v| format!("{:.6}", v))
        .collect();
    let status = if summary.finite { "✓" } else { "✗" };
    println!(
        "{} {:<28} samples={:<5} max|y|={:<10.6} t={:.5} final=[{}]",
        status,
        summary.label,
        summary.samples,
        summary.max_abs,
        summary.final_t,
        finals.join(", ")
    );
}
