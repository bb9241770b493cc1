use std::path::PathBuf;
use std::process;

use clap::Parser;
use lander::config::TrainingConfig;
use lander::env::{Environment, LanderConfig, LunarLander};
use lander::error::Result;
use lander::q_network::QNetwork;
use lander::report::{export_scores_csv, export_scores_json, plot_scores, ScoreSummary};
use lander::trainer::{streams, Trainer};

/// Train a Q-network to land the lunar module
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON training configuration; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of episodes
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Seed every random stream of the run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the episode scores to this file (CSV for a `.csv` extension, JSON otherwise)
    #[arg(long)]
    scores_out: Option<PathBuf>,

    /// Skip the score chart
    #[arg(long, default_value_t = false)]
    no_plot: bool,
}

fn run(args: &Args) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::load(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(episodes) = args.episodes {
        config = config.total_episodes(episodes);
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    config.validate()?;

    let env = LunarLander::new(LanderConfig::default(), config.rng(streams::ENVIRONMENT));
    let network = QNetwork::from_config(
        &config,
        env.observation_dim(),
        env.action_space(),
        &mut config.rng(streams::WEIGHTS),
    )?;

    let mut trainer = Trainer::new(config, env, network)?;
    let outcome = trainer.run_with(|summary| {
        println!("Score for episode {}: {}", summary.episode, summary.score);
    })?;

    if !args.no_plot {
        println!("{}", plot_scores(&outcome.scores, 60, 20));
    }
    if let Some(summary) = ScoreSummary::from_scores(&outcome.scores) {
        log::info!(
            "{} episodes, mean {:.2}, best {:.2}, worst {:.2}, last 100 mean {:.2}",
            summary.episodes,
            summary.mean,
            summary.best,
            summary.worst,
            summary.last_100_mean
        );
    }

    if let Some(path) = &args.scores_out {
        let is_csv = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            export_scores_csv(path, &outcome.scores)?;
        } else {
            export_scores_json(path, &outcome.scores)?;
        }
        log::info!("scores written to {}", path.display());
    }

    Ok(outcome.success)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => println!("We win!"),
        Ok(false) => println!("We lose..."),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
