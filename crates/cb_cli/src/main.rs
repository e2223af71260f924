//! Carball headless runner
//!
//! AI 대 AI 경기를 렌더링 없이 실행하고 JSON 요약을 출력한다.
//! Also dumps preset configs as YAML for editing.

use anyhow::{bail, Context, Result};
use cb_core::engine::timestep::ticks_for;
use cb_core::engine::{
    AiDriver, BallHitInfo, Driver, EngineConfig, GoalEvent, MatchPhase, Score, Simulation, Team,
    NOMINAL_DT,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cb_cli")]
#[command(about = "Run headless vehicle-soccer matches", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one AI-vs-AI match and print a JSON summary
    Run {
        /// Config file (.json / .yaml / .yml); overrides --preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset (default, arcade, simulation, unlimited_boost, deterministic)
        #[arg(long, default_value = "default")]
        preset: String,

        /// Kickoff RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Match length in seconds
        #[arg(long)]
        duration: Option<f32>,

        /// Pretty-print the summary
        #[arg(long, default_value = "false")]
        pretty: bool,

        /// Also print the final frame snapshot
        #[arg(long, default_value = "false")]
        final_frame: bool,
    },

    /// Print a preset as YAML
    Config {
        #[arg(default_value = "default")]
        preset: String,
    },
}

#[derive(Serialize)]
struct MatchSummary {
    seed: u64,
    match_duration: f32,
    ticks: u64,
    score: Score,
    winner: Option<Team>,
    goals: Vec<GoalEvent>,
    touches: TeamCounts,
    ball_recoveries: u32,
}

#[derive(Serialize, Default)]
struct TeamCounts {
    blue: u32,
    orange: u32,
}

impl TeamCounts {
    fn count(&mut self, hit: &BallHitInfo) {
        match hit.team {
            Team::Blue => self.blue += 1,
            Team::Orange => self.orange += 1,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Run { config, preset, seed, duration, pretty, final_frame } => {
            let mut cfg = load_config(config, &preset)?;
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if let Some(duration) = duration {
                cfg.match_rules.match_duration = duration;
            }
            cfg.validate().context("invalid configuration")?;
            run_match(cfg, pretty, final_frame)?;
        }

        Commands::Config { preset } => {
            let cfg = preset_or_err(&preset)?;
            print!("{}", cfg.to_yaml_string()?);
        }
    }

    Ok(())
}

fn preset_or_err(name: &str) -> Result<EngineConfig> {
    match EngineConfig::preset(name) {
        Some(cfg) => Ok(cfg),
        None => bail!("unknown preset: {name}"),
    }
}

fn load_config(path: Option<PathBuf>, preset: &str) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(&path).with_context(|| format!("loading {}", path.display())),
        None => preset_or_err(preset),
    }
}

fn run_match(cfg: EngineConfig, pretty: bool, final_frame: bool) -> Result<()> {
    let seed = cfg.seed;
    let match_duration = cfg.match_rules.match_duration;
    let countdown = cfg.match_rules.countdown_duration;
    let ai = cfg.ai.clone();

    let mut sim = Simulation::headless(cfg)?;
    sim.set_driver(Team::Blue, Driver::Ai(AiDriver::new(ai)));
    info!(seed, match_duration, "match start");

    // Every goal adds a countdown; this bounds a pathological goal storm
    let max_frames = u64::from(ticks_for(match_duration * 2.0 + countdown * 100.0));

    let mut goals = Vec::new();
    let mut touches = TeamCounts::default();
    let mut ball_recoveries = 0;
    let mut frames = 0u64;

    while !sim.clock().is_over() {
        if frames >= max_frames {
            bail!("match did not finish within {max_frames} frames");
        }
        let report = sim.step(NOMINAL_DT)?;
        frames += 1;

        for hit in &report.hits {
            touches.count(hit);
        }
        if report.ball_recovered {
            ball_recoveries += 1;
        }
        if let Some(goal) = report.goal {
            goals.push(goal);
        }
        if report.phase_change == Some(MatchPhase::Over) {
            break;
        }
    }

    let score = sim.score();
    let summary = MatchSummary {
        seed,
        match_duration,
        ticks: sim.tick(),
        score,
        winner: sim.clock().winner(),
        goals,
        touches,
        ball_recoveries,
    };
    info!(blue = score.blue, orange = score.orange, ticks = summary.ticks, "match finished");

    let json = if pretty { serde_json::to_string_pretty(&summary)? } else { serde_json::to_string(&summary)? };
    println!("{json}");

    if final_frame {
        println!("{}", sim.snapshot()?.to_json()?);
    }
    Ok(())
}
