//! Command line front end for the equity engine
//!
//! File commands (`calculate`, `normalize`, `denormalize`) work on standalone
//! sheet files. Everything else acts on a project stored under the data
//! directory, with participants taken from the roster file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::{component_debug, logging, ComponentId, Participant, ParticipantId};
use std::path::{Path, PathBuf};

use equity::core::rubric::FIXED_COLUMNS;
use equity::core::{Grid, SubmitterStatus};
use equity::{
    calculate_equity, to_dense, to_sparse, EngineConfig, EquityEngine, JsonFileStore, RubricSheet, SparseSheet,
    StaticRoster,
};

/// Cofounder equity split calculator
#[derive(Parser)]
#[command(name = "equity")]
#[command(about = "Scores contributions on a shared rubric and derives an equity split")]
struct Args {
    /// Base directory for project documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Project id (UUID)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Roster file listing the participants
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the split implied by a dense or sparse sheet file
    Calculate { file: PathBuf },

    /// Convert a dense sheet file to its persisted sparse form
    Normalize {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Convert a persisted sparse sheet back into a dense grid
    Denormalize {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Edit one cell of a participant's draft
    Edit {
        participant: String,
        row: usize,
        col: usize,
        /// New value; omit to clear the cell
        value: Option<String>,
    },

    /// Submit a participant's draft
    Submit { participant: String },

    /// Return a participant to editing
    Reopen { participant: String },

    /// Show submissions, splits and the final allocation
    Status {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Set or clear a participant's final percentage
    Allocate {
        participant: String,
        /// Percentage between 0 and 100
        #[arg(required_unless_present = "clear")]
        percentage: Option<f64>,
        #[arg(long, conflicts_with = "percentage")]
        clear: bool,
    },

    /// Acknowledge the final allocation
    Ack {
        participant: String,
        /// Write the acknowledgment for someone else (always refused)
        #[arg(long = "for")]
        target: Option<String>,
        /// Withdraw a previous acknowledgment
        #[arg(long)]
        revoke: bool,
    },

    /// Inspect or change the roster file
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },
}

#[derive(Subcommand)]
enum RosterAction {
    List,
    Add {
        id: String,
        name: String,
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ComponentId::init_cli();

    let config = EngineConfig::from_env()
        .with_data_dir(args.data_dir)
        .with_project_id(args.project)
        .with_roster_file(args.roster)
        .with_log_level(args.log_level);
    logging::init_tracing_with_level(Some(&config.log_level));
    config.validate()?;

    component_debug!(
        ComponentId::current(),
        "Data dir: {}, roster: {}",
        config.data_dir.display(),
        config.roster_file.display()
    );

    if let Err(err) = run(args.command, &config).await {
        logging::log_error(ComponentId::current(), "equity", &format!("{err:#}"));
        return Err(err);
    }
    Ok(())
}

async fn run(command: Command, config: &EngineConfig) -> anyhow::Result<()> {
    match command {
        Command::Calculate { file } => {
            let grid = read_grid(&file).await?;
            let sheet = RubricSheet::from_grid(&grid, &roster_from_header(&grid));
            match calculate_equity(&sheet) {
                Ok(split) => {
                    for share in split.shares() {
                        println!("{:<24} {:>8.3}%", share.name, share.percentage);
                    }
                }
                Err(err) => bail!("no valid split: {err}"),
            }
        }
        Command::Normalize { input, output } => {
            let grid = read_grid(&input).await?;
            write_output(output.as_deref(), &to_sparse(&grid)).await?;
        }
        Command::Denormalize { input, output } => {
            let bytes = tokio::fs::read(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;
            let sparse: SparseSheet = serde_json::from_slice(&bytes)?;
            write_output(output.as_deref(), &to_dense(&sparse)).await?;
        }
        Command::Roster { action } => {
            let mut roster = load_roster_or_empty(&config.roster_file).await?;
            match action {
                RosterAction::List => {
                    let mut participants = equity::Roster::participants(&roster).await?;
                    shared::sort_participants(&mut participants);
                    for p in participants {
                        let admin = if p.is_admin { " (admin)" } else { "" };
                        println!("{}\t{}{}", p.id, p.display_name, admin);
                    }
                }
                RosterAction::Add { id, name, admin } => {
                    let id = ParticipantId::parse(&id)?;
                    let mut participant = Participant::new(id.as_str(), name);
                    if admin {
                        participant = participant.admin();
                    }
                    roster.upsert(participant);
                    roster.save(&config.roster_file).await?;
                    logging::log_success(ComponentId::current(), &format!("Roster entry {id} saved"));
                }
            }
        }
        Command::Edit {
            participant,
            row,
            col,
            value,
        } => {
            let id = ParticipantId::parse(&participant)?;
            let engine = open_engine(config).await?;
            let outcome = engine.edit_draft_cell(&id, row, col, value.as_deref()).await?;
            match outcome {
                equity::EditOutcome::Accepted(v) => println!("({row}, {col}) = {v}"),
                equity::EditOutcome::Kept(v) => println!("invalid value, ({row}, {col}) kept at {v}"),
            }
        }
        Command::Submit { participant } => {
            let id = ParticipantId::parse(&participant)?;
            let engine = open_engine(config).await?;
            let split = engine.submit(&id).await?;
            for share in split.shares() {
                println!("{:<24} {:>8.3}%", share.name, share.percentage);
            }
            logging::log_success(ComponentId::current(), &format!("{id} submitted"));
        }
        Command::Reopen { participant } => {
            let id = ParticipantId::parse(&participant)?;
            let engine = open_engine(config).await?;
            let state = engine.back_to_edit(&id).await?;
            println!("{id}: {state:?}");
        }
        Command::Status { json } => print_status(&open_engine(config).await?, json).await?,
        Command::Allocate {
            participant,
            percentage,
            clear,
        } => {
            let id = ParticipantId::parse(&participant)?;
            let value = if clear { None } else { percentage };
            let engine = open_engine(config).await?;
            let allocation = engine.set_final_allocation(&id, value).await?;
            let roster = engine.participants().await?;
            println!("total {:.3}%", allocation.total(&roster));
        }
        Command::Ack {
            participant,
            target,
            revoke,
        } => {
            let actor = ParticipantId::parse(&participant)?;
            let target = match target {
                Some(t) => ParticipantId::parse(&t)?,
                None => actor.clone(),
            };
            let engine = open_engine(config).await?;
            let allocation = engine.acknowledge_for(&actor, &target, !revoke).await?;
            let roster = engine.participants().await?;
            if allocation.is_complete(&roster) {
                logging::log_success(ComponentId::current(), "Final allocation acknowledged by everyone");
            }
        }
    }
    Ok(())
}

/// Engine for the configured project, backed by the JSON store and roster file
async fn open_engine(config: &EngineConfig) -> anyhow::Result<EquityEngine<JsonFileStore, StaticRoster>> {
    let project = config.resolve_project().await?;
    let roster = StaticRoster::load(&config.roster_file)
        .await
        .with_context(|| format!("loading roster {}", config.roster_file.display()))?;
    let store = JsonFileStore::with_base_dir(config.data_dir.clone());

    logging::log_startup(ComponentId::current(), &format!("project {project}"));
    Ok(EquityEngine::new(project, store, roster))
}

#[derive(Serialize)]
struct StatusReport {
    consensus: equity::ConsensusView,
    revealed_average: Option<equity::EquitySplit>,
    allocation: equity::FinalAllocation,
    allocation_total: f64,
    outstanding_acknowledgments: Vec<String>,
}

async fn print_status(engine: &EquityEngine<JsonFileStore, StaticRoster>, json: bool) -> anyhow::Result<()> {
    let roster = engine.participants().await?;
    let consensus = engine.consensus().await?;
    let allocation = engine.final_allocation().await?;

    if json {
        let report = StatusReport {
            revealed_average: consensus.revealed_average(),
            allocation_total: allocation.total(&roster),
            outstanding_acknowledgments: allocation.outstanding_acknowledgments(&roster),
            consensus,
            allocation,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Submissions");
    for view in consensus.submitters() {
        let status = match &view.status {
            SubmitterStatus::Pending => "pending".to_string(),
            SubmitterStatus::NoValidAssessment { reason } => format!("no valid assessment ({reason})"),
            SubmitterStatus::Valid { split } => split
                .shares()
                .iter()
                .map(|s| format!("{} {:.3}%", s.name, s.percentage))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("  {:<24} {}", view.participant.display_name, status);
    }

    match consensus.revealed_average() {
        Some(average) => {
            println!("Average");
            for share in average.shares() {
                println!("  {:<24} {:>8.3}%", share.name, share.percentage);
            }
        }
        None => println!("Average hidden until everyone submits ({} pending)", consensus.pending().len()),
    }

    println!("Final allocation");
    for participant in &roster {
        let pct = allocation
            .percentage(&participant.id)
            .map(|p| format!("{p:.3}%"))
            .unwrap_or_else(|| "-".to_string());
        let ack = if allocation.is_acknowledged(&participant.id) { "acknowledged" } else { "" };
        println!("  {:<24} {:>9} {}", participant.display_name, pct, ack);
    }
    println!("  total {:.3}%", allocation.total(&roster));
    if let Some(blocker) = allocation.ack_blocker(&roster) {
        println!("  {blocker}");
    }
    Ok(())
}

/// Read a sheet file in either the dense grid or the sparse persisted form
async fn read_grid(path: &Path) -> anyhow::Result<Grid> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        let sparse: SparseSheet = serde_json::from_value(value)?;
        Ok(to_dense(&sparse))
    }
}

/// Participants named by a standalone sheet's header row
fn roster_from_header(grid: &Grid) -> Vec<Participant> {
    grid.first()
        .map(|header| {
            header
                .iter()
                .enumerate()
                .skip(FIXED_COLUMNS)
                .map(|(col, cell)| Participant::new(format!("col_{col}"), cell.value.as_text()))
                .collect()
        })
        .unwrap_or_default()
}

async fn write_output<T: Serialize>(output: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => tokio::fs::write(path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{content}"),
    }
    Ok(())
}

async fn load_roster_or_empty(path: &Path) -> anyhow::Result<StaticRoster> {
    if tokio::fs::try_exists(path).await? {
        Ok(StaticRoster::load(path).await?)
    } else {
        Ok(StaticRoster::default())
    }
}
