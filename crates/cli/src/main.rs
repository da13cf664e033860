//! FundTrace CLI - Main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use fundtrace_chain::{verify_blocks, Block, EvidenceRefs};
use fundtrace_core::{Amount, ProjectId};
use fundtrace_engine::{Decision, DisbursementEngine, EngineError, PayoutRequest};
use fundtrace_treasury::Project;
use image::{ImageBuffer, Luma};
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fundtrace")]
#[command(about = "FundTrace - Milestone-gated public funds disbursement", long_about = None)]
struct Cli {
    /// Data directory for evidence images and ledger exports
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted disbursement scenario and export the ledger
    Demo,

    /// Verify an exported ledger (hash chain and linkage)
    Verify {
        /// Path to the exported ledger JSON
        ledger: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => demo(&cli.data),
        Commands::Verify { ledger } => verify(&ledger),
    }
}

/// Write a flat grayscale PNG used as synthetic site evidence
fn write_evidence(dir: &Path, name: &str, value: u8) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    let img = ImageBuffer::from_pixel(64, 64, Luma([value]));
    img.save(&path)
        .with_context(|| format!("writing evidence image {}", path.display()))?;
    Ok(path)
}

/// End-to-end scenario: project registration, milestone releases, a
/// payout through both gates, a refused payout, a top-up approval and
/// a verified ledger export.
fn demo(data: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data)
        .with_context(|| format!("creating data directory {}", data.display()))?;

    let mut engine = DisbursementEngine::standard();
    let p1 = ProjectId::new("HWAY-7");

    engine.create_project(
        p1.clone(),
        "Highway 7 Resurfacing",
        Amount::new(dec!(1000000))?,
        "Bluebridge Constructions",
        Project::default_milestones(),
    )?;
    println!("✅ Project HWAY-7 registered (budget 1,000,000)");

    let release = engine.release_next_milestone(&p1)?;
    println!(
        "✅ {} released: {} credited to contractor",
        release.milestone, release.amount
    );

    // A payout backed by evidence that actually changed.
    let before = write_evidence(data, "site_before.png", 40)?;
    let after = write_evidence(data, "site_after.png", 200)?;
    let receipt = engine.attempt_payout(PayoutRequest {
        project_id: p1.clone(),
        recipient: "Steel Supplier".to_string(),
        amount: Amount::new(dec!(45000))?,
        before: before.clone(),
        after,
    })?;
    println!(
        "✅ Payout of {} to {} (progress score {:.4}, block #{})",
        receipt.payment.amount, receipt.payment.to, receipt.progress_score, receipt.block_index
    );

    // The same image twice shows no progress; the refusal is recorded.
    match engine.attempt_payout(PayoutRequest {
        project_id: p1.clone(),
        recipient: "Steel Supplier".to_string(),
        amount: Amount::new(dec!(45000))?,
        before: before.clone(),
        after: before.clone(),
    }) {
        Err(EngineError::ProgressCheckFailed { score, threshold, .. }) => {
            println!("❌ Payout refused: score {score:.4} below threshold {threshold} (recorded)");
        }
        Err(err) => println!("❌ Payout refused: {err} (recorded)"),
        Ok(_) => println!("⚠️  Unchanged evidence unexpectedly passed"),
    }

    // Contractor asks for the next tranche; government approves.
    let request_id = engine
        .request_funding(
            p1.clone(),
            "Bluebridge Constructions",
            EvidenceRefs::new(
                before.to_string_lossy(),
                data.join("site_after.png").to_string_lossy(),
            ),
        )?
        .id
        .clone();
    let resolution = engine.resolve_request(&request_id, Decision::Approve, "government")?;
    if let Some(release) = resolution.release {
        println!(
            "✅ Request {request_id} approved: {} released ({})",
            release.amount, release.milestone
        );
    }

    // A top-up beyond the milestone plan, approved after review.
    let top_up_id = engine
        .request_top_up(
            p1.clone(),
            "Bluebridge Constructions",
            Amount::new(dec!(25000))?,
            "monsoon damage repairs",
        )?
        .id
        .clone();
    engine.resolve_request(&top_up_id, Decision::Approve, "government")?;
    println!("✅ Top-up {top_up_id} approved: 25,000 credited");

    let stats = engine.project_stats();
    println!(
        "📊 {} project(s), {} active, released {} of {}",
        stats.total_projects, stats.active_projects, stats.total_released, stats.total_budget
    );

    engine.verify_ledger()?;
    let export = data.join("ledger.json");
    let json = serde_json::to_string_pretty(engine.ledger().blocks())?;
    std::fs::write(&export, json)
        .with_context(|| format!("writing ledger export {}", export.display()))?;
    println!(
        "✅ Ledger verified ({} blocks), exported to {}",
        engine.ledger().len(),
        export.display()
    );

    Ok(())
}

fn verify(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading ledger export {}", path.display()))?;
    let blocks: Vec<Block> =
        serde_json::from_str(&content).context("parsing ledger export")?;

    match verify_blocks(&blocks) {
        Ok(()) => {
            println!("✅ Hash chain verified ({} blocks)", blocks.len());
            Ok(())
        }
        Err(err) => {
            println!("❌ Hash chain broken: {err}");
            std::process::exit(1);
        }
    }
}
