// src/main.rs - Command-line front end for proof verification
// Tree location: ./src/main.rs

//! cuckoo-pow Main Entry Point
//!
//! Handles command-line arguments, loads settings and runs single or batch
//! proof verification. Exits with a non-zero status when any proof is
//! rejected.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::{Parser, Subcommand};
use cuckoo_pow::{
    algorithms::Algorithm,
    config::Settings,
    consensus::ChainType,
    init_with_filter,
    pow::{parse_nonces, VerifyRequest},
    CuckooPowError, Result,
};

#[derive(Parser)]
#[command(name = "cuckoo-pow")]
#[command(about = "Verify Cuckoo Cycle proofs of work for Grin-style chains")]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Chain type override (main, floo, user, auto)
    #[arg(long, global = true)]
    chain: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a single proof
    Verify {
        /// Block height
        #[arg(long, default_value = "0")]
        height: u64,
        /// Graph size in edge bits
        #[arg(short, long, default_value = "31")]
        edge_bits: u8,
        /// Pre-PoW header (hex)
        #[arg(long)]
        header: String,
        /// Mining nonce written over the header tail
        #[arg(short, long)]
        nonce: Option<u32>,
        /// Comma separated cycle nonces (decimal or 0x hex)
        #[arg(long)]
        proof: String,
    },
    /// Verify a JSON array of requests concurrently
    Batch {
        /// JSON file of verification requests
        file: PathBuf,
    },
    /// Show fork schedules and the variant used at each header version
    Info,
    /// Show the effective configuration
    Config,
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        println!("{} Error: {}", timestamp(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(chain) = &cli.chain {
        settings.chain_type = chain.parse()?;
    }
    init_with_filter(&settings.log_filter)?;

    match cli.command {
        Commands::Verify {
            height,
            edge_bits,
            header,
            nonce,
            proof,
        } => {
            let request = VerifyRequest {
                chain_type: Some(settings.chain_type),
                height,
                edge_bits,
                pre_pow: header,
                nonce,
                nonces: parse_nonces(&proof)?,
            };
            verify_single(&settings, request)
        }
        Commands::Batch { file } => verify_batch(&settings, file).await,
        Commands::Info => {
            show_info(&settings);
            Ok(())
        }
        Commands::Config => show_config(&settings),
    }
}

fn verify_single(settings: &Settings, request: VerifyRequest) -> Result<()> {
    let timestamp = timestamp();
    println!(
        "{} Chain: {} Height: {} Edge bits: {} Nonces: {}",
        timestamp,
        settings.chain_type,
        request.height,
        request.edge_bits,
        request.nonces.len()
    );

    let start_time = Instant::now();
    let algorithm = request.verify(settings)?;
    println!(
        "{} {}{} proof accepted in {:.2}ms",
        timestamp,
        algorithm.name(),
        request.edge_bits,
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

async fn verify_batch(settings: &Settings, file: PathBuf) -> Result<()> {
    let raw = tokio::fs::read_to_string(&file).await?;
    let requests: Vec<VerifyRequest> = serde_json::from_str(&raw)?;

    println!(
        "{} Verifying {} proofs from {} with {} workers",
        timestamp(),
        requests.len(),
        file.display(),
        settings.batch_workers
    );

    let start_time = Instant::now();
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for (chunk_index, chunk) in requests.chunks(settings.batch_workers).enumerate() {
        let handles: Vec<_> = chunk
            .iter()
            .cloned()
            .map(|request| {
                let settings = settings.clone();
                tokio::task::spawn_blocking(move || request.verify(&settings))
            })
            .collect();

        for (offset, handle) in handles.into_iter().enumerate() {
            let index = chunk_index * settings.batch_workers + offset;
            let outcome = handle
                .await
                .map_err(|e| CuckooPowError::Input(format!("worker failed: {}", e)))?;
            match outcome {
                Ok(algorithm) => {
                    accepted += 1;
                    println!("{} #{} {} accepted", timestamp(), index, algorithm.name());
                }
                Err(e) => {
                    rejected += 1;
                    println!("{} #{} rejected: {}", timestamp(), index, e);
                }
            }
        }
    }

    println!(
        "{} Batch completed: {} accepted, {} rejected in {:.2}s",
        timestamp(),
        accepted,
        rejected,
        start_time.elapsed().as_secs_f64()
    );

    if rejected > 0 {
        return Err(CuckooPowError::Input(format!(
            "{} of {} proofs rejected",
            rejected,
            requests.len()
        )));
    }
    Ok(())
}

fn show_info(settings: &Settings) {
    println!("{} v{}", cuckoo_pow::NAME, cuckoo_pow::VERSION);

    println!("\nSecondary PoW by header version:");
    for version in 1..=5u16 {
        let variant = Algorithm::for_header_version(version)
            .map(|a| a.name())
            .unwrap_or("none (primary only)");
        println!("  v{}: {}", version, variant);
    }

    println!("\nHard forks:");
    for chain_type in ChainType::ALL {
        let schedule = settings.fork_schedule(chain_type);
        if schedule.heights().is_empty() {
            println!("  {}: Cuckatoo only", chain_type);
            continue;
        }
        let heights: Vec<String> = schedule.heights().iter().map(|h| h.to_string()).collect();
        println!("  {}: {}", chain_type, heights.join(", "));
    }

    println!("\nProof sizes:");
    for chain_type in ChainType::ALL {
        println!(
            "  {}: {} nonces, min edge bits {}",
            chain_type,
            chain_type.proof_size(),
            chain_type.min_edge_bits()
        );
    }
}

fn show_config(settings: &Settings) -> Result<()> {
    println!("cuckoo-pow Configuration:");
    println!("{}", settings.to_json()?);
    Ok(())
}
