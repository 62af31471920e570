use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::info;

use rs_speaker_core::io::read_text;
use rs_speaker_core::{Backend, IdentifyRequest, identify_speaker, identify_speaker_with};

#[derive(Parser)]
#[command(author, version, about = "Guess which of two speakers produced a text", long_about = None)]
struct ArgParser {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print both normalized scores and the most likely speaker
    Identify {
        #[command(flatten)]
        texts: TextArgs,

        /// Count store: "table" (custom hash table) or "native" (std HashMap)
        #[arg(long, default_value = "table")]
        backend: Backend,

        /// Build both speaker models on two threads
        #[arg(long)]
        parallel: bool,
    },

    /// Time both backends for every k from 1 to K
    Bench {
        #[command(flatten)]
        texts: TextArgs,

        /// Number of runs averaged for each (backend, k)
        #[arg(long, default_value_t = 3)]
        runs: usize,
    },
}

#[derive(clap::Args)]
struct TextArgs {
    /// Text file of speaker A
    speaker_a: PathBuf,
    /// Text file of speaker B
    speaker_b: PathBuf,
    /// Text file of the unknown speaker
    unknown: PathBuf,
    /// Window length (k >= 1)
    k: usize,
}

/// Texts loaded in memory, lines joined with spaces.
struct Texts {
    speaker_a: String,
    speaker_b: String,
    unknown: String,
    k: usize,
}

impl TextArgs {
    fn load(&self) -> std::io::Result<Texts> {
        Ok(Texts {
            speaker_a: read_text(&self.speaker_a)?,
            speaker_b: read_text(&self.speaker_b)?,
            unknown: read_text(&self.unknown)?,
            k: self.k,
        })
    }
}

fn identify(texts: &Texts, backend: Backend, parallel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = IdentifyRequest::new(&texts.speaker_a, &texts.speaker_b, &texts.unknown, texts.k, backend);
    request.parallel = parallel;
    let result = identify_speaker_with(&request)?;

    println!("Speaker A: {}", result.prob_a);
    println!("Speaker B: {}", result.prob_b);
    println!();
    println!("Conclusion: Speaker {} is most likely", result.verdict);
    Ok(())
}

fn bench(texts: &Texts, runs: usize) -> Result<(), Box<dyn std::error::Error>> {
    if runs == 0 {
        return Err("runs must be >= 1".into());
    }

    println!("{:<14}{:>4}{:>24}", "Implementation", "K", format!("Average Time (Runs={})", runs));
    for backend in Backend::ALL {
        for k in 1..=texts.k {
            let start = Instant::now();
            for _ in 0..runs {
                identify_speaker(&texts.speaker_a, &texts.speaker_b, &texts.unknown, k, backend)?;
            }
            let average = start.elapsed().as_secs_f64() / runs as f64;
            println!("{:<14}{:>4}{:>24.3}", backend, k, average);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = ArgParser::parse();

    match &args.command {
        Commands::Identify { texts, backend, parallel } => {
            let texts = texts.load()?;
            info!("loaded {} / {} / {} bytes", texts.speaker_a.len(), texts.speaker_b.len(), texts.unknown.len());
            identify(&texts, *backend, *parallel)
        }
        Commands::Bench { texts, runs } => {
            let texts = texts.load()?;
            bench(&texts, *runs)
        }
    }
}
