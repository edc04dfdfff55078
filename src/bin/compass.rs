#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use compass_harness::analysis::{AnalysisRequestor, AnalysisResult, LlmArchetypeGenerator};
use compass_harness::axis::{AxisScores, Leaning};
use compass_harness::config::CompassConfig;
use compass_harness::error::ConfigError;
use compass_harness::gateway::{ProviderGateway, TracingUsageSink};
use compass_harness::prompts::prompt_by_slug;
use compass_harness::sampler::Sampler;
use compass_harness::scoring::{score, score_breakdown};
use compass_harness::session::{Answer, ResponseCollector, SessionState};

#[derive(Parser)]
#[command(name = "compass", version, about = "Four-axis opinion survey with archetype analysis")]
struct Cli {
    /// TOML config file (see `CompassConfig`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the question bank
    Questions {
        /// Print JSON instead of one line per question
        #[arg(long)]
        json: bool,
    },
    /// Draw one session's questions and print them as JSON
    Sample {
        #[arg(long)]
        seed: Option<u64>,
        /// Overrides the configured sample size
        #[arg(long)]
        size: Option<usize>,
    },
    /// Take the survey interactively on stdin
    Take {
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the archetype analysis
        #[arg(long)]
        offline: bool,
        /// Write the recorded answers as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score a JSON array of answers
    Score {
        #[arg(long)]
        answers: PathBuf,
    },
    /// Score a JSON array of answers and request an archetype analysis
    Analyze {
        #[arg(long)]
        answers: PathBuf,
        /// Prompt template slug
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CompassConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Questions { json } => {
            let bank = config.load_bank()?;
            if json {
                println!("{}", serde_json::to_string_pretty(bank.questions())?);
            } else {
                for q in bank.questions() {
                    println!("{:>3}  {:<9}  {}", q.id, q.axis, q.text);
                }
                let counts = bank.axis_counts();
                let summary: Vec<String> = counts
                    .iter()
                    .map(|(axis, n)| format!("{axis}={n}"))
                    .collect();
                eprintln!("{} questions ({})", bank.len(), summary.join(", "));
            }
        }
        Commands::Sample { seed, size } => {
            let sampler = match size {
                Some(size) => Sampler::new(config.load_bank()?, size)?,
                None => config.build_sampler()?,
            };
            let questions = sampler.sample(&mut rng(seed));
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        Commands::Take { seed, offline, out } => {
            let sampler = config.build_sampler()?;
            let mut collector = ResponseCollector::start(&sampler, &mut rng(seed));
            run_interactive(&mut collector, io::stdin().lock())?;

            let answers = collector.finalize()?;
            if let Some(path) = out {
                write_json(&path, &answers)?;
                eprintln!("answers written to {}", path.display());
            }

            let scores = score(&answers);
            print_scores(&scores);

            if offline {
                return Ok(());
            }
            let requestor = match build_requestor(&config, None) {
                Ok(requestor) => requestor,
                Err(e) => {
                    println!("\nanalysis unavailable: {e}");
                    return Ok(());
                }
            };
            let cancel = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            match requestor
                .request_analysis_until(&answers, scores, Some(collector.id()), cancel)
                .await
            {
                Ok(result) => print_analysis(&result),
                Err(e) => println!("\n{e}"),
            }
        }
        Commands::Score { answers } => {
            let answers: Vec<Answer> = read_json(&answers)?;
            println!("{}", serde_json::to_string_pretty(&score_breakdown(&answers))?);
        }
        Commands::Analyze {
            answers,
            prompt,
            out,
        } => {
            let answers: Vec<Answer> = read_json(&answers)?;
            let scores = score(&answers);
            let requestor = build_requestor(&config, prompt.as_deref())?;
            let result = requestor.request_analysis(&answers, scores).await?;
            match out {
                Some(path) => {
                    write_json(&path, &result)?;
                    eprintln!("analysis written to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
    }

    Ok(())
}

type Requestor = AnalysisRequestor<LlmArchetypeGenerator<ProviderGateway<TracingUsageSink>>>;

fn build_requestor(
    config: &CompassConfig,
    prompt: Option<&str>,
) -> Result<Requestor, Box<dyn std::error::Error>> {
    let gateway = ProviderGateway::from_env(Arc::new(TracingUsageSink), config.gateway_config())
        .map_err(ConfigError::Credentials)?;
    let mut generator = LlmArchetypeGenerator::new(Arc::new(gateway), config.model.clone())
        .temperature(config.temperature);
    if let Some(slug) = prompt {
        let template = prompt_by_slug(slug).ok_or_else(|| format!("unknown prompt: {slug}"))?;
        generator = generator.template(template);
    }
    Ok(AnalysisRequestor::new(Arc::new(generator)).with_timeout(config.analysis_timeout()))
}

fn run_interactive(
    collector: &mut ResponseCollector,
    mut input: impl BufRead,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    while let SessionState::AwaitingAnswer { index, total } = collector.state() {
        let Some(question) = collector.current_question().cloned() else {
            break;
        };
        writeln!(stdout, "\n[{}/{}] {}", index + 1, total, question.text)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(stdout, "  {}) {}", i + 1, option.text)?;
        }

        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err("input ended before the survey was complete".into());
            }
            let choice = match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n - 1,
                _ => {
                    writeln!(stdout, "enter a number between 1 and {}", question.options.len())?;
                    continue;
                }
            };
            match collector.submit(choice) {
                Ok(_) => break,
                Err(e) => writeln!(stdout, "{e}")?,
            }
        }
    }
    Ok(())
}

fn print_scores(scores: &AxisScores<u8>) {
    println!("\nScores (0-100, 50 is neutral)");
    for (axis, &value) in scores.iter() {
        let (low, high) = axis.poles();
        println!(
            "  {:<9} {:>3}  {:<8} <-> {:<8}  {}",
            axis.label(),
            value,
            low,
            high,
            Leaning::of(value).describe(axis)
        );
    }
}

fn print_analysis(result: &AnalysisResult) {
    println!("\n{}", result.archetype);
    println!("{}", result.definition);
    println!("\nCore values");
    for value in result.parsed_core_values() {
        println!("  - {}: {}", value.keyword, value.detail);
    }
    println!("\nUnexpected trait");
    println!("  {}", result.unexpected_trait);
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(io::BufReader::new(file))?)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), io::Error> {
    let mut file = File::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    writeln!(file)?;
    Ok(())
}
