// Newtonian command line interface
// Voice and typed control of a simulated telescope mount

mod app;
mod console;
mod settings;

use anyhow::{bail, Result};
use app::{PrintSink, Telescope};
use clap::{Parser, Subcommand};
use console::InteractiveConsole;
use newtonian_mount::ApplyOutcome;
use newtonian_sc::{ListenOutcome, RecognitionFailure};
use settings::{Overrides, Settings};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AI_SAMPLE_PHRASES: &[&str] = &[
    "show me mars",
    "track the red planet",
    "point to jupiter",
    "where is venus",
    "find saturn",
];

#[derive(Parser)]
#[command(name = "newtonian")]
#[command(about = "Point a simulated telescope by voice or text", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Observer latitude in degrees
    #[arg(long, global = true, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Observer longitude in degrees (east positive)
    #[arg(long, global = true, allow_hyphen_values = true)]
    lon: Option<f64>,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for spoken commands until Ctrl-C
    Listen {
        /// Accept commands without the wake word
        #[arg(long)]
        no_wake_word: bool,
    },

    /// Interactive typed console
    Console,

    /// Parse a phrase and print the command as JSON
    Parse {
        /// Phrase to interpret
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show where a catalog object is right now
    Resolve {
        /// Object name, e.g. mars
        name: String,
    },

    /// Move the mount to an azimuth and elevation
    Goto {
        #[arg(allow_hyphen_values = true)]
        azimuth: f64,
        #[arg(allow_hyphen_values = true)]
        elevation: f64,
    },

    /// List preset targets
    Presets,

    /// Check the AI disambiguation service with sample phrases
    AiCheck,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let no_wake_word = matches!(cli.command, Commands::Listen { no_wake_word: true });
    let settings = Settings::load(
        cli.config.as_deref(),
        Overrides {
            latitude: cli.lat,
            longitude: cli.lon,
            no_wake_word,
        },
    )?;
    let mut telescope = Telescope::new(settings)?;

    let result = match cli.command {
        Commands::Listen { .. } => listen(&mut telescope).await,
        Commands::Console => {
            let mut console = InteractiveConsole::new(telescope);
            let result = console.run().await;
            telescope = console.into_telescope();
            result
        }
        Commands::Parse { text } => parse(&telescope, &text.join(" ")).await,
        Commands::Resolve { name } => resolve(&telescope, &name),
        Commands::Goto { azimuth, elevation } => goto(&mut telescope, azimuth, elevation).await,
        Commands::Presets => {
            presets(&telescope);
            Ok(())
        }
        Commands::AiCheck => ai_check(&telescope).await,
    };

    telescope.shutdown().await;
    result
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn listen(telescope: &mut Telescope) -> Result<()> {
    let gateway = telescope.speech_gateway()?;
    let listen = &telescope.settings().telescope.listen;
    let timeout = Duration::from_secs(listen.timeout_secs);
    let phrase_limit = Duration::from_secs(listen.phrase_limit_secs);
    let word = telescope.settings().telescope.wake_word.word.clone();

    if telescope.settings().telescope.wake_word.required {
        telescope.announce(&format!("Telescope ready. Say '{}' followed by a command.", word));
    } else {
        telescope.announce("Telescope ready. Listening for commands.");
    }

    loop {
        let outcome = tokio::select! {
            outcome = gateway.listen(timeout, phrase_limit) => outcome,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };

        match outcome {
            Ok(ListenOutcome::Command(result)) => {
                println!("> {}", result.text);
                let handled = telescope.handle_text(&result.text).await?;
                if matches!(handled, Some((_, ApplyOutcome::Started(_)))) {
                    telescope.settle(&PrintSink).await;
                }
            }
            Ok(ListenOutcome::Acknowledged) | Ok(ListenOutcome::WakeWordMissing) => {}
            Err(RecognitionFailure::MicError(e)) => {
                bail!("Microphone unavailable: {}", e);
            }
            Err(e) => warn!("Listen attempt failed: {}", e),
        }
    }

    Ok(())
}

async fn parse(telescope: &Telescope, text: &str) -> Result<()> {
    let command = telescope
        .parser()
        .parse(text, &telescope.observer())
        .await;
    println!("{}", serde_json::to_string_pretty(&command)?);
    Ok(())
}

fn resolve(telescope: &Telescope, name: &str) -> Result<()> {
    let resolution = match telescope.resolver().resolve(name, &telescope.observer()) {
        Ok(resolution) => resolution,
        Err(failure) => bail!("{}", failure),
    };

    let now = chrono::Utc::now();
    println!("{} at {}", resolution.body.display_name(), now.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Azimuth:   {:>7.2}°", resolution.azimuth);
    println!("  Elevation: {:>7.2}°", resolution.elevation);
    if resolution.below_horizon {
        println!("  (below the horizon)");
    }
    Ok(())
}

async fn goto(telescope: &mut Telescope, azimuth: f64, elevation: f64) -> Result<()> {
    match telescope.controller_mut().goto(azimuth, elevation)? {
        ApplyOutcome::Started(target) => {
            println!("Moving to Az {:.2}°, El {:.2}°", target.azimuth, target.elevation);
            let frames = telescope.settle(&PrintSink).await;
            println!("Arrived after {} steps", frames.len());
            Ok(())
        }
        other => bail!("Mount did not move: {:?}", other),
    }
}

fn presets(telescope: &Telescope) {
    println!("{:<16} {:<22} {:>8} {:>10}", "TRIGGER", "TARGET", "AZIMUTH", "ELEVATION");
    for preset in telescope.parser().presets().iter() {
        println!(
            "{:<16} {:<22} {:>7.1}° {:>9.1}°",
            preset.trigger, preset.label, preset.azimuth, preset.elevation
        );
    }
}

async fn ai_check(telescope: &Telescope) -> Result<()> {
    let Some(classifier) = telescope.classifier() else {
        println!("AI disambiguation is not configured (set OPENAI_API_KEY).");
        return Ok(());
    };

    println!("AI disambiguation via {}", classifier.name());
    let mut failures = 0;
    for phrase in AI_SAMPLE_PHRASES {
        match classifier.classify(phrase).await {
            Ok(token) => println!("  {:<24} -> {}", phrase, token),
            Err(e) => {
                failures += 1;
                println!("  {:<24} -> error: {}", phrase, e);
            }
        }
    }

    if failures == AI_SAMPLE_PHRASES.len() {
        bail!("AI service did not answer");
    }
    Ok(())
}
