//! cloudinit-config - render cloud-init multi-part user-data
//!
//! Reads a part declaration (YAML or JSON), renders it into a MIME multi-part
//! document and optionally records the result for change detection.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use cloudinit_config::config::{load_configuration, read_source};
use cloudinit_config::state::{RenderState, load_state, plan, save_state};
use cloudinit_config::{ConfigError, check_renderable, decode_rendered, derive_id, render};

#[derive(Parser)]
#[command(name = "cloudinit-config")]
#[command(author, version, about = "Render cloud-init multi-part MIME user-data", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a declaration into user-data
    Render {
        /// Declaration file (YAML, or JSON with a .json extension); `-` for stdin
        file: PathBuf,
        /// Override the declared boundary
        #[arg(long)]
        boundary: Option<String>,
        /// Write the rendered document to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render state file used for change detection
        #[arg(long, env = "CLOUDINIT_CONFIG_STATE")]
        state: Option<PathBuf>,
        /// Print the full render state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a declaration without rendering it
    Validate {
        /// Declaration file; `-` for stdin
        file: PathBuf,
    },
    /// Decode a rendered document and list its parts
    Inspect {
        /// Rendered document; `-` for stdin
        file: PathBuf,
    },
    /// Print the identifier of a rendered document
    Id {
        /// Rendered document; `-` for stdin
        file: PathBuf,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries rendered output only
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

async fn run_render(
    file: &Path,
    boundary: Option<String>,
    output: Option<&Path>,
    state_path: Option<&Path>,
    json: bool,
) -> Result<(), ConfigError> {
    let mut config = load_configuration(file).await?;
    if let Some(boundary) = boundary {
        config = config.with_boundary(boundary);
    }

    let document = render(&config)?;
    let state = RenderState::new(&config, &document);

    if let Some(state_path) = state_path {
        let previous = load_state(state_path).await?;
        let change = plan(previous.as_ref(), &state);
        info!("Render result: {} (id {})", change, state.id);
        save_state(state_path, &state).await?;
    }

    let text = if json {
        serde_json::to_string_pretty(&state)?
    } else {
        document.content
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, &text).await?;
            info!("Wrote rendered user-data to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn run_inspect(file: &Path) -> Result<(), ConfigError> {
    let rendered = read_source(file).await?;
    let decoded = decode_rendered(&rendered)?;

    println!("id: {}", derive_id(&rendered));
    println!("base64: {}", decoded.base64_encoded);
    println!("gzip: {}", decoded.gzipped);
    println!("boundary: {}", decoded.boundary);
    println!("parts: {}", decoded.parts.len());
    for (i, part) in decoded.parts.iter().enumerate() {
        println!(
            "  [{}] {} ({} bytes){}{}",
            i,
            part.content_type,
            part.content.len(),
            part.filename
                .as_deref()
                .map(|f| format!(" filename={}", f))
                .unwrap_or_default(),
            part.merge_type
                .as_deref()
                .map(|m| format!(" merge_type={}", m))
                .unwrap_or_default(),
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            file,
            boundary,
            output,
            state,
            json,
        } => run_render(&file, boundary, output.as_deref(), state.as_deref(), json).await,
        Commands::Validate { file } => {
            let result = load_configuration(&file)
                .await
                .and_then(|config| check_renderable(&config));
            if result.is_ok() {
                info!("{} is valid", file.display());
            }
            result
        }
        Commands::Inspect { file } => run_inspect(&file).await,
        Commands::Id { file } => read_source(&file).await.map(|rendered| {
            println!("{}", derive_id(&rendered));
        }),
    };

    if let Err(e) = &result {
        if e.is_user_error() {
            warn!("Declaration rejected: {}", e);
        }
    }

    result
}
