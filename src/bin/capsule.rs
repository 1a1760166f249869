//! Capsule packaging CLI
//!
//! `capsule compile` packages an entrypoint script and a runtime stub into
//! one self-contained executable; `capsule inspect` prints the recovered
//! layout of a packaged image. Both historical compile surfaces are
//! accepted: positional (`capsule compile main.js app`) and flag-based
//! (`capsule compile --input main.js --output app`).

use capsule_rs::{extract, CapsuleError, CompileOptions, Compiler, FileBundler};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "capsule")]
#[command(about = "Package an application and a runtime stub into one executable")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Package an entrypoint script into a standalone executable
    Compile {
        /// Entrypoint script
        entrypoint: Option<String>,

        /// Output executable path
        output: Option<PathBuf>,

        /// Entrypoint script (flag form)
        #[arg(short, long, conflicts_with = "entrypoint")]
        input: Option<String>,

        /// Output executable path (flag form)
        #[arg(short = 'o', long = "output", conflicts_with = "output")]
        output_flag: Option<PathBuf>,

        /// Author string embedded in the image metadata
        #[arg(long)]
        author: Option<String>,

        /// Application name embedded in the image metadata
        #[arg(long)]
        name: Option<String>,

        /// Runtime stub to extend [default: ./runtime]
        #[arg(long)]
        stub: Option<PathBuf>,
    },

    /// Show the embedded layout and metadata of a packaged executable
    Inspect {
        /// Packaged executable to inspect
        image: PathBuf,
    },
}

fn default_stub_path() -> PathBuf {
    PathBuf::from(format!("runtime{}", std::env::consts::EXE_SUFFIX))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Compile {
            entrypoint,
            output,
            input,
            output_flag,
            author,
            name,
            stub,
        } => {
            let options = CompileOptions {
                input: input.or(entrypoint),
                output: output_flag.or(output),
                author,
                name,
            };

            let stub = stub.unwrap_or_else(default_stub_path);
            let compiler = Compiler::new(FileBundler, stub);
            let layout = compiler.compile(&options).await?;

            info!(output = %layout.output.display(), "compile finished");
            Ok(())
        }

        Commands::Inspect { image } => {
            let app = extract(&image).await?;

            println!("entrypoint: {}", app.metadata.entrypoint);
            if let Some(author) = &app.metadata.author {
                println!("author: {author}");
            }
            if let Some(name) = &app.metadata.name {
                println!("name: {name}");
            }
            println!(
                "stub: {} bytes [0..{})",
                app.trailer.bundle_offset, app.trailer.bundle_offset
            );
            println!(
                "bundle: {} bytes [{}..{})",
                app.bundle.len(),
                app.trailer.bundle_offset,
                app.trailer.metadata_offset
            );
            println!("metadata offset: {}", app.trailer.metadata_offset);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if matches!(
                err.downcast_ref::<CapsuleError>(),
                Some(CapsuleError::MissingEntrypoint)
            ) {
                println!("{err}");
            } else {
                eprintln!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}
