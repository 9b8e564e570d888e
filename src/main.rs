use clap::{ArgAction, Parser};
use meuralize::config::MeuralConfig;
use meuralize::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "meuralize")]
#[command(version, disable_version_flag = true)]
#[command(about = "Reframe photos onto a 16:9 canvas for digital art frames")]
#[command(long_about = "\
Reframe photos onto a 16:9 canvas for digital art frames

Every supported image directly inside FOLDER_PATH that is not already 16:9
gets a sibling copy named <name>-meural.<ext>: the original, whole and
centered, over a blurred and rippled backdrop made from itself. Outputs are
kept under the size limit by downscaling, lowering JPEG quality, and as a
last resort shrinking below 1920x1080.

Supported formats: jpg, jpeg, png, bmp, tiff, tif

Set DEBUG=1 to print the underlying cause of per-file errors and enable
diagnostic logging on stderr.")]
struct Cli {
    /// Folder containing the images to reframe
    folder: Option<PathBuf>,

    /// Size limit per output file, in megabytes
    #[arg(long, value_name = "N", default_value_t = 20)]
    max_size_mb: u64,

    /// Write a JSON summary of every file's outcome
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug = std::env::var_os("DEBUG").is_some();
    init_tracing(debug);

    let Some(folder) = cli.folder else {
        println!("Error: Please provide a folder path");
        println!("Usage: meuralize FOLDER_PATH");
        println!("       meuralize --help for more information");
        return ExitCode::FAILURE;
    };

    let config = match MeuralConfig::default().with_max_size_mb(cli.max_size_mb) {
        Ok(config) => config.with_debug(debug),
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = match process::process(&folder, &config, |event| {
        output::print_process_event(&event)
    }) {
        Ok(report) => report,
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = cli.report {
        let written = serde_json::to_string_pretty(&report)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&path, json));
        if let Err(e) = written {
            tracing::warn!(path = %path.display(), %e, "Failed to write report");
        }
    }

    ExitCode::SUCCESS
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        "meuralize=debug"
    } else {
        "meuralize=warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
