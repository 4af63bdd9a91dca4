//! Sensor Dump
//!
//! Tools for the blood pressure monitor and its ESP32 SD hub.
//!
//! # Features
//!
//! - **Capture**: request the SD card dump from the ESP32 hub over serial and
//!   write the values to a spreadsheet with a chart (requires the `serial`
//!   feature, enabled by default)
//! - **Analyze**: summarize a recorded measurement file and plot the
//!   pressure curve with its peak
//!
//! # Usage
//!
//! ```bash
//! # List available serial ports
//! sensor-dump ports
//!
//! # Request a dump, choosing the port interactively
//! sensor-dump capture
//!
//! # Request a dump from a known port, keeping a transcript
//! sensor-dump capture -p /dev/ttyUSB0 --log dump.log
//!
//! # Analyze one measurement file, or every .txt file in a directory
//! sensor-dump analyze bp_12345.txt
//! sensor-dump analyze ./sd-card
//!
//! # Print the default configuration
//! sensor-dump generate config
//! ```

mod capture;
mod config;
mod error;
mod measurement;
mod protocol;
#[cfg(feature = "serial")]
mod serial;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use config::Settings;
use measurement::plot;

#[cfg(feature = "serial")]
use capture::CaptureOutcome;
#[cfg(feature = "serial")]
use std::io::Write;

/// Sensor Dump
///
/// Capture and analyze blood pressure monitor data
#[derive(Parser)]
#[command(name = "sensor-dump")]
#[command(version = "0.1.0")]
#[command(about = "Capture SD dumps over serial and analyze blood pressure measurements")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available serial ports
    #[cfg(feature = "serial")]
    Ports,

    /// Request the SD card dump and write it to a spreadsheet
    #[cfg(feature = "serial")]
    Capture {
        /// Serial port path (prompted for when omitted)
        #[arg(short, long)]
        port: Option<String>,

        /// Spreadsheet path (overrides settings)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a timestamped transcript of every received line
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Summarize a measurement file and plot it
    Analyze {
        /// Measurement file, or a directory of them
        path: PathBuf,

        /// Skip the plot
        #[arg(long)]
        no_plot: bool,
    },

    /// Generate configuration files
    #[command(subcommand)]
    Generate(GenerateCommands),
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Generate the default settings file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        #[cfg(feature = "serial")]
        Commands::Ports => serial::port::print_ports().context("Failed to list serial ports"),
        #[cfg(feature = "serial")]
        Commands::Capture { port, output, log } => {
            handle_capture(config_path, port, output, log)
        }
        Commands::Analyze { path, no_plot } => handle_analyze(config_path, &path, no_plot),
        Commands::Generate(cmd) => handle_generate(cmd),
    }
}

fn print_error(err: impl std::fmt::Display) {
    eprintln!("{} {}", "[ERROR]".red().bold(), err);
}

/// Load settings for a pipeline, reporting a bad file instead of failing
fn load_settings(config_path: Option<&Path>) -> Option<Settings> {
    match config::load(config_path) {
        Ok(settings) => Some(settings),
        Err(e) => {
            print_error(e);
            None
        }
    }
}

#[cfg(feature = "serial")]
fn handle_capture(
    config_path: Option<&Path>,
    port: Option<String>,
    output: Option<PathBuf>,
    log: Option<PathBuf>,
) -> Result<()> {
    let Some(mut settings) = load_settings(config_path) else {
        return Ok(());
    };
    if let Some(output) = output {
        settings.output.workbook = output;
    }

    let port_path = match port {
        Some(p) => p,
        None => {
            let chosen = serial::port::list_ports().and_then(|ports| {
                let stdin = std::io::stdin();
                serial::choose_port(&ports, &mut stdin.lock(), &mut std::io::stdout())
            });
            match chosen {
                Ok(p) => p,
                Err(e) => {
                    print_error(e);
                    return Ok(());
                }
            }
        }
    };

    let transcript: Option<Box<dyn Write>> = match log {
        Some(ref path) => match std::fs::File::create(path) {
            Ok(file) => {
                println!("{} Logging to: {}", "[LOG]".cyan().bold(), path.display());
                Some(Box::new(std::io::BufWriter::new(file)))
            }
            Err(e) => {
                print_error(format!("Failed to create log file {}: {}", path.display(), e));
                return Ok(());
            }
        },
        None => None,
    };

    println!(
        "{} Connecting to {} at {} baud, sending {}",
        "[TX]".cyan().bold(),
        port_path.white().bold(),
        settings.serial.baud_rate,
        settings.session.command
    );

    let lines = match capture::device::fetch_dump(&port_path, &settings, transcript) {
        Ok(lines) => lines,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };
    println!("{} Received {} line(s)", "[RX]".cyan().bold(), lines.len());

    match capture::write_report(&lines, &settings.output) {
        Ok(CaptureOutcome::Written { path, samples }) => println!(
            "{} Wrote {} sample(s) to {}",
            "[OK]".green().bold(),
            samples,
            path.display()
        ),
        Ok(CaptureOutcome::NoData { lines }) => println!(
            "{} No numeric values among {} received line(s), nothing written",
            "[WARNING]".yellow().bold(),
            lines
        ),
        Err(e) => print_error(e),
    }

    Ok(())
}

fn handle_analyze(config_path: Option<&Path>, path: &Path, no_plot: bool) -> Result<()> {
    if !path.exists() {
        print_error(format!("File '{}' not found", path.display()));
        std::process::exit(1);
    }
    let Some(settings) = load_settings(config_path) else {
        return Ok(());
    };

    let files = if path.is_dir() {
        let files = measurement::find_measurement_files(path);
        if files.is_empty() {
            println!(
                "{} No measurement files (*.txt) in {}",
                "[WARNING]".yellow().bold(),
                path.display()
            );
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    let failed = files
        .iter()
        .filter(|file| !analyze_one(&settings, file, no_plot))
        .count();

    if files.len() > 1 {
        println!(
            "{} Analyzed {} file(s), {} failed",
            "[*]".cyan().bold(),
            files.len(),
            failed
        );
    }

    Ok(())
}

/// Analyze, report and plot one file. Returns false when it was skipped.
fn analyze_one(settings: &Settings, path: &Path, no_plot: bool) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let analysis = match measurement::analyze_file(path, settings.analysis.footer_window) {
        Ok(analysis) => analysis,
        Err(e) => {
            print_error(format!("{}: {}", name, e));
            return false;
        }
    };

    measurement::report::print_report(&name, &analysis.file, &analysis.summary);

    if no_plot {
        return true;
    }

    let output = plot::plot_path(path);
    let size = (settings.analysis.plot_width, settings.analysis.plot_height);
    match plot::render_plot(&analysis.file.rows, &analysis.summary, &name, &output, size) {
        Ok(()) => {
            println!("{} Plot saved to: {}", "[OK]".green().bold(), output.display());
            true
        }
        Err(e) => {
            print_error(format!("{}: {}", name, e));
            false
        }
    }
}

fn handle_generate(cmd: GenerateCommands) -> Result<()> {
    match cmd {
        GenerateCommands::Config { output } => {
            let text = config::default_toml().context("Failed to render default settings")?;

            if let Some(path) = output {
                std::fs::write(&path, &text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "{} Default settings written to {}",
                    "[OK]".green().bold(),
                    path.display()
                );
            } else {
                println!("{}", text);
            }
        }
    }

    Ok(())
}
