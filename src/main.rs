//! # Space Image Converter - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Conferma interattiva prima di toccare il filesystem
//! - Creazione della configurazione e avvio dell'optimizer
//! - Exit code distinti per successo, errori per-file, annullamento
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (tutti opzionali)
//! 2. Configura il logging su stderr (INFO o DEBUG, sovrascrivibile con `RUST_LOG`)
//! 3. Risolve la directory (default: working directory corrente)
//! 4. Chiede di digitare `yes`; qualsiasi altra risposta annulla senza toccare nulla
//! 5. Istanzia MediaOptimizer e avvia la conversione
//!
//! ## Exit code:
//! - `0`: Tutto convertito (o niente da convertire)
//! - `1`: Errore fatale (directory illeggibile, configurazione non valida)
//! - `2`: Run completata con almeno un errore per-file
//! - `3`: Annullato dall'utente
//!
//! ## Esempio di utilizzo:
//! ```bash
//! cd site/assets && image-converter
//! image-converter ./photos --format webp --quality 75 --skip-existing --yes
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use space_image_converter::json_output::JsonMessage;
use space_image_converter::{Config, MediaOptimizer, TargetFormat};

const EXIT_FATAL: u8 = 1;
const EXIT_PARTIAL_FAILURE: u8 = 2;
const EXIT_CANCELLED: u8 = 3;

#[derive(Parser)]
#[command(name = "image-converter")]
#[command(about = "Convert every image under a directory to a single format and delete the originals")]
struct Args {
    /// Directory to convert (defaults to the current working directory)
    directory: Option<PathBuf>,

    /// Target format
    #[arg(short, long, value_enum, default_value_t = TargetFormat::WebP)]
    format: TargetFormat,

    /// Encode quality (0-100)
    #[arg(short, long, default_value = "80")]
    quality: u8,

    /// Skip files whose converted version already exists instead of overwriting it
    #[arg(long)]
    skip_existing: bool,

    /// Dry run - list what would be converted without touching anything
    #[arg(long)]
    dry_run: bool,

    /// Directory name to leave alone (repeatable)
    #[arg(short, long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Output progress and status as JSON lines
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let json_output = args.json;

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                JsonMessage::error(format!("{:#}", e)).emit();
            }
            error!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(args: Args) -> Result<ExitCode> {
    let directory = resolve_directory(args.directory)?;

    let config = Config {
        target_format: args.format,
        quality: args.quality,
        skip_existing: args.skip_existing,
        dry_run: args.dry_run,
        json_output: args.json,
        exclude_dirs: args.exclude,
    };

    let optimizer = MediaOptimizer::new(config)?;

    // Il dry run non modifica nulla: nessuna conferma necessaria
    if !args.yes && !args.dry_run && !ask_confirmation(&directory, args.json)? {
        if args.json {
            JsonMessage::error("Operation cancelled.".to_string()).emit();
        } else {
            println!("Operation cancelled.");
        }
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }

    let stats = optimizer
        .run(&directory)
        .await
        .with_context(|| format!("Conversion of {} failed", directory.display()))?;

    if stats.has_errors() {
        debug!("Completed with {} errors", stats.errors);
        Ok(ExitCode::from(EXIT_PARTIAL_FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Absolute path of the directory to convert
fn resolve_directory(directory: Option<PathBuf>) -> Result<PathBuf> {
    match directory {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Directory does not exist: {}", dir.display())),
        None => std::env::current_dir().context("Cannot determine current working directory"),
    }
}

/// Prompt once for the whole run; in JSON mode the prompt goes to stderr
fn ask_confirmation(directory: &Path, json_output: bool) -> Result<bool> {
    let prompt = format!(
        "This will overwrite images in {} and all subfolders. Type 'yes' to proceed: ",
        directory.display()
    );

    if json_output {
        eprint!("{}", prompt);
        io::stderr().flush()?;
    } else {
        print!("{}", prompt);
        io::stdout().flush()?;
    }

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_confirmed(&input))
}

/// Only the exact word "yes", in any case, confirms
fn is_confirmed(input: &str) -> bool {
    input
        .trim_end_matches(|c: char| c == '\n' || c == '\r')
        .eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_accepts_only_yes() {
        assert!(is_confirmed("yes\n"));
        assert!(is_confirmed("YES\r\n"));
        assert!(is_confirmed("Yes"));

        assert!(!is_confirmed(""));
        assert!(!is_confirmed("\n"));
        assert!(!is_confirmed("y\n"));
        assert!(!is_confirmed("Yes please\n"));
        assert!(!is_confirmed("no\n"));
        assert!(!is_confirmed(" yes\n"));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["image-converter"]);
        assert!(args.directory.is_none());
        assert_eq!(args.format, TargetFormat::WebP);
        assert_eq!(args.quality, 80);
        assert!(!args.skip_existing);
        assert!(!args.dry_run);
        assert!(!args.yes);
        assert!(args.exclude.is_empty());
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "image-converter",
            "photos",
            "--format",
            "jpg",
            "-q",
            "65",
            "--skip-existing",
            "-e",
            "raw",
            "-e",
            "node_modules",
            "--yes",
            "--json",
        ]);
        assert_eq!(args.directory, Some(PathBuf::from("photos")));
        assert_eq!(args.format, TargetFormat::Jpeg);
        assert_eq!(args.quality, 65);
        assert!(args.skip_existing);
        assert_eq!(args.exclude, vec!["raw", "node_modules"]);
        assert!(args.yes);
        assert!(args.json);
    }

    #[test]
    fn test_resolve_missing_directory_fails() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(resolve_directory(Some(temp_dir.path().join("missing"))).is_err());
        assert_eq!(
            resolve_directory(Some(temp_dir.path().to_path_buf())).unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
    }
}
