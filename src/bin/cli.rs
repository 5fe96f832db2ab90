use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use serialtrace::{SerialTraceError, SerializationConfig, SerializationConfigParser};

#[derive(Parser)]
#[command(name = "serialtrace")]
#[command(about = "Merge and inspect recorded serialization targets and checksums")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge serialization documents into one
    Merge {
        /// Input documents, merged in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long, env = "SERIALTRACE_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Check whether a class (and optionally a checksum) is recorded
    Check {
        /// Serialization document to inspect
        #[arg(short, long, env = "SERIALTRACE_CONFIG")]
        config: PathBuf,

        /// Target class name
        #[arg(long = "class")]
        class_name: String,

        /// Checksum to look for
        #[arg(long)]
        checksum: Option<String>,
    },

    /// Show entry and checksum counts
    Stats {
        /// Input documents
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("serialtrace=debug,info")
    } else {
        EnvFilter::new("serialtrace=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, SerialTraceError> {
    match cli.command {
        Commands::Merge { inputs, output } => cmd_merge(&inputs, output),
        Commands::Check { config, class_name, checksum } => {
            cmd_check(&config, &class_name, checksum.as_deref())
        }
        Commands::Stats { inputs } => cmd_stats(&inputs),
    }
}

fn cmd_merge(inputs: &[PathBuf], output: Option<PathBuf>) -> Result<ExitCode, SerialTraceError> {
    info!("Merging {} document(s)", inputs.len());
    let config = SerializationConfigParser::load_files(inputs)?;

    match output {
        Some(path) => {
            let file = File::create(&path)?;
            config.write_to(BufWriter::new(file))?;
            info!("Wrote {} entries to {}", config.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            config.write_to(stdout.lock())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn is_recorded(
    path: &Path,
    class_name: &str,
    checksum: Option<&str>,
) -> Result<bool, SerialTraceError> {
    let config = SerializationConfig::new();
    SerializationConfigParser::parse_file(path, &config)?;

    Ok(match checksum {
        Some(sum) => config.contains(class_name, sum),
        None => config.checksums_of(class_name, None).is_some(),
    })
}

fn cmd_check(
    path: &Path,
    class_name: &str,
    checksum: Option<&str>,
) -> Result<ExitCode, SerialTraceError> {
    let found = is_recorded(path, class_name, checksum)?;

    let label = match checksum {
        Some(sum) => format!("{} [{}]", class_name, sum),
        None => class_name.to_string(),
    };

    if found {
        println!("\x1b[32m✓\x1b[0m {}", label);
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("{} is not recorded in {}", label, path.display());
        println!("\x1b[31m✗\x1b[0m {}", label);
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_stats(inputs: &[PathBuf]) -> Result<ExitCode, SerialTraceError> {
    let config = SerializationConfigParser::load_files(inputs)?;
    let entries = config.entries();

    let with_ctor = entries.iter().filter(|e| e.key.has_custom_constructor()).count();
    let without_checksum = entries.iter().filter(|e| e.checksums.is_empty()).count();
    let total_checksums: usize = entries.iter().map(|e| e.checksums.len()).sum();

    println!("Entries:                    {}", entries.len());
    println!("  with custom constructor:  {}", with_ctor);
    println!("  without checksum:         {}", without_checksum);
    println!("Checksums:                  {}", total_checksums);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_document(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("serialization-config.json");
        fs::write(
            &path,
            r#"[{"name": "A", "checksum": "x"}, {"name": "B", "customTargetConstructorClass": "C"}]"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_is_recorded_with_checksum() {
        let dir = TempDir::new().unwrap();
        let path = write_document(&dir);

        assert!(is_recorded(&path, "A", Some("x")).unwrap());
        assert!(!is_recorded(&path, "A", Some("y")).unwrap());
    }

    #[test]
    fn test_is_recorded_class_only() {
        let dir = TempDir::new().unwrap();
        let path = write_document(&dir);

        assert!(is_recorded(path.as_path(), "A", None).unwrap());
        // Only entries without a custom constructor class count.
        assert!(!is_recorded(path.as_path(), "B", None).unwrap());
    }

    #[test]
    fn test_is_recorded_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = is_recorded(&dir.path().join("absent.json"), "A", None).unwrap_err();
        assert!(matches!(err, SerialTraceError::ConfigFileNotFound(_)));
    }
}
