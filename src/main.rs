//! dockit CLI entry point

use std::fs;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use dockit_core::cli::{Cli, OutputFormat};
use dockit_core::{parse_source, DockitError, Lang};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("No extractable type declaration found");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> dockit_core::Result<Option<String>> {
    let cli = Cli::parse_args();

    // 1. Check file exists
    if !cli.file.exists() {
        return Err(DockitError::FileNotFound {
            path: cli.file.display().to_string(),
        });
    }

    // 2. Detect dialect from file extension
    let lang = Lang::from_path(&cli.file)?;

    if cli.verbose {
        eprintln!("Detected dialect: {}", lang.name());
    }

    // 3. Read source file
    let source = fs::read_to_string(&cli.file)?;

    if cli.verbose {
        eprintln!("Read {} bytes from {}", source.len(), cli.file.display());
    }

    // 4. Extract and serialize
    let Some(class) = parse_source(&source, lang)? else {
        return Ok(None);
    };

    let json = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&class),
        OutputFormat::Compact => serde_json::to_string(&class),
    }
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(Some(json))
}
