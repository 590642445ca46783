mod error;
mod extract;
mod harmonize;
mod markup;
mod schema;
mod settings;
mod standardize;
mod table;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use extract::Extraction;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "sg_fastest_growing",
    about = "Extract and standardize Singapore's fastest-growing companies tables"
)]
struct Cli {
    /// Extra TOML settings layered over the built-in dataset table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the chartData table embedded in an HTML page
    Html {
        input: PathBuf,
        /// Dataset year whose header and layout apply (e.g. 2020)
        #[arg(short, long)]
        year: u16,
        /// Output CSV (default: input with .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract the chartData table from a JSON API response
    Json {
        input: PathBuf,
        #[arg(short, long)]
        year: u16,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Standardize one CSV into <stem>_standardized.csv
    Standardize { file: PathBuf },
    /// Standardize every source CSV in a directory (default: data_dir)
    StandardizeDir { dir: Option<PathBuf> },
    /// Merge all <year>_standardized.csv files into canonical columns
    Harmonize { dir: Option<PathBuf> },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Html { input, year, output } => {
            let schema = schema::find_extractable(&settings.datasets, year)?;
            let output = output.unwrap_or_else(|| default_output(&input));
            report(extract::html_to_csv(&input, &output, schema)?);
        }
        Commands::Json { input, year, output } => {
            let schema = schema::find_extractable(&settings.datasets, year)?;
            let output = output.unwrap_or_else(|| default_output(&input));
            report(extract::json_to_csv(
                &input,
                &output,
                schema,
                &settings.json_blob_path,
            )?);
        }
        Commands::Standardize { file } => {
            println!("Standardizing {}...", file.display());
            let out = standardize::standardize_file(&file, &settings)?;
            println!("Saved standardized file to {}", out.display());
        }
        Commands::StandardizeDir { dir } => {
            let dir = dir.unwrap_or_else(|| settings.data_dir.clone());
            let outputs = standardize::standardize_dir(&dir, &settings)?;
            println!("Standardized {} files in {}", outputs.len(), dir.display());
        }
        Commands::Harmonize { dir } => {
            let dir = dir.unwrap_or_else(|| settings.data_dir.clone());
            if harmonize::harmonize_dir(&dir, &settings)?.is_none() {
                println!("No <year>_standardized.csv files found in {}", dir.display());
            }
        }
    }

    tracing::debug!(elapsed = ?t0.elapsed(), "done");
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

fn report(result: Extraction) {
    if let Extraction::Written { rows, path } = result {
        tracing::debug!(rows, path = %path.display(), "extraction finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_extract_commands() {
        let cli = Cli::try_parse_from(["sg_fastest_growing", "html", "data/2020.html", "--year", "2020"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Html { year: 2020, output: None, .. }));

        let cli = Cli::try_parse_from([
            "sg_fastest_growing", "--config", "local.toml", "json", "in.json", "-y", "2021", "-o", "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("local.toml")));
        assert!(matches!(cli.command, Commands::Json { year: 2021, output: Some(_), .. }));
    }

    #[test]
    fn cli_dir_defaults() {
        let cli = Cli::try_parse_from(["sg_fastest_growing", "standardize-dir"]).unwrap();
        assert!(matches!(cli.command, Commands::StandardizeDir { dir: None }));
    }

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(default_output(Path::new("data/2021.json")), PathBuf::from("data/2021.csv"));
    }
}
