use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use wg_conf::{Config, Error};

#[derive(Debug, clap::Parser)]
#[command(version, about = "Re-emit a WireGuard tunnel config as canonical INI or JSON")]
pub struct Args {
    /// Input config; `.json` files are decoded as JSON, anything else as INI
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Ini)]
    to: Format,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    Ini,
    Json,
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let args = Args::parse();

    let config = load(&args.input)?;
    log::debug!(
        "loaded {} with {} peer(s)",
        args.input.display(),
        config.peers.len()
    );

    let rendered = match args.to {
        Format::Ini => config.to_string(),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&config)?;
            json.push('\n');
            json
        }
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &rendered)?;
            log::info!("wrote {} bytes to {}", rendered.len(), path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn load(path: &Path) -> Result<Config, Error> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    } else {
        Config::from_path(path)
    }
}
