//! Configuration command.

use clap::Args;
use fretwise_dataset::DatasetConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Validate this configuration file instead of printing the defaults
    #[arg(long, value_name = "TOML")]
    check: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.check {
        Some(path) => {
            let config = DatasetConfig::load(&path)?;
            println!("{}: valid", path.display());
            print!("{}", config.to_toml_string()?);
        }
        None => print!("{}", DatasetConfig::default().to_toml_string()?),
    }
    Ok(())
}
