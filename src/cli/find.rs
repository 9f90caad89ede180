//! `tiapp find`: print the discovered config path.

use anyhow::{Result, bail};

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let options = cli.load_options();

    let Some(path) = options.discover() else {
        bail!(
            "{} not found in the search directory or any parent",
            options.file_name
        );
    };

    println!("{}", path.display());
    Ok(())
}
