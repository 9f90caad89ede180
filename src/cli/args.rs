//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use tiapp::{LoadOptions, ParseMode, TIAPP_XML};

/// Locate and inspect a project's tiapp.xml
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory to start the upward search from (default: current directory)
    #[arg(short = 'D', long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Config file name to search for
    #[arg(short = 'N', long, global = true, default_value = TIAPP_XML)]
    pub file_name: String,

    /// Reject malformed XML instead of tolerating it
    #[arg(short, long, global = true)]
    pub strict: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the path of the nearest config file
    #[command(visible_alias = "f")]
    Find,

    /// Load the config file and print its document
    #[command(visible_alias = "s")]
    Show {
        #[command(flatten)]
        args: ShowArgs,
    },
}

/// Show command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ShowArgs {
    /// Config file to load. If omitted, it is discovered upward.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: Option<PathBuf>,

    /// Print the document tree as JSON instead of XML
    #[arg(short, long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(short, long, requires = "json")]
    pub pretty: bool,
}

impl Cli {
    /// Discovery and parse options derived from global flags.
    pub fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::default().with_file_name(self.file_name.clone());
        if let Some(dir) = &self.dir {
            options = options.with_search_from(dir);
        }
        if self.strict {
            options = options.with_parse_mode(ParseMode::Strict);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_with_flags() {
        let cli = Cli::try_parse_from(["tiapp", "--strict", "show", "app/tiapp.xml", "-j", "-p"])
            .unwrap();

        let Commands::Show { args } = &cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.path, Some(PathBuf::from("app/tiapp.xml")));
        assert!(args.json && args.pretty);
        assert_eq!(cli.load_options().parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_pretty_requires_json() {
        assert!(Cli::try_parse_from(["tiapp", "show", "--pretty"]).is_err());
    }

    #[test]
    fn test_find_alias_and_search_dir() {
        let cli = Cli::try_parse_from(["tiapp", "f", "--dir", "/tmp/app"]).unwrap();

        assert!(matches!(cli.command, Commands::Find));
        let options = cli.load_options();
        assert_eq!(options.search_from, Some(PathBuf::from("/tmp/app")));
        assert_eq!(options.file_name, TIAPP_XML);
        assert_eq!(options.parse_mode, ParseMode::Lenient);
    }
}
