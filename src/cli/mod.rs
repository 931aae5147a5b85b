//! CLI for the ontopat-server binary.
//!
//! Uses clap for argument parsing and owo-colors for terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// OntoPat - Ontology Patterns Backend
///
/// Turns ontology pattern requests into LLM prompts and returns the
/// suggested property or class name.
#[derive(Parser, Debug)]
#[command(
    name = "ontopat-server",
    version,
    about = "OntoPat - Ontology Patterns Backend",
    long_about = "OntoPat - Ontology Patterns Backend\n\n\
                  Serves the ontology pattern API: builds prompts from templates, sends them\n\
                  to OpenAI, Ollama or Text Generation Inference and parses the reply.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new project.",
    after_help = "EXAMPLES:\n    \
                  ontopat-server init              # Scaffold config and prompt templates\n    \
                  ontopat-server                   # Start the server (reads ontopat.toml)\n    \
                  ontopat-server config --validate # Check the configuration\n    \
                  ontopat-server models            # List routable models"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "ontopat.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Scaffold ontopat.toml and the default prompt tree
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Skip writing prompt templates
        #[arg(long)]
        no_prompts: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration as TOML
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file and prompt tree
        #[arg(long)]
        validate: bool,
    },

    /// List configured models and their providers
    Models,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_help_names_the_product() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.starts_with("OntoPat - Ontology Patterns Backend"));
        assert!(help.contains("Serves the ontology pattern API"));
    }

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::try_parse_from(["ontopat-server"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("ontopat.toml"));
    }

    #[test]
    fn test_init_args() {
        let cli = Cli::try_parse_from(["ontopat-server", "init", "demo", "--force", "--port", "9000"])
            .unwrap();
        match cli.command {
            Some(Commands::Init {
                path, force, port, no_prompts, ..
            }) => {
                assert_eq!(path, PathBuf::from("demo"));
                assert!(force);
                assert!(!no_prompts);
                assert_eq!(port, 9000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["ontopat-server", "models", "--config", "alt.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Models)));
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }
}
