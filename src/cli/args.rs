//! Command-line argument parsing for ragbuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::DocumentId;

/// ragbuddy - Answer questions from your own documents with local Ollama models
#[derive(Parser, Debug)]
#[command(name = "ragbuddy")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Retrieval-augmented answering over a vector store, backed by local Ollama models", long_about = None)]
pub struct Args {
    /// Configuration file path (default: ~/.ragbuddy/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address, overrides [server].bind_addr
        #[arg(long)]
        bind: Option<String>,
    },

    /// Embed and store documents; more than one is ingested as a batch
    Ingest {
        #[arg(value_name = "TEXT", required = true)]
        texts: Vec<String>,
    },

    /// Answer a question from the stored documents
    Ask {
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Also print the documents that grounded the answer
        #[arg(long)]
        show_documents: bool,
    },

    /// Print one stored document
    Get {
        #[arg(value_name = "ID")]
        id: DocumentId,
    },

    /// Delete one stored document
    Delete {
        #[arg(value_name = "ID")]
        id: DocumentId,
    },

    /// Print the number of stored documents
    Count,

    /// Print the effective configuration as TOML
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["ragbuddy", "count"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["ragbuddy", "-q", "count"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["ragbuddy", "count", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["ragbuddy", "-vv", "count"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(parse(&["ragbuddy", "-q", "-v", "count"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_log_filters() {
        assert_eq!(Verbosity::Quiet.log_filter(), "warn");
        assert_eq!(Verbosity::Normal.log_filter(), "info");
        assert_eq!(Verbosity::Verbose.log_filter(), "debug");
        assert_eq!(Verbosity::VeryVerbose.log_filter(), "trace");
    }

    #[test]
    fn test_ingest_takes_many_texts() {
        match parse(&["ragbuddy", "ingest", "첫 번째", "second"]).command {
            Commands::Ingest { texts } => assert_eq!(texts, vec!["첫 번째", "second"]),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Args::try_parse_from(["ragbuddy", "ingest"]).is_err());
    }

    #[test]
    fn test_ask_and_ids() {
        match parse(&["ragbuddy", "ask", "한국의 수도는?", "--show-documents"]).command {
            Commands::Ask {
                question,
                show_documents,
            } => {
                assert_eq!(question, "한국의 수도는?");
                assert!(show_documents);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(matches!(
            parse(&["ragbuddy", "delete", "42"]).command,
            Commands::Delete { id: 42 }
        ));
        assert!(Args::try_parse_from(["ragbuddy", "get", "abc"]).is_err());
    }

    #[test]
    fn test_config_path_is_global() {
        let args = parse(&["ragbuddy", "serve", "--config", "/tmp/rag.toml", "--bind", "0.0.0.0:9000"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/rag.toml")));
        match args.command {
            Commands::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
