use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Practice behavioral interview answers with the STAR method.
#[derive(Debug, Parser)]
#[command(name = "star", version, about)]
pub struct Cli {
    /// Rubric file (YAML, or JSON with a .json extension)
    #[arg(long, global = true, value_name = "PATH")]
    pub rubric: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score an answer against the STAR rubric
    Evaluate {
        #[command(flatten)]
        input: AnswerInput,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Rewrite an answer into Situation/Task/Action/Result segments
    Rewrite {
        #[arg(short, long)]
        question: String,

        #[command(flatten)]
        input: AnswerInput,

        /// Also print improvement notes and follow-up questions
        #[arg(long)]
        notes: bool,

        #[command(flatten)]
        enhance: EnhanceArgs,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Generate recruiter follow-up questions
    Followups {
        #[arg(short, long)]
        question: String,

        #[command(flatten)]
        input: AnswerInput,

        #[command(flatten)]
        enhance: EnhanceArgs,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Evaluate, rewrite and export a full practice session
    Session {
        #[arg(short, long)]
        question: String,

        #[command(flatten)]
        input: AnswerInput,

        /// Evaluate and generate follow-ups only
        #[arg(long)]
        no_rewrite: bool,

        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        export: ExportFormat,

        /// File or directory to write to; stdout when omitted
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// List or search the built-in sample questions
    Questions {
        #[arg(long, value_name = "TERM")]
        search: Option<String>,
    },

    /// Print the active rubric, or validate a rubric file
    Rubric {
        #[arg(long, value_name = "PATH")]
        check: Option<PathBuf>,
    },
}

/// Where the answer comes from. Standard input when neither flag is given.
#[derive(Debug, Args)]
pub struct AnswerInput {
    #[arg(short, long, conflicts_with = "file")]
    pub answer: Option<String>,

    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EnhanceArgs {
    /// Polish the output with a model configured in this runtime config
    #[arg(long, value_name = "PATH")]
    pub runtime_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Text,
    Json,
}
