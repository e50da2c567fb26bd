//! CLI command definitions

use clap::{Parser, ValueEnum};
use matchmaker_domain::{OutputFormat, Speaker};
use std::path::PathBuf;

/// Output format for match reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Transcript, metrics, similarity and both decisions
    Full,
    /// One block per pair with outcome and final decision
    Summary,
    /// The report as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Full => OutputFormat::Full,
            OutputFormatArg::Summary => OutputFormat::Summary,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for matchmaker
#[derive(Parser, Debug)]
#[command(name = "matchmaker")]
#[command(author, version, about = "Simulated persona conversations with a gated match decision")]
#[command(long_about = r#"
Matchmaker lets two personas talk through a fixed phase schedule
(opening, discovery, deep dive, closing), classifies how the conversation
ended, scores how well each side's needs fit the other's personality, and
produces a match decision that never contradicts those signals.

Configuration files are loaded from (in priority order):
1. MATCHMAKER_* environment variables (e.g. MATCHMAKER_PROVIDER__CHAT_MODEL)
2. --config <path>          Explicit config file
3. ./matchmaker.toml        Project-level config
4. ~/.config/matchmaker/config.toml   Global config

Example:
  matchmaker personas/alice.json personas/bob.json
  matchmaker --pairs pairs.json --save results/ -o summary
  matchmaker alice.json bob.json --max-turns 6 --opener b -o full
"#)]
pub struct Cli {
    /// Persona file for profile_1
    #[arg(
        value_name = "PERSONA_1",
        required_unless_present_any = ["pairs", "show_config"],
        conflicts_with = "pairs"
    )]
    pub persona_1: Option<PathBuf>,

    /// Persona file for profile_2
    #[arg(
        value_name = "PERSONA_2",
        required_unless_present_any = ["pairs", "show_config"],
        conflicts_with = "pairs"
    )]
    pub persona_2: Option<PathBuf>,

    /// JSON file listing persona pairs to run as a batch
    #[arg(long, value_name = "FILE")]
    pub pairs: Option<PathBuf>,

    /// Total turns before the conversation is forced to end
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,

    /// Final turns forced into the closing phase
    #[arg(long, value_name = "N")]
    pub closing_grace: Option<usize>,

    /// Who speaks first (a or b)
    #[arg(long, value_name = "SPEAKER")]
    pub opener: Option<Speaker>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Save one JSON report per pair into this directory
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,

    /// Write conversation events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub log_conversation: Option<PathBuf>,

    /// Also write diagnostic logs to a daily rotating file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Pairs run at once in batch mode
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Persona file paths for a single match, if both were given
    pub fn persona_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.persona_1.as_ref().zip(self.persona_2.as_ref())
    }

    /// Output format chosen on the command line, if any
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.map(OutputFormat::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_match_args() {
        let cli = Cli::try_parse_from([
            "matchmaker",
            "a.json",
            "b.json",
            "--max-turns",
            "6",
            "--opener",
            "b",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();

        let (a, b) = cli.persona_paths().unwrap();
        assert_eq!(a, &PathBuf::from("a.json"));
        assert_eq!(b, &PathBuf::from("b.json"));
        assert_eq!(cli.max_turns, Some(6));
        assert_eq!(cli.opener, Some(Speaker::B));
        assert_eq!(cli.output_format(), Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_pairs_mode() {
        let cli = Cli::try_parse_from(["matchmaker", "--pairs", "pairs.json", "--save", "out"])
            .unwrap();
        assert!(cli.persona_paths().is_none());
        assert_eq!(cli.pairs, Some(PathBuf::from("pairs.json")));
        assert_eq!(cli.save, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_personas_required_without_pairs() {
        assert!(Cli::try_parse_from(["matchmaker", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["matchmaker"]).is_err());
    }

    #[test]
    fn test_pairs_conflicts_with_personas() {
        assert!(
            Cli::try_parse_from(["matchmaker", "a.json", "b.json", "--pairs", "p.json"]).is_err()
        );
    }

    #[test]
    fn test_show_config_needs_no_personas() {
        let cli = Cli::try_parse_from(["matchmaker", "--show-config"]).unwrap();
        assert!(cli.show_config);
    }

    #[test]
    fn test_invalid_opener_rejected() {
        assert!(
            Cli::try_parse_from(["matchmaker", "a.json", "b.json", "--opener", "c"]).is_err()
        );
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
