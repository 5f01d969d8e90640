use clap::{Args, Parser, Subcommand};
use nucleokit::core::models::component::Moiety;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "NucleoKit Contributors",
    version,
    about = "NucleoKit CLI - replay nucleotide assembly sessions and check connection rules without a canvas.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted assembly session and print the resulting graph.
    Replay(ReplayArgs),
    /// Check whether two kinds of components may connect, and with which bond.
    Check(CheckArgs),
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the session script in TOML format.
    #[arg(required = true, value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Path to an engine configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Overrides ---
    /// Override the auto-assembly distance threshold.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Override the canvas size, written as WIDTHxHEIGHT (e.g. 1024x768).
    #[arg(long, value_name = "WxH", value_parser = parse_canvas_size)]
    pub canvas: Option<(f64, f64)>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S fine-tune-factor=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// First component, e.g. `phosphate`, `sugar:ribose`, `base:A`.
    #[arg(required = true, value_name = "COMPONENT")]
    pub first: Moiety,

    /// Second component.
    #[arg(required = true, value_name = "COMPONENT")]
    pub second: Moiety,
}

fn parse_canvas_size(value: &str) -> Result<(f64, f64), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let parse = |part: &str| -> Result<f64, String> {
        part.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid canvas dimension '{}'", part))
    };
    Ok((parse(width)?, parse(height)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucleokit::core::models::component::{BaseLetter, SugarVariant};

    #[test]
    fn replay_parses_overrides() {
        let cli = Cli::try_parse_from([
            "nucleo",
            "-vv",
            "replay",
            "session.toml",
            "--threshold",
            "42.5",
            "--canvas",
            "1024x768",
            "-S",
            "fine-tune-factor=0.5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.script, PathBuf::from("session.toml"));
                assert_eq!(args.threshold, Some(42.5));
                assert_eq!(args.canvas, Some((1024.0, 768.0)));
                assert_eq!(args.set_values, vec!["fine-tune-factor=0.5".to_string()]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn check_parses_component_specs() {
        let cli = Cli::try_parse_from(["nucleo", "check", "dna-sugar", "base:T"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.first, Moiety::Sugar(SugarVariant::Deoxyribose));
                assert_eq!(args.second, Moiety::Base(BaseLetter::T));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn check_rejects_unknown_component() {
        assert!(Cli::try_parse_from(["nucleo", "check", "lipid", "base:A"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["nucleo", "-q", "-v", "check", "p", "ribose"]).is_err());
    }

    #[test]
    fn canvas_size_requires_two_numbers() {
        assert_eq!(parse_canvas_size("800X600"), Ok((800.0, 600.0)));
        assert!(parse_canvas_size("800").is_err());
        assert!(parse_canvas_size("wide x 600").is_err());
    }
}
