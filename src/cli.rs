//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::codec::CodecCommand;

/// Minecraft protocol client tooling.
#[derive(Parser, Debug)]
#[command(name = "rauncher-net")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Yggdrasil authentication
    Auth(AuthCommand),

    /// Encode and decode primitive wire datatypes
    #[command(subcommand)]
    Codec(CodecCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_negative_codec_values() {
        let cli = Cli::try_parse_from(["rauncher-net", "codec", "encode", "short", "-12"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Codec(CodecCommand::Encode { ref value, .. }) if value == "-12"
        ));
    }
}
