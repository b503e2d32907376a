//! # tzkit CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tzkit_cli::address::{run_address, AddressArgs};
use tzkit_cli::inspect::{run_inspect, InspectArgs};
use tzkit_cli::key::{run_key, KeyArgs};
use tzkit_cli::zarith::{run_zarith, ZarithArgs};
use tzkit_cli::{Config, Context};

/// tzkit: identity and wire-encoding toolkit.
///
/// Decodes base58check hashes, addresses, keys and signatures; generates
/// keys and signs on ed25519, secp256k1, P-256 and BLS12-381; and runs the
/// zarith integer codec.
#[derive(Parser, Debug)]
#[command(name = "tzkit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Identify and decode any base58check value.
    Inspect(InspectArgs),

    /// Address binary forms and blinding.
    Address(AddressArgs),

    /// Key generation, signing, verification, and encryption.
    Key(KeyArgs),

    /// Zarith integer encode/decode.
    Zarith(ZarithArgs),
}

fn log_filter(verbose: u8) -> EnvFilter {
    if verbose == 0 {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("tzkit CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    let ctx = Context::new(config, cli.json);

    let result = match cli.command {
        Commands::Inspect(args) => run_inspect(&args, &ctx),
        Commands::Address(args) => run_address(&args, &ctx),
        Commands::Key(args) => run_key(&args, &ctx),
        Commands::Zarith(args) => run_zarith(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tzkit_cli::address::AddressCommand;
    use tzkit_cli::key::KeyCommand;
    use tzkit_cli::zarith::ZarithCommand;
    use tzkit_crypto::KeyType;

    #[test]
    fn cli_parse_inspect() {
        let cli = Cli::try_parse_from(["tzkit", "inspect", "tz1LggX2HUdvJ1tF4Fvv8fjsrzLeW4Jr9t2Q"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Inspect(ref a) if a.text.starts_with("tz1")));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.json);
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tzkit",
            "zarith",
            "encode",
            "42",
            "-vv",
            "--json",
            "--config",
            "tzkit.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("tzkit.yaml")));
    }

    #[test]
    fn cli_parse_negative_zarith_value() {
        let cli = Cli::try_parse_from(["tzkit", "zarith", "encode", "--", "-64"]).unwrap();
        match cli.command {
            Commands::Zarith(args) => match args.command {
                ZarithCommand::Encode { value, unsigned } => {
                    assert_eq!(value, "-64");
                    assert!(!unsigned);
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_parse_key_gen_curve() {
        let cli = Cli::try_parse_from(["tzkit", "key", "gen", "--curve", "bls12_381", "--encrypt"])
            .unwrap();
        match cli.command {
            Commands::Key(args) => match args.command {
                KeyCommand::Gen { curve, encrypt } => {
                    assert_eq!(curve, Some(KeyType::Bls12_381));
                    assert!(encrypt);
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_parse_key_gen_rejects_unknown_curve() {
        assert!(Cli::try_parse_from(["tzkit", "key", "gen", "--curve", "ed448"]).is_err());
    }

    #[test]
    fn cli_parse_key_verify_flags() {
        let cli = Cli::try_parse_from([
            "tzkit", "key", "verify", "edpk", "00ff", "edsig", "--hex", "--raw",
        ])
        .unwrap();
        match cli.command {
            Commands::Key(args) => match args.command {
                KeyCommand::Verify { input, message, .. } => {
                    assert!(input.hex);
                    assert!(input.raw);
                    assert_eq!(message, "00ff");
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_parse_address_match() {
        let cli = Cli::try_parse_from([
            "tzkit", "address", "match", "tz1a", "btz1b", "--secret", "00ff",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Address(ref a) if matches!(a.command, AddressCommand::Match { .. })
        ));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tzkit"]).is_err());
    }

    #[test]
    fn verbose_levels_map_to_filters() {
        assert_eq!(log_filter(1).to_string(), "info");
        assert_eq!(log_filter(2).to_string(), "debug");
        assert_eq!(log_filter(5).to_string(), "trace");
    }
}
