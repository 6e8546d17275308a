//! # PricePal Scan Station
//!
//! ```bash
//! # Use the platform data directory database
//! cargo run -p pricepal
//!
//! # Seeded dev database, logged in as the demo user
//! cargo run -p pricepal -- --db ./pricepal_dev.db \
//!     --email demo@pricepal.dev --password pricepal
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use pricepal_app::StationOptions;

const HELP: &str = "\
PricePal Scan Station

Usage: pricepal [OPTIONS]

Options:
  -c, --config <PATH>      Config file (default: platform config dir)
  -d, --db <PATH>          Database file path
  -e, --email <EMAIL>      Log in to use your shop for lookups
  -p, --password <PASS>    Password for --email
  -h, --help               Show this help message";

#[derive(Debug)]
enum Command {
    Run(StationOptions),
    Help,
}

/// Parses the arguments after the program name.
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = StationOptions::default();
    let mut args = args.iter();

    while let Some(flag) = args.next() {
        let flag = flag.as_str();
        match flag {
            "--help" | "-h" => return Ok(Command::Help),
            "--config" | "-c" | "--db" | "-d" | "--email" | "-e" | "--password" | "-p" => {}
            other => return Err(format!("Unknown option: {}", other)),
        }

        let value = args
            .next()
            .cloned()
            .ok_or_else(|| format!("missing value for {}", flag))?;

        match flag {
            "--config" | "-c" => options.config_path = Some(PathBuf::from(value)),
            "--db" | "-d" => options.db_path = Some(PathBuf::from(value)),
            "--email" | "-e" => options.email = Some(value),
            _ => options.password = Some(value),
        }
    }

    Ok(Command::Run(options))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{}", HELP);
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    pricepal_app::init_tracing();

    match pricepal_app::run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_all_options() {
        let Ok(Command::Run(options)) = parse_args(&args(&[
            "--db", "./dev.db", "-c", "station.toml", "-e", "demo@pricepal.dev", "--password", "pricepal",
        ])) else {
            panic!("expected options");
        };

        assert_eq!(options.db_path, Some(PathBuf::from("./dev.db")));
        assert_eq!(options.config_path, Some(PathBuf::from("station.toml")));
        assert_eq!(options.email.as_deref(), Some("demo@pricepal.dev"));
        assert_eq!(options.password.as_deref(), Some("pricepal"));
    }

    #[test]
    fn test_flag_without_value_fails() {
        assert_eq!(
            parse_args(&args(&["--db"])).unwrap_err(),
            "missing value for --db"
        );
        assert_eq!(
            parse_args(&args(&["-e", "a@b.co", "-p"])).unwrap_err(),
            "missing value for -p"
        );
    }

    #[test]
    fn test_help_and_unknown_flags() {
        assert!(matches!(parse_args(&args(&["-d", "x.db", "--help"])), Ok(Command::Help)));
        assert_eq!(
            parse_args(&args(&["--verbose"])).unwrap_err(),
            "Unknown option: --verbose"
        );
        assert!(matches!(parse_args(&[]), Ok(Command::Run(_))));
    }
}
