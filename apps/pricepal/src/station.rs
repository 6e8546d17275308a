//! # Scan Station Input
//!
//! Line commands read by the `pricepal` binary. With no camera attached,
//! the operator types what the camera would have seen.
//!
//! ```text
//! ean-13:012345678905    simulate a scan (any code type, unsupported ones
//!                        are ignored by the decoder)
//! shop Corner Store      pick the shop used for lookups
//! again                  Scan Again
//! quit | exit            stop the station
//! ```

use pricepal_scanner::CodeType;

/// One parsed line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationInput {
    Scan { code_type: CodeType, value: String },
    SelectShop(String),
    ScanAgain,
    Quit,
    Empty,
    Invalid(String),
}

impl StationInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return StationInput::Empty;
        }

        match line.to_lowercase().as_str() {
            "again" | "scan again" | "reset" => return StationInput::ScanAgain,
            "quit" | "exit" | "q" => return StationInput::Quit,
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("shop ") {
            let name = rest.trim();
            return if name.is_empty() {
                StationInput::Invalid("shop needs a name".to_string())
            } else {
                StationInput::SelectShop(name.to_string())
            };
        }

        let Some((kind, value)) = line.split_once(':') else {
            return StationInput::Invalid(format!("unrecognized input: {}", line));
        };

        match kind.parse::<CodeType>() {
            Ok(code_type) => StationInput::Scan {
                code_type,
                value: value.trim().to_string(),
            },
            Err(e) => StationInput::Invalid(e.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  <type>:<value>   simulate a scan, e.g. ean-13:012345678905
  shop <name>      select the shop used for lookups
  again            scan again
  quit             stop the station";
