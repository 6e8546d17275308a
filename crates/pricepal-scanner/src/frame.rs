//! # Frame Metadata
//!
//! What a camera platform's recognizer reports for one video frame.
//!
//! A recognizer may localize many kinds of objects; only machine-readable
//! code objects of a supported [`Symbology`] are of interest to the decoder.

use pricepal_core::{CoreError, Symbology};

/// Code types a platform recognizer can report.
///
/// Superset of [`Symbology`]: the extra variants exist so that frames from a
/// permissive recognizer can be represented and then ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeType {
    Ean8,
    Ean13,
    Code128,
    UpcE,
    Code39,
    Code93,
    Itf14,
    Qr,
    Pdf417,
    DataMatrix,
    Aztec,
}

impl CodeType {
    /// Maps the code type to a supported symbology, if it is one.
    pub fn symbology(self) -> Option<Symbology> {
        match self {
            CodeType::Ean8 => Some(Symbology::Ean8),
            CodeType::Ean13 => Some(Symbology::Ean13),
            CodeType::Code128 => Some(Symbology::Code128),
            _ => None,
        }
    }
}

impl From<Symbology> for CodeType {
    fn from(symbology: Symbology) -> Self {
        match symbology {
            Symbology::Ean8 => CodeType::Ean8,
            Symbology::Ean13 => CodeType::Ean13,
            Symbology::Code128 => CodeType::Code128,
        }
    }
}

impl std::str::FromStr for CodeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(symbology) = s.parse::<Symbology>() {
            return Ok(symbology.into());
        }

        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "upce" => Ok(CodeType::UpcE),
            "code39" => Ok(CodeType::Code39),
            "code93" => Ok(CodeType::Code93),
            "itf14" => Ok(CodeType::Itf14),
            "qr" => Ok(CodeType::Qr),
            "pdf417" => Ok(CodeType::Pdf417),
            "datamatrix" => Ok(CodeType::DataMatrix),
            "aztec" => Ok(CodeType::Aztec),
            _ => Err(CoreError::UnsupportedSymbology(s.to_string())),
        }
    }
}

/// One object localized in a camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataObject {
    /// A barcode. `value` is `None` when the pattern was located but could
    /// not be decoded.
    MachineReadableCode {
        code_type: CodeType,
        value: Option<String>,
    },
    Face,
    HumanBody,
}

impl MetadataObject {
    /// A decoded code object.
    pub fn code(code_type: CodeType, value: impl Into<String>) -> Self {
        MetadataObject::MachineReadableCode {
            code_type,
            value: Some(value.into()),
        }
    }

    /// A code object whose payload could not be read.
    pub fn undecoded(code_type: CodeType) -> Self {
        MetadataObject::MachineReadableCode {
            code_type,
            value: None,
        }
    }
}
