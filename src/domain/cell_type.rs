// ============================================================
// Layer 3 — Recurrent Cell Type
// ============================================================
// Which recurrent cell the encoder and decoder are built from.
// Selected on the command line with --type.

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// Elman RNN with a ReLU non-linearity
    Relu,
    /// Long short-term memory
    Lstm,
}

impl FromStr for CellType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relu" => Ok(Self::Relu),
            "lstm" => Ok(Self::Lstm),
            other => Err(anyhow::anyhow!(
                "model argument should be relu or lstm (got '{other}')"
            )),
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relu => f.write_str("relu"),
            Self::Lstm => f.write_str("lstm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_types() {
        assert_eq!("relu".parse::<CellType>().unwrap(), CellType::Relu);
        assert_eq!("lstm".parse::<CellType>().unwrap(), CellType::Lstm);
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = "gru".parse::<CellType>().unwrap_err();
        assert!(err.to_string().contains("relu or lstm"));
    }

    #[test]
    fn test_parsing_is_case_sensitive() {
        assert!("LSTM".parse::<CellType>().is_err());
    }

    #[test]
    fn test_display_matches_cli_value() {
        assert_eq!(CellType::Lstm.to_string(), "lstm");
    }
}
