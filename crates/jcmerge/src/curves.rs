//! Curve-specific source files that can be appended to the merged library

use std::{fmt, str::FromStr};

use clap::ValueEnum;

use crate::error::MergeError;

/// Elliptic curves shipped as standalone source files under `curves/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Curve {
    #[value(name = "SecP256r1")]
    SecP256r1,
    #[default]
    #[value(name = "SecP256k1")]
    SecP256k1,
    #[value(name = "SecP512r1")]
    SecP512r1,
    #[value(name = "Wei25519")]
    Wei25519,
}

impl Curve {
    pub const ALL: [Self; 4] = [
        Self::SecP256r1,
        Self::SecP256k1,
        Self::SecP512r1,
        Self::Wei25519,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SecP256r1 => "SecP256r1",
            Self::SecP256k1 => "SecP256k1",
            Self::SecP512r1 => "SecP512r1",
            Self::Wei25519 => "Wei25519",
        }
    }

    /// File name of the curve source inside the `curves/` directory
    pub fn file_name(self) -> String {
        format!("{}.java", self.name())
    }

    /// Parse every identifier, failing on the first one outside the set
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, MergeError> {
        names.iter().map(|name| name.as_ref().parse()).collect()
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|curve| curve.name() == s)
            .ok_or_else(|| MergeError::UnknownCurve {
                name: s.to_owned(),
                expected: Self::ALL.map(Self::name).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_curves() {
        assert_eq!("Wei25519".parse::<Curve>().unwrap(), Curve::Wei25519);
        assert_eq!(
            Curve::parse_all(&["SecP512r1", "SecP256r1"]).unwrap(),
            vec![Curve::SecP512r1, Curve::SecP256r1]
        );
    }

    #[test]
    fn test_unknown_curve_is_configuration_error() {
        let err = "secp256k1".parse::<Curve>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("secp256k1"));
        assert!(
            err.to_string()
                .contains("SecP256r1, SecP256k1, SecP512r1, Wei25519")
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(Curve::SecP256k1.file_name(), "SecP256k1.java");
    }
}
