//! Units of sale.

use serde::{Deserialize, Serialize};

/// The unit a product is priced and sold in.
///
/// Only `kg` is weight-based; every other unit is sold in whole counts.
/// Units the counter does not know about are kept verbatim so labels still
/// read the way the backend spells them (`units`, `liters`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    /// Kilograms.
    Kg,
    /// A single countable item.
    Unit,
    /// Any other backend-defined unit.
    Other(String),
}

impl Unit {
    /// The unit as spelled on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kg => "kg",
            Self::Unit => "unit",
            Self::Other(s) => s,
        }
    }

    /// Whether quantities of this unit are weighed rather than counted.
    #[must_use]
    pub const fn is_weight(&self) -> bool {
        matches!(self, Self::Kg)
    }

    /// Per-unit suffix used after a price, e.g. `/kg`.
    #[must_use]
    pub fn price_suffix(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "kg" => Self::Kg,
            "unit" => Self::Unit,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
