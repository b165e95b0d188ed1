use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cell;

/// T-shirt sizes carried in the kit stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShirtSize {
    S,
    M,
    L,
    XL,
    XXL,
}

impl ShirtSize {
    pub const ALL: [ShirtSize; 5] = [
        ShirtSize::S,
        ShirtSize::M,
        ShirtSize::L,
        ShirtSize::XL,
        ShirtSize::XXL,
    ];

    /// Parse a size cell. Case-insensitive; unknown sizes return None.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Some(ShirtSize::S),
            "M" => Some(ShirtSize::M),
            "L" => Some(ShirtSize::L),
            "XL" => Some(ShirtSize::XL),
            "XXL" | "2XL" => Some(ShirtSize::XXL),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShirtSize::S => "S",
            ShirtSize::M => "M",
            ShirtSize::L => "L",
            ShirtSize::XL => "XL",
            ShirtSize::XXL => "XXL",
        }
    }

    /// Next size in the ALL order (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            ShirtSize::S => ShirtSize::M,
            ShirtSize::M => ShirtSize::L,
            ShirtSize::L => ShirtSize::XL,
            ShirtSize::XL => ShirtSize::XXL,
            ShirtSize::XXL => ShirtSize::S,
        }
    }

    /// Previous size in the ALL order (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            ShirtSize::S => ShirtSize::XXL,
            ShirtSize::M => ShirtSize::S,
            ShirtSize::L => ShirtSize::M,
            ShirtSize::XL => ShirtSize::L,
            ShirtSize::XXL => ShirtSize::XL,
        }
    }
}

impl fmt::Display for ShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for ShirtSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ShirtSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = cell::de_text(deserializer)?;
        ShirtSize::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown shirt size: {:?}", text)))
    }
}

/// Lenient size cell: unknown or empty sizes become None instead of failing the row
pub fn de_opt_size<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ShirtSize>, D::Error> {
    let text = cell::de_text(deserializer)?;
    Ok(ShirtSize::parse(&text))
}

pub fn ser_opt_size<S: Serializer>(
    size: &Option<ShirtSize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(size.map(|s| s.label()).unwrap_or("N/A"))
}

/// One row of the stock sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    #[serde(rename = "Size", deserialize_with = "cell::de_text")]
    pub size: String,
    #[serde(rename = "Quantity", default, deserialize_with = "de_quantity")]
    pub quantity: u32,
}

/// Quantities arrive as ints, floats ("100.0") or text; negatives clamp to 0
fn de_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let text = cell::de_text(deserializer)?;
    let parsed = text.parse::<f64>().unwrap_or(0.0);
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed.min(u32::MAX as f64) as u32)
    } else {
        Ok(0)
    }
}

/// Total T-shirts ordered per size.
///
/// This is the only persisted stock quantity. Remaining stock is always
/// derived from the roster (see `inventory`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLedger {
    total_ordered: BTreeMap<ShirtSize, u32>,
}

impl Default for StockLedger {
    fn default() -> Self {
        Self {
            total_ordered: ShirtSize::ALL.iter().map(|s| (*s, 0)).collect(),
        }
    }
}

impl StockLedger {
    pub fn total_ordered(&self, size: ShirtSize) -> u32 {
        self.total_ordered.get(&size).copied().unwrap_or(0)
    }

    pub fn set_total(&mut self, size: ShirtSize, quantity: u32) {
        self.total_ordered.insert(size, quantity);
    }

    /// Build a ledger from sheet rows. Unknown sizes are ignored, missing sizes stay 0.
    pub fn from_rows(rows: &[StockRow]) -> Self {
        let mut ledger = Self::default();
        for row in rows {
            if let Some(size) = ShirtSize::parse(&row.size) {
                ledger.set_total(size, row.quantity);
            }
        }
        ledger
    }

    pub fn to_rows(&self) -> Vec<StockRow> {
        ShirtSize::ALL
            .iter()
            .map(|size| StockRow {
                size: size.label().to_string(),
                quantity: self.total_ordered(*size),
            })
            .collect()
    }
}

impl Serialize for StockLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StockLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<StockRow>::deserialize(deserializer)?;
        Ok(Self::from_rows(&rows))
    }
}
