//! Unit normalization using rust_decimal for precision
//!
//! Every quantity comparison in the ledger happens in a canonical base
//! unit per measurement family: grams for mass, milliliters for volume,
//! pieces for count. All conversions are done using `Decimal` internally,
//! then converted to `f64` for storage/serialization, rounded to 2
//! decimal places at the point of conversion so repeated multiplication
//! never grows a floating-point tail (0.7000000000000001 and friends).

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounding applied to every converted quantity (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for quantity comparisons (0.01)
pub const STOCK_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

// Alias tables, matched case- and whitespace-insensitively
const KG_ALIASES: &[&str] = &["kg", "kgs", "kilogram", "kilograms"];
const GM_ALIASES: &[&str] = &["gm", "g", "gms", "gram", "grams"];
const LTR_ALIASES: &[&str] = &["ltr", "l", "ltrs", "litre", "liter", "litres", "liters"];
const ML_ALIASES: &[&str] = &["ml", "millilitre", "milliliter", "millilitres", "milliliters"];
const PIECE_ALIASES: &[&str] = &["pieces", "piece", "pcs", "pc", "nos", "no"];

/// Canonical base unit per measurement family
///
/// Unknown unit strings are carried through as their own single-member
/// family (`Other`) rather than rejected. The unit-family comparison at
/// deduction time still catches cross-family recipes; what this fallback
/// deliberately allows is stock and recipe agreeing on a unit the alias
/// tables have never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseUnit {
    Gram,
    Milliliter,
    Piece,
    /// Lowercased, trimmed passthrough for unrecognized units
    Other(String),
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseUnit::Gram => write!(f, "gm"),
            BaseUnit::Milliliter => write!(f, "ml"),
            BaseUnit::Piece => write!(f, "pieces"),
            BaseUnit::Other(s) => write!(f, "{}", s),
        }
    }
}

/// How a unit string maps onto its family
enum UnitScale {
    /// Already the base unit (gm, ml, pieces)
    Base(BaseUnit),
    /// 1000× the base unit (kg, ltr)
    Thousand(BaseUnit),
}

fn classify(unit: &str) -> UnitScale {
    if KG_ALIASES.contains(&unit) {
        UnitScale::Thousand(BaseUnit::Gram)
    } else if GM_ALIASES.contains(&unit) {
        UnitScale::Base(BaseUnit::Gram)
    } else if LTR_ALIASES.contains(&unit) {
        UnitScale::Thousand(BaseUnit::Milliliter)
    } else if ML_ALIASES.contains(&unit) {
        UnitScale::Base(BaseUnit::Milliliter)
    } else if PIECE_ALIASES.contains(&unit) {
        UnitScale::Base(BaseUnit::Piece)
    } else {
        UnitScale::Base(BaseUnit::Other(unit.to_string()))
    }
}

/// Parse a unit string into its base unit without converting a quantity
///
/// Useful for validating recipe input ahead of deduction time.
pub fn parse_unit(unit: &str) -> BaseUnit {
    let canonical = unit.trim().to_lowercase();
    match classify(&canonical) {
        UnitScale::Base(base) | UnitScale::Thousand(base) => base,
    }
}

/// Convert f64 to Decimal for calculation
///
/// Quantities are validated finite at the model boundary. If NaN/Infinity
/// somehow reaches here, logs an error and returns ZERO rather than
/// corrupting stock arithmetic.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in stock calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // Inputs are bounded storage quantities; a 2dp Decimal is always representable
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Round an f64 quantity to 2 decimal places via Decimal
#[inline]
pub fn round_quantity(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Compare two quantities for equality within 0.01
pub fn quantity_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < STOCK_TOLERANCE
}

/// Normalize an (amount, unit) pair to the family's base unit
///
/// - 1.5 kg → (1500.0, Gram)
/// - 8 ltr → (8000.0, Milliliter)
/// - 100 gm → (100.0, Gram)
/// - 50 pieces → (50.0, Piece)
///
/// Unknown units degrade to identity conversion and are logged once per
/// call site; the family check downstream decides whether they matter.
pub fn normalize(quantity: f64, unit: &str) -> (f64, BaseUnit) {
    let canonical = unit.trim().to_lowercase();
    match classify(&canonical) {
        UnitScale::Thousand(base) => (to_f64(to_decimal(quantity) * Decimal::ONE_THOUSAND), base),
        UnitScale::Base(base) => {
            if let BaseUnit::Other(ref raw) = base {
                tracing::warn!(unit = %raw, "Unknown unit, treating as its own base unit");
            }
            (round_quantity(quantity), base)
        }
    }
}

/// Convert a base-unit quantity back to a target unit
///
/// - (1500.0, Gram) → "kg" = 1.5
/// - (700.0, Gram) → "kg" = 0.7
/// - (8000.0, Milliliter) → "ltr" = 8.0
///
/// If the target does not name the 1000× unit of the same family, the
/// quantity is returned unchanged in magnitude, rounded.
pub fn denormalize(quantity: f64, base_unit: &BaseUnit, target_unit: &str) -> f64 {
    let canonical = target_unit.trim().to_lowercase();
    match classify(&canonical) {
        UnitScale::Thousand(family) if family == *base_unit => {
            to_f64(to_decimal(quantity) / Decimal::ONE_THOUSAND)
        }
        _ => round_quantity(quantity),
    }
}

/// Render a quantity without trailing zeros ("1.5", "8", "700")
pub fn fmt_quantity(value: f64) -> String {
    to_decimal(value)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Human-friendly quantity rendering
///
/// Quantities below one large unit are shown in the base unit with no
/// decimals, everything else in the given unit as-is:
///
/// - 0.7 kg → "700 gm"
/// - 1.5 kg → "1.5 kg"
/// - 0.04 ltr → "40 ml"
/// - 8 ltr → "8 ltr"
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    let canonical = unit.trim().to_lowercase();
    match classify(&canonical) {
        UnitScale::Thousand(base) if quantity < 1.0 => {
            let in_base = (to_decimal(quantity) * Decimal::ONE_THOUSAND)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            format!("{} {}", in_base, base)
        }
        _ => format!("{} {}", fmt_quantity(quantity), canonical),
    }
}

#[cfg(test)]
mod tests;
