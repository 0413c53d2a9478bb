//! Height unit conversion.

/// Centimeters per unit, keyed by lower-cased unit label.
const UNIT_FACTORS: &[(&str, f64)] = &[
    ("centimeter", 1.0),
    ("centimeters", 1.0),
    ("centimetre", 1.0),
    ("centimetres", 1.0),
    ("feet", 30.48),
    ("foot", 30.48),
    ("inch", 2.54),
    ("inches", 2.54),
    ("meter", 100.0),
    ("meters", 100.0),
    ("metre", 100.0),
    ("metres", 100.0),
];

fn unit_factor(unit_label: &str) -> Option<f64> {
    let unit = unit_label.trim().to_lowercase();
    UNIT_FACTORS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
}

/// Convert a height to whole centimeters.
///
/// Returns `None` when `raw_value` is not a finite decimal number or the unit is
/// not one of meter/centimeter/foot/inch (singular or plural, British or
/// American spelling), or when the result does not fit in an `i64`. Rounds half
/// away from zero: `("170.5", "centimetre")` is 171.
pub fn normalize_height(raw_value: &str, unit_label: &str) -> Option<i64> {
    let value: f64 = raw_value.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let factor = unit_factor(unit_label)?;
    let centimeters = (value * factor).round();
    // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
    if centimeters < i64::MIN as f64 || centimeters >= i64::MAX as f64 {
        return None;
    }
    Some(centimeters as i64)
}
