use crate::model::SampleValue;

// Decimal exponents outside of [MIN_PLAIN_EXP, MAX_PLAIN_EXP) switch to the
// exponent notation.
const MIN_PLAIN_EXP: i32 = -4;
const MAX_PLAIN_EXP: i32 = 6;

/// Renders a sample value in the compact `%g` style.
///
/// The digits are the shortest ones that parse back into the same `f64`.
/// Special values are written as `NaN`, `+Inf` and `-Inf`.
pub fn format_value(value: SampleValue) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "+Inf" } else { "-Inf" });
    }

    // `{:e}` gives the shortest round-trip digits, e.g. `-1.25e-7`.
    let sci = format!("{:e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => (mantissa, exp),
            Err(_) => return sci,
        },
        None => return sci,
    };

    if exp < MIN_PLAIN_EXP || exp >= MAX_PLAIN_EXP {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.abs());
    }

    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(unsigned) => ("-", unsigned),
        None => ("", mantissa),
    };
    let digits: String = unsigned.chars().filter(|&c| c != '.').collect();
    let point = exp + 1;

    if point <= 0 {
        format!("{}0.{}{}", sign, "0".repeat(-point as usize), digits)
    } else if point as usize >= digits.len() {
        format!(
            "{}{}{}",
            sign,
            digits,
            "0".repeat(point as usize - digits.len())
        )
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}{}.{}", sign, int, frac)
    }
}
