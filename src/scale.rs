//! Serving based scaling of raw amount strings.

use crate::model::{Recipe, Token};

/// Whole numbers render without a fractional part, everything else with
/// exactly one decimal place, ties rounded away from zero (`0.25` -> `0.3`).
fn format_scaled(value: f64) -> String {
    if value.fract() == 0.0 {
        // avoids "-0"
        format!("{}", value + 0.0)
    } else {
        let rounded = (value * 10.0).round() / 10.0;
        format!("{rounded:.1}")
    }
}

/// `\d+(\.\d+)?`
fn is_unsigned_decimal(text: &str) -> bool {
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && frac.map_or(true, digits)
}

fn parse_range(amount: &str) -> Option<(f64, f64)> {
    let (low, high) = amount.split_once('-')?;
    if !is_unsigned_decimal(low) || !is_unsigned_decimal(high) {
        return None;
    }
    Some((low.parse().ok()?, high.parse().ok()?))
}

fn parse_fraction(amount: &str) -> Option<f64> {
    let (numerator, denominator) = amount.split_once('/')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(numerator) || !digits(denominator) {
        return None;
    }
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator.parse::<f64>().ok()? / denominator)
}

fn parse_number(amount: &str) -> Option<f64> {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Scale a raw amount string by `scale`.
///
/// - ranges `N-M` scale both bounds
/// - fractions `N/M` become a decimal
/// - plain numbers are multiplied
/// - anything else is returned unchanged
pub fn scale_amount(amount: &str, scale: f64) -> String {
    if amount.is_empty() {
        return String::new();
    }
    if let Some((low, high)) = parse_range(amount) {
        return format!("{}-{}", format_scaled(low * scale), format_scaled(high * scale));
    }
    if let Some(value) = parse_fraction(amount).or_else(|| parse_number(amount)) {
        return format_scaled(value * scale);
    }
    amount.to_string()
}

/// Leading integer of a text such as `"4 Portionen"`.
pub fn leading_integer(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let end = text
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Declared servings of a recipe, 1 when missing, unparsable or zero.
pub fn base_servings(recipe: &Recipe) -> f64 {
    match recipe.servings() {
        Some(servings) if servings > 0 => f64::from(servings),
        _ => 1.0,
    }
}

impl Recipe {
    /// Copy of the recipe with every non-fixed ingredient amount scaled.
    pub fn scaled(&self, factor: f64) -> Recipe {
        let mut recipe = self.clone();
        let tokens = recipe
            .sections
            .iter_mut()
            .flat_map(|section| section.steps.iter_mut())
            .flat_map(|step| step.tokens.iter_mut());

        for token in tokens {
            if let Token::Ingredient(ingredient) = token {
                if !ingredient.fixed {
                    ingredient.amount = scale_amount(&ingredient.amount, factor);
                }
            }
        }
        recipe
    }

    /// Scale to `target` servings and record the new serving count.
    pub fn scale_to_servings(&self, target: u32) -> Recipe {
        let factor = f64::from(target) / base_servings(self);
        let mut recipe = self.scaled(factor);
        recipe.metadata.insert("servings", target.to_string());
        recipe
    }
}
