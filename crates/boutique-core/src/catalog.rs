//! Price formatting and catalog navigation helpers.

use tracing::debug;

use crate::error::{ControllerError, Result};

/// Catalog page used for category filtering.
pub const CATALOG_PATH: &str = "/boutique";

const NO_BREAK_SPACE: char = '\u{00A0}';
const NARROW_NO_BREAK_SPACE: char = '\u{202F}';

/// Render `amount` as euros the way the `fr-FR` locale does:
/// `1234.5` becomes `"1 234,50 €"` with a narrow no-break space between
/// digit groups and a no-break space before the symbol.
#[must_use]
pub fn format_price(amount: f64) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_nan() {
        "-"
    } else {
        ""
    };
    if amount.is_nan() {
        return format!("NaN{NO_BREAK_SPACE}€");
    }
    if amount.is_infinite() {
        return format!("{sign}∞{NO_BREAK_SPACE}€");
    }

    let cents = cent_digits(amount.abs());
    let (units, fraction) = cents.split_at(cents.len() - 2);
    format!(
        "{sign}{},{fraction}{NO_BREAK_SPACE}€",
        group_thousands(units)
    )
}

/// Decimal digits of `amount` in cents, rounded half away from zero on the
/// shortest round-trip representation. `f64` display never uses an exponent,
/// so there are always at least three digits.
fn cent_digits(amount: f64) -> String {
    let repr = amount.to_string();
    let (units, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut fraction = fraction.bytes().chain(std::iter::repeat(b'0'));

    let mut digits: Vec<u8> = units.bytes().collect();
    digits.extend(fraction.by_ref().take(2));
    if fraction.next().is_some_and(|d| d >= b'5') {
        increment(&mut digits);
    }
    digits.into_iter().map(char::from).collect()
}

fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NARROW_NO_BREAK_SPACE);
        }
        out.push(ch);
    }
    out
}

/// Catalog URL listing only `category`.
#[must_use]
pub fn category_url(catalog_path: &str, category: &str) -> String {
    format!("{catalog_path}?categorie={}", urlencoding::encode(category))
}

/// Product search has no client-side implementation; the storefront only
/// filters through full-page category navigation.
pub fn search_products(query: &str) -> Result<()> {
    debug!(query, "product search requested");
    Err(ControllerError::NotImplemented {
        capability: "product search",
    })
}
