//! Quantity stepper arithmetic.
//!
//! Quantities are read the way a browser's `parseInt` reads an input value
//! and always land on a positive integer: the floor is 1, there is no
//! ceiling. Stock is never consulted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Increase,
    Decrease,
}

impl StepDirection {
    /// Direction from a control's tags. `decrease` wins when both are set.
    #[must_use]
    pub fn from_tags(is_decrease: bool, is_increase: bool) -> Option<Self> {
        if is_decrease {
            Some(Self::Decrease)
        } else if is_increase {
            Some(Self::Increase)
        } else {
            None
        }
    }
}

/// Leading integer of `raw`: optional whitespace, optional sign, digits.
/// Trailing garbage is ignored; no digits at all yields `None`.
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let mut magnitude: i64 = 0;
    for digit in digits {
        seen = true;
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }
    seen.then_some(if negative { -magnitude } else { magnitude })
}

/// Next value after one step from `raw`. Unreadable input counts as 1.
#[must_use]
pub fn step_quantity(raw: &str, direction: StepDirection) -> u64 {
    let current = parse_quantity(raw).unwrap_or(1);
    let next = match direction {
        StepDirection::Decrease => current.saturating_sub(1),
        StepDirection::Increase => current.saturating_add(1),
    };
    // Clamped to >= 1 above, so the cast is lossless.
    next.max(1) as u64
}
