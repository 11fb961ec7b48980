//! Colombian peso formatting helpers.
//!
//! Amounts throughout the crate are integer COP minor units. The peso has no
//! fractional unit in this storefront, so formatting is thousands grouping
//! with `.` separators in the es-CO style.

/// Formats an integer COP amount as `$1.234.567 COP`.
#[must_use]
pub fn format_cop(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let len = digits.len();

    let mut out = String::with_capacity(len + len / 3 + 6);

    if amount < 0 {
        out.push('-');
    }

    out.push('$');

    for (index, digit) in digits.chars().enumerate() {
        if index != 0 && (len - index) % 3 == 0 {
            out.push('.');
        }

        out.push(digit);
    }

    out.push_str(" COP");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_amounts_without_grouping() {
        assert_eq!(format_cop(0), "$0 COP");
        assert_eq!(format_cop(999), "$999 COP");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_cop(1_000), "$1.000 COP");
        assert_eq!(format_cop(55_000), "$55.000 COP");
        assert_eq!(format_cop(540_000), "$540.000 COP");
        assert_eq!(format_cop(1_234_567), "$1.234.567 COP");
    }

    #[test]
    fn negative_amounts_keep_the_sign_ahead_of_the_symbol() {
        assert_eq!(format_cop(-20_000), "-$20.000 COP");
    }
}
