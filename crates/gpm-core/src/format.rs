//! Number format types

use crate::cell::value::general_number;

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Custom format string (e.g. `$#,##0.00`)
    Custom(String),
}

impl NumberFormat {
    /// Currency with thousands separator and two decimals
    pub const CURRENCY: &'static str = "$#,##0.00";

    /// Percentage with two decimals
    pub const PERCENT_DEC2: &'static str = "0.00%";

    /// Create a number format from a format string
    ///
    /// `"General"` (any case) maps back to [`NumberFormat::General`].
    pub fn from_string<S: Into<String>>(format: S) -> Self {
        let format = format.into();
        if format.is_empty() || format.eq_ignore_ascii_case("general") {
            NumberFormat::General
        } else {
            NumberFormat::Custom(format)
        }
    }

    /// Currency format (`$#,##0.00`)
    pub fn currency() -> Self {
        NumberFormat::Custom(Self::CURRENCY.to_string())
    }

    /// Percentage with decimals (`0.00%`)
    pub fn percent_decimal() -> Self {
        NumberFormat::Custom(Self::PERCENT_DEC2.to_string())
    }

    /// Check for the General format
    pub fn is_general(&self) -> bool {
        matches!(self, NumberFormat::General)
    }

    /// Get the format string
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::Custom(s) => s,
        }
    }

    /// Render a number with this format
    ///
    /// Supports the subset of format codes the add-in writes: a literal
    /// prefix/suffix, `#,##0` grouping, fixed decimals and `%`. Only the first
    /// `;` section is used, with a leading `-` for negatives.
    ///
    /// ```
    /// use gpm_core::NumberFormat;
    ///
    /// assert_eq!(NumberFormat::currency().render(1000.0), "$1,000.00");
    /// assert_eq!(NumberFormat::percent_decimal().render(0.4), "40.00%");
    /// ```
    pub fn render(&self, value: f64) -> String {
        let code = match self {
            NumberFormat::General => return general_number(value),
            NumberFormat::Custom(code) => code.split(';').next().unwrap_or_default(),
        };

        let is_digit_char = |c: char| matches!(c, '#' | '0' | '?' | '.' | ',');
        let (Some(start), Some(end)) = (code.find(is_digit_char), code.rfind(is_digit_char))
        else {
            return general_number(value);
        };

        let prefix = literal_text(&code[..start]);
        let suffix = literal_text(&code[end + 1..]);
        let pattern = &code[start..=end];

        let percent = prefix.contains('%') || suffix.contains('%');
        let decimals = pattern
            .split_once('.')
            .map(|(_, frac)| frac.chars().filter(|c| *c == '0').count())
            .unwrap_or(0);
        let grouped = pattern.contains(',');

        let scaled = if percent { value * 100.0 } else { value };
        let digits = format!("{:.*}", decimals, scaled.abs());
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (digits.clone(), None),
        };

        let mut body = if grouped {
            group_thousands(&int_part)
        } else {
            int_part
        };
        if let Some(frac) = frac_part {
            body.push('.');
            body.push_str(&frac);
        }

        let negative = scaled < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if negative { "-" } else { "" };

        format!("{sign}{prefix}{body}{suffix}")
    }
}

/// Strip quoting and escapes from literal format text
fn literal_text(s: &str) -> String {
    s.chars().filter(|c| *c != '"' && *c != '\\').collect()
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::NumberFormat;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for NumberFormat {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.format_string())
        }
    }

    impl<'de> Deserialize<'de> for NumberFormat {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(NumberFormat::from_string(String::deserialize(deserializer)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        let fmt = NumberFormat::currency();
        assert_eq!(fmt.render(1000.0), "$1,000.00");
        assert_eq!(fmt.render(1234567.891), "$1,234,567.89");
        assert_eq!(fmt.render(-400.0), "-$400.00");
        assert_eq!(fmt.render(0.0), "$0.00");
        assert_eq!(fmt.render(-0.001), "$0.00");
    }

    #[test]
    fn test_percent() {
        let fmt = NumberFormat::percent_decimal();
        assert_eq!(fmt.render(0.4), "40.00%");
        assert_eq!(fmt.render(-0.25), "-25.00%");
        assert_eq!(fmt.render(1.5), "150.00%");
        assert_eq!(NumberFormat::from_string("0%").render(0.123), "12%");
    }

    #[test]
    fn test_plain_codes() {
        assert_eq!(NumberFormat::from_string("#,##0").render(9876.6), "9,877");
        assert_eq!(NumberFormat::from_string("0.0").render(2.26), "2.3");
        assert_eq!(NumberFormat::General.render(600.0), "600");
    }

    #[test]
    fn test_from_string_general() {
        assert!(NumberFormat::from_string("General").is_general());
        assert!(NumberFormat::from_string("").is_general());
        assert_eq!(
            NumberFormat::from_string("$#,##0.00"),
            NumberFormat::currency()
        );
    }
}
