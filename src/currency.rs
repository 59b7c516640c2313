use std::str::FromStr;

use crate::ConfigError;
use crate::prelude::*;

/// How an amount is laid out for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyStyle {
    pub symbol:       &'static str,
    /// `.` for digit groups and `,` before decimals (de-DE layout)
    pub use_comma:    bool,
    /// Two fraction digits, or none at all
    pub use_decimals: bool,
    /// One space between symbol and number
    pub use_space:    bool,
    /// Symbol after the number
    pub right:        bool,
}

const fn style(symbol: &'static str, use_comma: bool, use_decimals: bool, use_space: bool, right: bool) -> CurrencyStyle {
    CurrencyStyle { symbol, use_comma, use_decimals, use_space, right }
}

/// Supported display currencies, identified by lowercase ISO 4217 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Currency {
    #[default]
    #[display(fmt = "usd")]
    Usd,
    #[display(fmt = "eur")]
    Eur,
    #[display(fmt = "egp")]
    Egp,
    #[display(fmt = "gbp")]
    Gbp,
    #[display(fmt = "jpy")]
    Jpy,
    #[display(fmt = "cny")]
    Cny,
    #[display(fmt = "krw")]
    Krw,
    #[display(fmt = "inr")]
    Inr,
    #[display(fmt = "rub")]
    Rub,
    #[display(fmt = "brl")]
    Brl,
    #[display(fmt = "zar")]
    Zar,
    #[display(fmt = "aed")]
    Aed,
    #[display(fmt = "aud")]
    Aud,
    #[display(fmt = "cad")]
    Cad,
    #[display(fmt = "chf")]
    Chf,
    #[display(fmt = "hkd")]
    Hkd,
    #[display(fmt = "bdt")]
    Bdt,
    #[display(fmt = "sgd")]
    Sgd,
    #[display(fmt = "thb")]
    Thb,
    #[display(fmt = "try")]
    Try,
    #[display(fmt = "mxn")]
    Mxn,
    #[display(fmt = "php")]
    Php,
    #[display(fmt = "pln")]
    Pln,
    #[display(fmt = "sek")]
    Sek,
    #[display(fmt = "nzd")]
    Nzd,
    #[display(fmt = "dkk")]
    Dkk,
    #[display(fmt = "idr")]
    Idr,
    #[display(fmt = "ils")]
    Ils,
    #[display(fmt = "vnd")]
    Vnd,
    #[display(fmt = "myr")]
    Myr,
    #[display(fmt = "mad")]
    Mad,
}

impl Currency {
    pub const ALL: [Self; 31] = [
        Self::Usd, Self::Eur, Self::Egp, Self::Gbp, Self::Jpy, Self::Cny, Self::Krw, Self::Inr,
        Self::Rub, Self::Brl, Self::Zar, Self::Aed, Self::Aud, Self::Cad, Self::Chf, Self::Hkd,
        Self::Bdt, Self::Sgd, Self::Thb, Self::Try, Self::Mxn, Self::Php, Self::Pln, Self::Sek,
        Self::Nzd, Self::Dkk, Self::Idr, Self::Ils, Self::Vnd, Self::Myr, Self::Mad,
    ];

    pub const fn style(self) -> CurrencyStyle {
        match self {
            Self::Usd => style("$", false, true, false, false),
            Self::Eur => style("€", true, true, false, false),
            Self::Egp => style("E£", false, true, true, false),
            Self::Gbp => style("£", false, true, false, false),
            Self::Jpy => style("¥", false, false, false, false),
            Self::Cny => style("¥", false, true, false, false),
            Self::Krw => style("₩", false, false, false, false),
            Self::Inr => style("₹", false, true, false, false),
            Self::Rub => style("₽", true, true, false, false),
            Self::Brl => style("R$", true, true, false, false),
            Self::Zar => style("R", false, true, true, true),
            Self::Aed => style("AED", false, true, true, true),
            Self::Aud => style("A$", false, true, false, false),
            Self::Cad => style("C$", false, true, false, false),
            Self::Chf => style("Fr", false, true, true, true),
            Self::Hkd => style("HK$", false, true, false, false),
            Self::Bdt => style("৳", false, true, false, false),
            Self::Sgd => style("S$", false, true, false, false),
            Self::Thb => style("฿", false, true, false, false),
            Self::Try => style("₺", true, true, false, false),
            Self::Mxn => style("Mex$", false, true, false, false),
            Self::Php => style("₱", false, true, false, false),
            Self::Pln => style("zł", true, true, true, true),
            Self::Sek => style("kr", false, true, true, true),
            Self::Nzd => style("NZ$", false, true, false, false),
            Self::Dkk => style("kr.", true, true, true, true),
            Self::Idr => style("Rp", false, true, true, true),
            Self::Ils => style("₪", false, true, false, false),
            Self::Vnd => style("₫", true, false, true, true),
            Self::Myr => style("RM", false, true, false, false),
            Self::Mad => style("DH", false, true, true, true),
        }
    }

    /// Formats `amount` in this currency's layout.
    pub fn format(self, amount: f64) -> String {
        self.style().format(amount)
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(code))
            .ok_or_else(|| ConfigError::UnknownCurrency(s.to_owned()))
    }
}

impl serde::Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl CurrencyStyle {
    pub fn format(&self, amount: f64) -> String {
        let number = self.format_number(amount.abs());

        let space = if self.use_space { " " } else { "" };
        let laid_out = if self.right {
            format!("{number}{space}{}", self.symbol)
        } else {
            format!("{}{space}{number}", self.symbol)
        };

        if amount < 0.0 { format!("-{laid_out}") } else { laid_out }
    }

    fn format_number(&self, abs: f64) -> String {
        if abs.is_nan() {
            return NAN_TEXT.to_owned();
        }
        if abs.is_infinite() {
            return INFINITY_TEXT.to_owned();
        }

        let (group_sep, decimal_sep) = if self.use_comma { ('.', ',') } else { (',', '.') };
        let fraction_digits = if self.use_decimals { FRACTION_DIGITS } else { 0 };

        // Above 2^53 every f64 is a whole number and scaling could overflow.
        let scaled = if abs >= EXACT_INTEGER_LIMIT {
            format!("{abs:.0}{}", "0".repeat(fraction_digits))
        } else {
            let factor = if self.use_decimals { 100.0 } else { 1.0 };
            format!("{:0>width$.0}", (abs * factor).round(), width = fraction_digits + 1)
        };

        let (whole, fraction) = scaled.split_at(scaled.len() - fraction_digits);
        let grouped = group_digits(whole, group_sep);
        if fraction.is_empty() { grouped } else { format!("{grouped}{decimal_sep}{fraction}") }
    }
}

const FRACTION_DIGITS: usize = 2;
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;
const NAN_TEXT: &str = "NaN";
const INFINITY_TEXT: &str = "∞";

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Formats `amount` for display; an unset currency falls back to US dollars.
pub fn format_currency(amount: f64, currency: Option<Currency>) -> String {
    currency.unwrap_or_default().format(amount)
}
