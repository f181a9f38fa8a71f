use shop_common::Amount;

use crate::SepayApiError;

/// Parses an amount as SePay reports it, e.g. `"2277000.00"` or `"50000"`. The fractional part is dropped, since
/// VND has no minor unit in practice.
pub fn parse_sepay_amount(s: &str) -> Result<Amount, SepayApiError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SepayApiError::InvalidCurrencyAmount("empty amount".to_string()));
    }
    let whole = s.split_once('.').map(|(whole, _)| whole).unwrap_or(s);
    let whole = if whole.is_empty() { "0" } else { whole };
    whole.parse::<i64>().map(Amount::from).map_err(|e| SepayApiError::InvalidCurrencyAmount(format!("{s}: {e}")))
}
