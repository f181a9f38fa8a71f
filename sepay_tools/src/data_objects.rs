use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shop_common::Amount;

use crate::helpers::parse_sepay_amount;

/// SePay reports local (Indochina) time without an offset.
const SEPAY_UTC_OFFSET_SECS: i32 = 7 * 3600;
const SEPAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionList {
    #[serde(default)]
    pub transactions: Vec<SepayTransaction>,
}

/// One transaction on the bank account. SePay has changed its field names over time, so every field is optional and
/// the accessors fall back through the known alternatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SepayTransaction {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub transaction_date: Option<String>,
    pub transaction_content: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount_in: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount_out: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub reference_number: Option<String>,
    pub account_number: Option<String>,
}

impl SepayTransaction {
    /// The transfer description: `transaction_content`, else `content`, else `description`, else empty.
    pub fn memo(&self) -> &str {
        [&self.transaction_content, &self.content, &self.description]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The incoming amount: `amount_in` if it is present, else `amount`, else zero. An explicit zero `amount_in` (an
    /// outgoing transfer) stays zero. Unparseable values count as zero, so a malformed row can never satisfy a payment.
    pub fn incoming_amount(&self) -> Amount {
        let field = [&self.amount_in, &self.amount].into_iter().flatten().map(|s| s.trim()).find(|s| !s.is_empty());
        field.and_then(|s| parse_sepay_amount(s).ok()).unwrap_or_default()
    }

    pub fn txid(&self) -> String {
        self.id.clone().or_else(|| self.reference_number.clone()).unwrap_or_default()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(self.transaction_date.as_deref()?, SEPAY_DATE_FORMAT).ok()?;
        let offset = FixedOffset::east_opt(SEPAY_UTC_OFFSET_SECS)?;
        naive.and_local_timezone(offset).single().map(|t| t.with_timezone(&Utc))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
