use serde::{Deserialize, Serialize};

use crate::db_types::{Amount, ReferenceToken};

pub const VIETQR_IMAGE_BASE_URL: &str = "https://img.vietqr.io/image";

/// The shop's receiving bank account, as shown to buyers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDisplayConfig {
    /// The bank's BIN (the six digit identifier used by VietQR).
    pub bank_bin: String,
    pub bank_account: String,
    pub bank_name: String,
    pub account_owner: String,
}

impl PaymentDisplayConfig {
    /// Everything the buyer needs to make the transfer for an order.
    pub fn instructions_for(&self, amount: Amount, memo: &ReferenceToken) -> PaymentInstructions {
        PaymentInstructions {
            bank_name: self.bank_name.clone(),
            bank_account: self.bank_account.clone(),
            account_owner: self.account_owner.clone(),
            amount,
            memo: memo.clone(),
            qr_url: self.qr_url(amount, memo),
        }
    }

    /// A VietQR image URL that pre-fills the account, amount and memo in the buyer's banking app.
    pub fn qr_url(&self, amount: Amount, memo: &ReferenceToken) -> String {
        format!(
            "{VIETQR_IMAGE_BASE_URL}/{}-{}-compact2.png?amount={}&addInfo={}&accountName={}",
            self.bank_bin,
            self.bank_account,
            amount.value(),
            urlencoding::encode(memo.as_str()),
            urlencoding::encode(&self.account_owner)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstructions {
    pub bank_name: String,
    pub bank_account: String,
    pub account_owner: String,
    pub amount: Amount,
    /// Must appear in the transfer description.
    pub memo: ReferenceToken,
    pub qr_url: String,
}
