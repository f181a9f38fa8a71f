mod amount;
mod helpers;
mod secret;

pub use amount::{Amount, AmountConversionError, CURRENCY_CODE};
pub use helpers::parse_list;
pub use secret::Secret;
