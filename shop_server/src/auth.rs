//! Access control for the admin routes.
//!
//! Buyers are identified by the chat front end, which is trusted to pass the right buyer id. Admin reports are
//! guarded by a shared key in the `shop_admin_key` header.
use actix_web::HttpRequest;
use log::*;
use shop_common::Secret;

use crate::errors::ServerError;

pub const ADMIN_KEY_HEADER: &str = "shop_admin_key";

#[derive(Clone, Debug, Default)]
pub struct AdminAuth {
    api_key: Secret<String>,
}

impl AdminAuth {
    pub fn new(api_key: Secret<String>) -> Self {
        Self { api_key }
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.reveal().is_empty()
    }

    /// Fails with `Unauthorized` if no key was supplied and with `InsufficientPermissions` if it is wrong or admin
    /// access is disabled.
    pub fn check(&self, req: &HttpRequest) -> Result<(), ServerError> {
        if !self.is_enabled() {
            debug!("💻️ Admin request refused. No admin key is configured.");
            return Err(ServerError::InsufficientPermissions("Admin access is disabled.".into()));
        }
        let supplied = req
            .headers()
            .get(ADMIN_KEY_HEADER)
            .ok_or_else(|| ServerError::Unauthorized(format!("The {ADMIN_KEY_HEADER} header is missing.")))?
            .to_str()
            .map_err(|e| ServerError::Unauthorized(format!("The {ADMIN_KEY_HEADER} header is unreadable. {e}")))?;
        if supplied != self.api_key.reveal() {
            warn!("💻️ Admin request with an invalid key from {:?}", req.peer_addr());
            return Err(ServerError::InsufficientPermissions("Invalid admin key.".into()));
        }
        Ok(())
    }
}
