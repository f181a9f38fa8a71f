use serde::{Deserialize, Serialize};

/// Optional `?limit=` query parameter for list endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
