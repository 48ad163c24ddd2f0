use serde::{Deserialize, Serialize};

/// ApiUser
///
/// The subset of the backend's user payload this crate consumes. The backend
/// serializes Go structs directly, so field names arrive capitalized on the
/// wire; `serde(rename)` maps them back to Rust conventions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiUser {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Username")]
    pub username: String,
}

/// UserEnvelope
///
/// `GET /me` wraps its payload in a `data` field, like every other endpoint
/// on this backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub data: ApiUser,
}
