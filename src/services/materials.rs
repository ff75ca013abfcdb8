//! Support materials.

use crate::net::http::{ApiClient, ApiError};
use crate::net::types::Material;

/// # Errors
///
/// Returns the transport, status or parse error from the request.
pub async fn list(api: &ApiClient) -> Result<Vec<Material>, ApiError> {
    api.get_json(&["materiais", "listar"], &[])
        .await
        .inspect_err(|e| tracing::error!(error = %e, "material list failed"))
}

/// Raw bytes of a material's attachment.
///
/// `file_name` travels as a single percent-encoded path segment, so names
/// containing `/` or spaces cannot escape the download route.
///
/// # Errors
///
/// Returns the transport or status error from the request.
pub async fn download(api: &ApiClient, file_name: &str) -> Result<Vec<u8>, ApiError> {
    api.get_bytes(&["materiais", "download", file_name])
        .await
        .inspect_err(|e| tracing::error!(error = %e, file_name, "material download failed"))
}

#[cfg(test)]
#[path = "materials_test.rs"]
mod tests;
