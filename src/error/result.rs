//! Result type alias for leivo operations.

use super::leivo_error::LeivoError;

/// Type alias for Results using LeivoError.
///
/// # Example
///
/// ```ignore
/// use leivo::error::LeivoResult;
///
/// async fn healthy(client: &LeivoClient) -> LeivoResult<bool> {
///     client.health_check().await
/// }
/// ```
pub type LeivoResult<T> = Result<T, LeivoError>;
