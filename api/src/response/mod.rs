//! Response envelope, page views and flash messages.

pub mod flash;
pub mod page;

pub use flash::FlashMessage;
pub use page::{Page, PageView};

use serde::Serialize;

/// Standardized wrapper for every JSON body the server sends.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "OK"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error envelope carrying a payload, e.g. a form page with its errors.
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }
}
