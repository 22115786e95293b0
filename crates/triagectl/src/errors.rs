//! Exit codes for triagectl

use crate::backend::BackendError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the backend answers with something we cannot use
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the backend is unreachable
pub const EXIT_BACKEND_UNAVAILABLE: i32 = 70;

/// Map a command failure to its exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    let backend = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<BackendError>());

    match backend {
        Some(e) if e.is_unreachable() => EXIT_BACKEND_UNAVAILABLE,
        Some(_) => EXIT_INVALID_RESPONSE,
        None => EXIT_GENERAL_ERROR,
    }
}
