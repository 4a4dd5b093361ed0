//! Handler errors

use gpm_protocol::DebugInfo;
use gpm_report::CalcError;
use thiserror::Error;

/// Anything that stops a calculation.
///
/// `Display` is the short text for the status line; host diagnostics stay in
/// [`HandlerError::debug_info`].
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Host(#[from] gpm_host::Error),
}

impl HandlerError {
    pub fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            HandlerError::Host(e) => e.debug_info(),
            HandlerError::Calc(_) => None,
        }
    }
}
