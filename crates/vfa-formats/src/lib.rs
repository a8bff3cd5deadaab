//! File formats around the `vfa-core` font model.
//!
//! Every loader mutates a [`vfa_core::Font`] in place (so formats can be
//! stacked from the command line), every saver takes it by reference. The
//! special path `-` means stdin or stdout throughout, mirroring the
//! command-line convention.

pub mod bdf;
pub mod clt;
pub mod cpi;
pub mod fnt;
pub mod hex;
mod io;
pub mod pbm;
pub mod pcf;
pub mod psf;
pub mod sfd;
pub mod unimap;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormatError>;

/// What can go wrong while reading or writing font files.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: not recognized as {format}: {reason}")]
    Invalid {
        path: String,
        format: &'static str,
        reason: String,
    },
}

impl FormatError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn invalid(path: &str, format: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_string(),
            format,
            reason: reason.into(),
        }
    }
}
