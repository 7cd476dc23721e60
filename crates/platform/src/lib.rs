//! # sftpkit platform
//!
//! Shared types for the sftpkit crates.
//!
//! This crate provides:
//! - Unified error types (`SftpkitError`, `SftpkitResult`)
//! - The `CommandRunner` trait, the seam to a remote exec channel
//!
//! # Examples
//!
//! ```
//! use sftpkit_platform::{SftpkitError, SftpkitResult};
//!
//! fn reject(path: &str) -> SftpkitResult<String> {
//!     Err(SftpkitError::UnsupportedPath(path.to_string()))
//! }
//!
//! assert!(reject("c:/a\"b").is_err());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;

pub use error::{SftpkitError, SftpkitResult};
pub use traits::CommandRunner;

/// Platform version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
