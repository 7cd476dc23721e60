//! Remote shell path handling for SFTP backends.
//!
//! This crate covers the string-level work an SFTP client does around the
//! wire protocol when it also has shell access to the server:
//!
//! - **Filename encoding** for filesystems that reject characters such as
//!   `:` or `?`
//! - **Path resolution** for SFTP requests and for shell commands
//! - **Shell quoting** for `unix`, `cmd` and `powershell` remote shells
//! - **Output parsing** for checksum and disk-usage commands
//!
//! # Features
//!
//! - `sftp` (default) - the [`sftp`] module
//! - `serde` - `Serialize`/`Deserialize` for configuration types
//!
//! # Example
//!
//! ```rust
//! use sftpkit_proto::sftp::{Encoding, PathResolver};
//!
//! let resolver = PathResolver::new("/home/user", Encoding::WIN);
//! assert_eq!(resolver.protocol_path("test:file.txt"), "/home/user/test：file.txt");
//! assert_eq!(Encoding::WIN.decode_name("test：file.txt"), "test:file.txt");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

#[cfg(feature = "sftp")]
pub mod sftp;
