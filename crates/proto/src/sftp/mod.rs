//! Remote path handling for SFTP backends with shell access.
//!
//! An SFTP backend frequently needs to run commands on the remote host
//! (checksums, disk usage) next to plain SFTP requests. This module provides
//! the pieces between a caller's remote path and those command lines:
//!
//! 1. **Encoder** ([`encoder`]) - reversible substitution of characters the
//!    remote filesystem cannot store
//! 2. **Path Resolver** ([`path`]) - absolute protocol and shell paths from a
//!    root, an optional override and an encoded remote path
//! 3. **Shell Quoter** ([`shell`]) - per-dialect quoting for `unix`, `cmd`
//!    and `powershell`
//! 4. **Output Parsers** ([`parse`]) - checksum and disk-usage output
//! 5. **Remote Shell** ([`remote`]) - runs the commands through a
//!    [`CommandRunner`](sftpkit_platform::CommandRunner)
//!
//! Everything except [`remote`] is pure and synchronous.
//!
//! # Example
//!
//! ```rust
//! use sftpkit_proto::sftp::{quote_or_escape_shell_path, ShellConfig};
//!
//! let config = ShellConfig::from_settings("/home/user", "unix", "Win", "").unwrap();
//! let path = config.resolver().shell_path("my notes:2024.txt");
//! let quoted = quote_or_escape_shell_path(config.shell_type.unwrap(), &path).unwrap();
//! assert_eq!(quoted, r"/home/user/my\ notes：2024.txt");
//! ```

pub mod config;
pub mod encoder;
pub mod parse;
pub mod path;
pub mod remote;
pub mod shell;

pub use config::{HashType, ShellConfig};
pub use encoder::{Encoding, QUOTE_RUNE};
pub use parse::{parse_hash, parse_powershell_usage, parse_usage, Usage};
pub use path::{join, PathResolver, OVERRIDE_PREFIX_MARKER};
pub use remote::RemoteShell;
pub use shell::{quote_or_escape_shell_path, ShellType};
