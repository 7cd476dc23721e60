//! Absolute remote paths for SFTP requests and shell commands.
//!
//! Two absolute paths are derived from the same remote path:
//!
//! - the **protocol path**, used for SFTP requests: `root + "/" + encoded(remote)`
//! - the **shell path**, used inside exec-channel commands, which can be
//!   redirected with a path override when the shell sees a different
//!   filesystem root than the SFTP server does
//!
//! Path override forms:
//!
//! ```text
//! "/mnt/data"   ->  /mnt/data/<encoded remote>           (replaces root)
//! "@/volume1"   ->  /volume1/<root>/<encoded remote>     (mount prefix)
//! ```

use super::encoder::Encoding;
use super::shell::ShellType;
use tracing::trace;

/// Marks a path override as a mount prefix rather than a replacement root.
pub const OVERRIDE_PREFIX_MARKER: char = '@';

/// Joins `rel` onto `base` with a single `/`.
///
/// An empty `rel` returns `base` unchanged. Segments are never cleaned or
/// reordered.
pub fn join(base: &str, rel: &str) -> String {
    let rel = rel.trim_start_matches('/');
    if rel.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return rel.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), rel)
}

/// Resolves remote paths against a configured root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Absolute root on the SFTP server
    root: String,
    /// Filename encoding for the remote filesystem
    encoding: Encoding,
    /// Optional override for shell paths
    path_override: Option<String>,
    /// Remote shell, if any
    shell_type: Option<ShellType>,
}

impl PathResolver {
    /// Creates a resolver with no override and no shell.
    pub fn new(root: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            root: root.into(),
            encoding,
            path_override: None,
            shell_type: None,
        }
    }

    /// Sets the shell path override. An empty string clears it.
    pub fn with_path_override(mut self, path_override: impl Into<String>) -> Self {
        let path_override = path_override.into();
        self.path_override = if path_override.is_empty() {
            None
        } else {
            Some(path_override)
        };
        self
    }

    /// Sets the remote shell the shell paths are rendered for.
    pub fn with_shell_type(mut self, shell_type: Option<ShellType>) -> Self {
        self.shell_type = shell_type;
        self
    }

    /// Configured root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Configured encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Configured path override, if any.
    pub fn path_override(&self) -> Option<&str> {
        self.path_override.as_deref()
    }

    /// Absolute path for SFTP requests.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sftpkit_proto::sftp::encoder::Encoding;
    /// use sftpkit_proto::sftp::path::PathResolver;
    ///
    /// let resolver = PathResolver::new("/home/user", Encoding::WIN);
    /// assert_eq!(resolver.protocol_path("test:file.txt"), "/home/user/test：file.txt");
    /// assert_eq!(resolver.protocol_path(""), "/home/user");
    /// ```
    pub fn protocol_path(&self, remote: &str) -> String {
        join(&self.root, &self.encoding.encode_path(remote))
    }

    /// Absolute path for shell commands.
    ///
    /// Identical to [`protocol_path`](Self::protocol_path) unless a path
    /// override is configured. For Windows shells a leading `/` in front of a
    /// drive letter (`/C:/...`) is dropped.
    pub fn shell_path(&self, remote: &str) -> String {
        let encoded = self.encoding.encode_path(remote);
        let path = match self.path_override.as_deref() {
            None => join(&self.root, &encoded),
            Some(path_override) => match path_override.strip_prefix(OVERRIDE_PREFIX_MARKER) {
                Some(prefix) => join(&join(prefix, &self.root), &encoded),
                None => join(path_override, &encoded),
            },
        };

        let path = match self.shell_type {
            Some(shell) if shell.is_windows() => strip_drive_slash(path),
            _ => path,
        };
        trace!("Shell path for {:?}: {}", remote, path);
        path
    }

    /// Converts a name from a directory listing back to standard form and
    /// joins it onto the standard-form directory it was listed from.
    pub fn listed_remote(&self, dir: &str, listed_name: &str) -> String {
        join(dir, &self.encoding.decode_name(listed_name))
    }
}

/// `/C:/Users` -> `C:/Users`
fn strip_drive_slash(path: String) -> String {
    let bytes = path.as_bytes();
    let is_drive = bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
        && (bytes.len() == 3 || bytes[3] == b'/');
    if is_drive {
        path[1..].to_string()
    } else {
        path
    }
}
