//! Remote shell configuration.
//!
//! Provides [`ShellConfig`], the per-host settings consulted by the path
//! resolver and the remote shell facade, and [`HashType`].

use super::encoder::Encoding;
use super::path::PathResolver;
use super::shell::ShellType;
use sftpkit_platform::{SftpkitError, SftpkitResult};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Hash command value that disables a hash type.
pub const DISABLED_COMMAND: &str = "none";

/// Checksums a remote shell can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HashType {
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
}

impl HashType {
    /// All supported hash types.
    pub const ALL: [HashType; 3] = [HashType::Md5, HashType::Sha1, HashType::Sha256];

    /// Name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Md5 => "md5",
            HashType::Sha1 => "sha1",
            HashType::Sha256 => "sha256",
        }
    }

    /// Default checksum tool on a Unix host.
    pub fn unix_command(&self) -> &'static str {
        match self {
            HashType::Md5 => "md5sum",
            HashType::Sha1 => "sha1sum",
            HashType::Sha256 => "sha256sum",
        }
    }

    /// Algorithm name for PowerShell's `Get-FileHash`.
    pub fn powershell_algorithm(&self) -> &'static str {
        match self {
            HashType::Md5 => "MD5",
            HashType::Sha1 => "SHA1",
            HashType::Sha256 => "SHA256",
        }
    }
}

impl FromStr for HashType {
    type Err = SftpkitError;

    fn from_str(s: &str) -> SftpkitResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(HashType::Md5),
            "sha1" => Ok(HashType::Sha1),
            "sha256" => Ok(HashType::Sha256),
            other => Err(SftpkitError::Config(format!("unknown hash type {:?}", other))),
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for one remote host.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShellConfig {
    /// Absolute root on the SFTP server
    pub root: String,
    /// Remote shell dialect, `None` when shell access is disabled
    pub shell_type: Option<ShellType>,
    /// Filename encoding for the remote filesystem
    pub encoding: Encoding,
    /// Shell path override (`"/mnt/data"` or `"@/volume1"`), empty for none
    pub path_override: String,
    /// Checksum command overrides, `"none"` disables a hash type
    pub hash_commands: HashMap<HashType, String>,
}

impl ShellConfig {
    /// Creates a configuration with the given root and defaults elsewhere.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Builds a configuration from raw setting strings.
    ///
    /// # Errors
    ///
    /// Returns [`SftpkitError::Config`] for an unknown shell type or
    /// encoding name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sftpkit_proto::sftp::config::ShellConfig;
    ///
    /// let config = ShellConfig::from_settings("/home/user", "unix", "Win", "@/volume1").unwrap();
    /// assert_eq!(config.resolver().shell_path("a:b"), "/volume1/home/user/a：b");
    ///
    /// assert!(ShellConfig::from_settings("/", "tcsh", "", "").is_err());
    /// ```
    pub fn from_settings(
        root: &str,
        shell_type: &str,
        encoding: &str,
        path_override: &str,
    ) -> SftpkitResult<Self> {
        let config = Self::new(root)
            .with_shell_type(ShellType::parse_setting(shell_type)?)
            .with_encoding(encoding.parse()?)
            .with_path_override(path_override);
        config.validate()?;
        Ok(config)
    }

    /// Sets the remote shell dialect.
    pub fn with_shell_type(mut self, shell_type: Option<ShellType>) -> Self {
        self.shell_type = shell_type;
        self
    }

    /// Sets the filename encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the shell path override.
    pub fn with_path_override(mut self, path_override: impl Into<String>) -> Self {
        self.path_override = path_override.into();
        self
    }

    /// Overrides the command used to compute a checksum.
    pub fn with_hash_command(mut self, hash: HashType, command: impl Into<String>) -> Self {
        self.hash_commands.insert(hash, command.into());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> SftpkitResult<()> {
        if self.root.contains('\0') {
            return Err(SftpkitError::Config("root cannot contain NUL".into()));
        }
        for (hash, command) in &self.hash_commands {
            if command.trim().is_empty() {
                return Err(SftpkitError::Config(format!(
                    "{} command cannot be empty (use \"{}\" to disable)",
                    hash, DISABLED_COMMAND
                )));
            }
            if self.shell_type.is_none() && command != DISABLED_COMMAND {
                return Err(SftpkitError::Config(format!(
                    "{} command requires a shell type",
                    hash
                )));
            }
        }
        Ok(())
    }

    /// Path resolver for this configuration.
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(self.root.clone(), self.encoding)
            .with_path_override(self.path_override.clone())
            .with_shell_type(self.shell_type)
    }
}
