//! Diagnostic commands over the exec channel.
//!
//! [`RemoteShell`] builds checksum and disk-usage command lines for the
//! configured shell, hands them to a [`CommandRunner`] and parses the output.
//!
//! ```text
//! remote path --PathResolver--> shell path --quote--> command line
//!                                                        |
//!                                                  CommandRunner
//!                                                        |
//! digest / Usage <------------- parse_hash / parse_usage <-+
//! ```

use super::config::{HashType, ShellConfig, DISABLED_COMMAND};
use super::parse::{parse_hash, parse_powershell_usage, parse_usage, Usage};
use super::path::PathResolver;
use super::shell::{quote_or_escape_shell_path, ShellType};
use sftpkit_platform::{CommandRunner, SftpkitError, SftpkitResult};
use tracing::{debug, warn};

/// Remote shell bound to one host configuration.
pub struct RemoteShell<R> {
    /// Host configuration
    config: ShellConfig,
    /// Resolver derived from `config`
    resolver: PathResolver,
    /// Exec channel
    runner: R,
}

impl<R: CommandRunner> RemoteShell<R> {
    /// Creates a remote shell.
    ///
    /// # Errors
    ///
    /// Returns [`SftpkitError::Config`] if the configuration is invalid.
    pub fn new(config: ShellConfig, runner: R) -> SftpkitResult<Self> {
        config.validate()?;
        let resolver = config.resolver();
        Ok(Self {
            config,
            resolver,
            runner,
        })
    }

    /// Host configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Path resolver for this host.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Exec channel.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Hash types this host can compute.
    pub fn hashes(&self) -> Vec<HashType> {
        HashType::ALL
            .into_iter()
            .filter(|hash| self.hash_command(*hash, "").is_ok())
            .collect()
    }

    /// Builds the checksum command for `remote`.
    ///
    /// # Errors
    ///
    /// - [`SftpkitError::NotSupported`] if shell access is disabled, the hash
    ///   type is disabled, or the shell has no checksum tool (`cmd`)
    /// - [`SftpkitError::UnsupportedPath`] if the path cannot be quoted
    pub fn hash_command(&self, hash: HashType, remote: &str) -> SftpkitResult<String> {
        let shell = self.shell()?;
        let configured = self.config.hash_commands.get(&hash).map(String::as_str);
        if configured == Some(DISABLED_COMMAND) {
            return Err(SftpkitError::NotSupported(format!("{} hashes are disabled", hash)));
        }

        let quoted = self.quoted_path(shell, remote)?;
        match (configured, shell) {
            (Some(command), _) => Ok(format!("{} {}", command, quoted)),
            (None, ShellType::Unix) => Ok(format!("{} {}", hash.unix_command(), quoted)),
            (None, ShellType::PowerShell) => Ok(format!(
                "&{{param($Path);Get-FileHash -Algorithm {} -LiteralPath $Path -ErrorAction Stop|Select-Object -First 1 -ExpandProperty Hash|ForEach-Object {{\"$($_.ToLower())  ${{Path}}\"}}}} {}",
                hash.powershell_algorithm(),
                quoted
            )),
            (None, ShellType::Cmd) => Err(SftpkitError::NotSupported(format!(
                "{} hashes need a configured command on cmd",
                hash
            ))),
        }
    }

    /// Computes a checksum of `remote` on the remote host.
    ///
    /// Returns an empty string if the command output could not be parsed.
    pub async fn hash(&self, hash: HashType, remote: &str) -> SftpkitResult<String> {
        let command = self.hash_command(hash, remote)?;
        let output = self.run(&command).await?;
        let digest = parse_hash(&output);
        if digest.is_empty() {
            warn!("No {} digest in output for {:?}", hash, remote);
        }
        Ok(digest)
    }

    /// Builds the disk-usage command for the configured root.
    ///
    /// # Errors
    ///
    /// Same conditions as [`hash_command`](Self::hash_command).
    pub fn about_command(&self) -> SftpkitResult<String> {
        let shell = self.shell()?;
        match shell {
            ShellType::Unix => Ok(format!("df -k {}", self.quoted_path(shell, "")?)),
            ShellType::PowerShell => Ok(format!(
                "Get-PSDrive -PSProvider FileSystem -Name (Get-Item -LiteralPath {}).PSDrive.Name|Select-Object @{{n='Total';e={{$_.Used+$_.Free}}}},@{{n='Used';e={{$_.Used}}}},@{{n='Available';e={{$_.Free}}}}|ConvertTo-Csv -NoTypeInformation",
                self.quoted_path(shell, "")?
            )),
            // No usage tool, so the root is never quoted
            ShellType::Cmd => Err(SftpkitError::NotSupported(
                "disk usage is not available on cmd".to_string(),
            )),
        }
    }

    /// Reports total, used and available space of the filesystem holding the
    /// root. Unparsable output yields a zero [`Usage`].
    pub async fn about(&self) -> SftpkitResult<Usage> {
        let command = self.about_command()?;
        let output = self.run(&command).await?;
        let usage = match self.config.shell_type {
            Some(ShellType::PowerShell) => parse_powershell_usage(&output),
            _ => parse_usage(&output),
        };
        if usage == Usage::default() {
            warn!("No usage figures in output of {:?}", command);
        }
        Ok(usage)
    }

    fn shell(&self) -> SftpkitResult<ShellType> {
        self.config
            .shell_type
            .ok_or_else(|| SftpkitError::NotSupported("remote shell access is disabled".to_string()))
    }

    fn quoted_path(&self, shell: ShellType, remote: &str) -> SftpkitResult<String> {
        quote_or_escape_shell_path(shell, &self.resolver.shell_path(remote))
    }

    async fn run(&self, command: &str) -> SftpkitResult<Vec<u8>> {
        debug!("Running remote command: {}", command);
        let output = self.runner.run(command).await?;
        debug!("Remote command returned {} bytes", output.len());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sftp::encoder::Encoding;
    use std::sync::Mutex;

    /// Records commands and replies with canned output.
    struct FakeRunner {
        output: Vec<u8>,
        commands: Mutex<Vec<String>>,
    }

    impl FakeRunner {
        fn new(output: &str) -> Self {
            Self {
                output: output.as_bytes().to_vec(),
                commands: Mutex::new(Vec::new()),
            }
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, command: &str) -> SftpkitResult<Vec<u8>> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(self.output.clone())
        }
    }

    fn unix_config() -> ShellConfig {
        ShellConfig::new("/home/user")
            .with_shell_type(Some(ShellType::Unix))
            .with_encoding(Encoding::WIN)
    }

    #[test]
    fn test_unix_hash_command() {
        let shell = RemoteShell::new(unix_config(), FakeRunner::new("")).unwrap();
        assert_eq!(
            shell.hash_command(HashType::Md5, "my file:1").unwrap(),
            "md5sum /home/user/my\\ file\u{FF1A}1"
        );
        assert_eq!(
            shell.hash_command(HashType::Sha256, "").unwrap(),
            "sha256sum /home/user"
        );
    }

    #[test]
    fn test_configured_hash_command() {
        let config = unix_config().with_hash_command(HashType::Md5, "md5 -r");
        let shell = RemoteShell::new(config, FakeRunner::new("")).unwrap();
        assert_eq!(shell.hash_command(HashType::Md5, "a").unwrap(), "md5 -r /home/user/a");
    }

    #[test]
    fn test_disabled_hash() {
        let config = unix_config().with_hash_command(HashType::Sha1, DISABLED_COMMAND);
        let shell = RemoteShell::new(config, FakeRunner::new("")).unwrap();
        assert!(matches!(
            shell.hash_command(HashType::Sha1, "a"),
            Err(SftpkitError::NotSupported(_))
        ));
        assert_eq!(shell.hashes(), vec![HashType::Md5, HashType::Sha256]);
    }

    #[test]
    fn test_powershell_commands() {
        let config = ShellConfig::new("/C:/Users/me").with_shell_type(Some(ShellType::PowerShell));
        let shell = RemoteShell::new(config, FakeRunner::new("")).unwrap();

        let command = shell.hash_command(HashType::Sha1, "it's.txt").unwrap();
        assert!(command.starts_with("&{param($Path);Get-FileHash -Algorithm SHA1 -LiteralPath $Path"));
        assert!(command.ends_with("} 'C:/Users/me/it''s.txt'"));

        let command = shell.about_command().unwrap();
        assert!(command.starts_with("Get-PSDrive -PSProvider FileSystem -Name (Get-Item -LiteralPath 'C:/Users/me').PSDrive.Name"));
        assert!(command.ends_with("ConvertTo-Csv -NoTypeInformation"));
    }

    #[test]
    fn test_cmd_has_no_tools() {
        let config = ShellConfig::new("/C:/data").with_shell_type(Some(ShellType::Cmd));
        let shell = RemoteShell::new(config, FakeRunner::new("")).unwrap();
        assert!(shell.hashes().is_empty());
        assert!(matches!(shell.about_command(), Err(SftpkitError::NotSupported(_))));

        let config = ShellConfig::new("/C:/data")
            .with_shell_type(Some(ShellType::Cmd))
            .with_hash_command(HashType::Md5, "certutil-md5");
        let shell = RemoteShell::new(config, FakeRunner::new("")).unwrap();
        assert_eq!(
            shell.hash_command(HashType::Md5, "a b").unwrap(),
            "certutil-md5 \"C:/data/a b\""
        );
        assert!(matches!(
            shell.hash_command(HashType::Md5, "a\"b"),
            Err(SftpkitError::UnsupportedPath(_))
        ));
    }

    #[test]
    fn test_cmd_about_is_not_supported_even_for_unquotable_root() {
        let config = ShellConfig::new("/C:/odd\"root").with_shell_type(Some(ShellType::Cmd));
        let shell = RemoteShell::new(config, FakeRunner::new("")).unwrap();
        assert!(matches!(shell.about_command(), Err(SftpkitError::NotSupported(_))));
    }

    #[test]
    fn test_shell_disabled() {
        let shell = RemoteShell::new(ShellConfig::new("/"), FakeRunner::new("")).unwrap();
        assert!(shell.hashes().is_empty());
        assert!(matches!(
            shell.hash_command(HashType::Md5, "a"),
            Err(SftpkitError::NotSupported(_))
        ));
        assert!(matches!(shell.about_command(), Err(SftpkitError::NotSupported(_))));
    }

    #[test]
    fn test_new_validates() {
        let config = ShellConfig::new("/").with_hash_command(HashType::Md5, "md5sum");
        assert!(RemoteShell::new(config, FakeRunner::new("")).is_err());
    }

    #[tokio::test]
    async fn test_hash_runs_and_parses() {
        let runner = FakeRunner::new("8dbc7733dbd10d2efc5c0a0d8dad90f958581821  /home/user/RELEASE.md\n");
        let shell = RemoteShell::new(unix_config(), runner).unwrap();
        let digest = shell.hash(HashType::Sha1, "RELEASE.md").await.unwrap();
        assert_eq!(digest, "8dbc7733dbd10d2efc5c0a0d8dad90f958581821");
        assert_eq!(shell.runner().commands(), vec!["sha1sum /home/user/RELEASE.md"]);
    }

    #[tokio::test]
    async fn test_about_runs_and_parses() {
        let runner = FakeRunner::new(
            "Filesystem     1K-blocks  Used Available Use% Mounted on\ntmpfs             818256  1636    816620   1% /run\n",
        );
        let shell = RemoteShell::new(unix_config(), runner).unwrap();
        let usage = shell.about().await.unwrap();
        assert_eq!(usage.total, 837894144);
        assert_eq!(usage.used, 1675264);
        assert_eq!(usage.avail, 836218880);
        assert_eq!(shell.runner().commands(), vec!["df -k /home/user"]);
    }
}
