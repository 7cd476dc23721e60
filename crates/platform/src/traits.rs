//! Core traits shared between sftpkit crates

use crate::SftpkitResult;

/// Exec channel to a remote host.
///
/// Implementations run one command line in the remote user's shell and hand
/// back whatever the command wrote to stdout. Transport, authentication,
/// retries and timeouts are the implementation's business; callers only ever
/// see the raw output bytes.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command and return its stdout.
    ///
    /// # Arguments
    ///
    /// * `command` - Complete command line, already quoted for the remote shell
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be run or exited unsuccessfully
    async fn run(&self, command: &str) -> SftpkitResult<Vec<u8>>;
}

#[async_trait::async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    async fn run(&self, command: &str) -> SftpkitResult<Vec<u8>> {
        (**self).run(command).await
    }
}
