//! Quoting paths for remote shell command lines.
//!
//! Three remote shells are supported and each needs a different approach:
//!
//! | shell        | strategy                                              | fails |
//! |--------------|-------------------------------------------------------|-------|
//! | `unix`       | backslash-escape every metacharacter, `'\n'` for LF   | never |
//! | `cmd`        | wrap in `"..."`                                       | on `"` |
//! | `powershell` | wrap in `'...'`, double embedded `'`                  | never |
//!
//! `cmd.exe` has no reliable way to escape a double quote inside a quoted
//! argument, so such paths are rejected instead of producing a command line
//! that could be split or reinterpreted.

use sftpkit_platform::{SftpkitError, SftpkitResult};
use std::fmt;
use std::str::FromStr;

/// Remote shell dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShellType {
    /// POSIX-style shell (sh, bash, zsh, ...)
    Unix,
    /// Windows `cmd.exe`
    Cmd,
    /// Windows PowerShell or PowerShell Core
    PowerShell,
}

impl ShellType {
    /// Configuration tag for this dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShellType::Unix => "unix",
            ShellType::Cmd => "cmd",
            ShellType::PowerShell => "powershell",
        }
    }

    /// Whether the remote host is most likely running Windows.
    pub fn is_windows(&self) -> bool {
        matches!(self, ShellType::Cmd | ShellType::PowerShell)
    }

    /// Parses a shell type setting where `none` (or empty) disables shell
    /// access altogether.
    ///
    /// # Errors
    ///
    /// Returns [`SftpkitError::Config`] for an unknown tag.
    pub fn parse_setting(value: &str) -> SftpkitResult<Option<Self>> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl FromStr for ShellType {
    type Err = SftpkitError;

    fn from_str(s: &str) -> SftpkitResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unix" => Ok(ShellType::Unix),
            "cmd" => Ok(ShellType::Cmd),
            "powershell" => Ok(ShellType::PowerShell),
            other => Err(SftpkitError::Config(format!(
                "unknown shell type {:?} (expected unix, cmd or powershell)",
                other
            ))),
        }
    }
}

impl fmt::Display for ShellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders `path` so it can be pasted into a one-line command for `shell`.
///
/// # Errors
///
/// Returns [`SftpkitError::UnsupportedPath`] if `shell` is [`ShellType::Cmd`]
/// and the path contains a double quote.
///
/// # Example
///
/// ```rust
/// use sftpkit_proto::sftp::shell::{quote_or_escape_shell_path, ShellType};
///
/// let quoted = quote_or_escape_shell_path(ShellType::Unix, "$(rm -rf /)").unwrap();
/// assert_eq!(quoted, r"\$\(rm\ -rf\ /\)");
///
/// let quoted = quote_or_escape_shell_path(ShellType::PowerShell, "c:/it's").unwrap();
/// assert_eq!(quoted, "'c:/it''s'");
///
/// assert!(quote_or_escape_shell_path(ShellType::Cmd, "c:/a\"b").is_err());
/// ```
pub fn quote_or_escape_shell_path(shell: ShellType, path: &str) -> SftpkitResult<String> {
    match shell {
        ShellType::Unix => Ok(escape_unix(path)),
        ShellType::Cmd => quote_cmd(path),
        ShellType::PowerShell => Ok(quote_powershell(path)),
    }
}

fn is_unix_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ',' | ':' | '/' | '@' | '-') || !c.is_ascii()
}

fn escape_unix(path: &str) -> String {
    let mut out = String::with_capacity(path.len() * 2);
    for c in path.chars() {
        if c == '\n' {
            // A backslash-newline is a line continuation, not a literal
            out.push_str("'\n'");
        } else if is_unix_safe(c) {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

fn quote_cmd(path: &str) -> SftpkitResult<String> {
    if path.contains('"') {
        return Err(SftpkitError::UnsupportedPath(path.to_string()));
    }
    Ok(format!("\"{}\"", path))
}

fn quote_powershell(path: &str) -> String {
    format!("'{}'", path.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_unix() {
        let cases = [
            ("", ""),
            ("/this/is/harmless", "/this/is/harmless"),
            ("$(rm -rf /)", "\\$\\(rm\\ -rf\\ /\\)"),
            ("/test/\n", "/test/'\n'"),
            (":\"'", ":\\\"\\'"),
            ("a;b|c&d", "a\\;b\\|c\\&d"),
            ("back\\slash", "back\\\\slash"),
            ("/home/user/test\u{FF1A}file.txt", "/home/user/test\u{FF1A}file.txt"),
        ];
        for (i, (unescaped, escaped)) in cases.iter().enumerate() {
            let got = quote_or_escape_shell_path(ShellType::Unix, unescaped).unwrap();
            assert_eq!(&got, escaped, "case {} unescaped = {:?}", i, unescaped);
        }
    }

    #[test]
    fn test_quote_cmd() {
        let ok = [
            ("", "\"\""),
            ("c:/this/is/harmless", "\"c:/this/is/harmless\""),
            ("c:/test&notepad", "\"c:/test&notepad\""),
        ];
        for (unescaped, escaped) in ok {
            assert_eq!(quote_or_escape_shell_path(ShellType::Cmd, unescaped).unwrap(), escaped);
        }

        let err = quote_or_escape_shell_path(ShellType::Cmd, "c:/test\"&\"notepad").unwrap_err();
        assert!(matches!(err, SftpkitError::UnsupportedPath(ref p) if p == "c:/test\"&\"notepad"));
    }

    #[test]
    fn test_quote_powershell() {
        let cases = [
            ("", "''"),
            ("c:/this/is/harmless", "'c:/this/is/harmless'"),
            ("c:/test&notepad", "'c:/test&notepad'"),
            ("c:/test\"&\"notepad", "'c:/test\"&\"notepad'"),
            ("c:/test'&'notepad", "'c:/test''&''notepad'"),
        ];
        for (unescaped, escaped) in cases {
            assert_eq!(
                quote_or_escape_shell_path(ShellType::PowerShell, unescaped).unwrap(),
                escaped
            );
        }
    }

    #[test]
    fn test_shell_type_parsing() {
        assert_eq!("unix".parse::<ShellType>().unwrap(), ShellType::Unix);
        assert_eq!("PowerShell".parse::<ShellType>().unwrap(), ShellType::PowerShell);
        assert_eq!(" cmd ".parse::<ShellType>().unwrap(), ShellType::Cmd);
        assert!(matches!("bash".parse::<ShellType>(), Err(SftpkitError::Config(_))));

        assert_eq!(ShellType::parse_setting("none").unwrap(), None);
        assert_eq!(ShellType::parse_setting("").unwrap(), None);
        assert_eq!(ShellType::parse_setting("unix").unwrap(), Some(ShellType::Unix));
        assert!(ShellType::parse_setting("fish").is_err());
    }

    #[test]
    fn test_shell_type_display_round_trips() {
        for shell in [ShellType::Unix, ShellType::Cmd, ShellType::PowerShell] {
            assert_eq!(shell.to_string().parse::<ShellType>().unwrap(), shell);
        }
        assert!(ShellType::Cmd.is_windows());
        assert!(!ShellType::Unix.is_windows());
    }
}
