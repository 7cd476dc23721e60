//! Parsers for the text output of remote diagnostic commands.
//!
//! Remote output is not under our control and varies between operating
//! systems, so these parsers never fail: malformed input yields an empty
//! digest or a zero [`Usage`]. Callers that must tell "zero" apart from
//! "unparsable" need their own plausibility checks.

use tracing::debug;

/// Size of one block in `df -k` output.
pub const USAGE_BLOCK_SIZE: i64 = 1024;

/// Filesystem usage in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Usage {
    /// Total size
    pub total: i64,
    /// Used space
    pub used: i64,
    /// Space available to the user
    pub avail: i64,
}

/// Extracts the digest from `md5sum`-style output (`<hex>  <name>\n`).
///
/// A leading `\` (written by the GNU tools when the file name needed escaping)
/// is skipped. The digest length is not checked so any algorithm works.
///
/// # Example
///
/// ```rust
/// use sftpkit_proto::sftp::parse::parse_hash;
///
/// let digest = parse_hash(b"03cfd743661f07975fa2f1220c5194cbaff48451  -\n");
/// assert_eq!(digest, "03cfd743661f07975fa2f1220c5194cbaff48451");
/// assert_eq!(parse_hash(b"md5sum: x: No such file or directory\n"), "");
/// ```
pub fn parse_hash(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    let token = text
        .trim_start()
        .trim_start_matches('\\')
        .split_whitespace()
        .next()
        .unwrap_or("");

    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        debug!("Unparsable checksum output: {:?}", text);
        return String::new();
    }
    token.to_string()
}

/// Parses `df -k` output into byte counts.
///
/// The header line is skipped and columns 2-4 of the data are read by
/// position (total, used, available in 1024-byte blocks), so `1K-blocks` and
/// `1024-blocks` headers and any trailing inode columns are all accepted.
/// A data line that `df` wrapped after a long filesystem name (the name alone
/// on the second line) is rejoined with the line that follows.
pub fn parse_usage(output: &[u8]) -> Usage {
    let text = String::from_utf8_lossy(output);
    let mut lines = text.lines();
    if lines.next().is_none() {
        debug!("Empty usage output");
        return Usage::default();
    }

    let mut fields: Vec<&str> = lines.next().unwrap_or("").split_whitespace().collect();
    if fields.len() == 1 {
        if let Some(continuation) = lines.next() {
            fields.extend(continuation.split_whitespace());
        }
    }
    if fields.len() < 4 {
        debug!("Unparsable usage output: {:?}", text);
        return Usage::default();
    }

    Usage {
        total: blocks_to_bytes(fields[1]),
        used: blocks_to_bytes(fields[2]),
        avail: blocks_to_bytes(fields[3]),
    }
}

/// Parses the CSV that PowerShell's `ConvertTo-Csv` produces for a
/// `Total,Used,Available` object. Values are already in bytes.
pub fn parse_powershell_usage(output: &[u8]) -> Usage {
    let text = String::from_utf8_lossy(output);
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let (Some(_header), Some(row)) = (lines.next(), lines.next()) else {
        debug!("Unparsable PowerShell usage output: {:?}", text);
        return Usage::default();
    };

    let values: Vec<i64> = row
        .split(',')
        .map(|field| field.trim().trim_matches('"').parse().unwrap_or(0))
        .collect();
    if values.len() < 3 {
        debug!("Unparsable PowerShell usage row: {:?}", row);
        return Usage::default();
    }

    Usage {
        total: values[0],
        used: values[1],
        avail: values[2],
    }
}

fn blocks_to_bytes(field: &str) -> i64 {
    field
        .parse::<i64>()
        .ok()
        .and_then(|blocks| blocks.checked_mul(USAGE_BLOCK_SIZE))
        .unwrap_or(0)
}
