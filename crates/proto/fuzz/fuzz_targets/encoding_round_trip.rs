//! Fuzz target for filename encoding and shell quoting.
//!
//! This fuzzer checks, for arbitrary names:
//! - Panics
//! - `decode(encode(x)) != x` for every preset
//! - Quoting failures outside the cmd dialect
//!
//! Run with:
//! ```bash
//! cd crates/proto
//! cargo +nightly fuzz run encoding_round_trip -- -max_total_time=300
//! ```

#![no_main]
use libfuzzer_sys::fuzz_target;
use sftpkit_proto::sftp::{quote_or_escape_shell_path, Encoding, ShellType};

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    // First byte picks the rule set, so every combination gets coverage
    let bits = data.first().copied().unwrap_or(0) as u32;
    let mixed = ["Win", "Slash", "Ctl", "Dot", "LeftSpace", "RightPeriod", "Del", "LeftTilde"]
        .iter()
        .enumerate()
        .filter(|(i, _)| bits & (1 << i) != 0)
        .map(|(_, n)| *n)
        .collect::<Vec<_>>()
        .join(",");
    let mixed: Encoding = mixed.parse().expect("known names");

    for enc in [Encoding::NONE, Encoding::WIN, mixed] {
        let encoded = enc.encode_name(name);
        assert_eq!(enc.decode_name(&encoded), name);

        let encoded = enc.encode_path(name);
        assert_eq!(enc.decode_path(&encoded), name);
    }

    assert!(quote_or_escape_shell_path(ShellType::Unix, name).is_ok());
    assert!(quote_or_escape_shell_path(ShellType::PowerShell, name).is_ok());
    assert_eq!(
        quote_or_escape_shell_path(ShellType::Cmd, name).is_ok(),
        !name.contains('"')
    );
});
