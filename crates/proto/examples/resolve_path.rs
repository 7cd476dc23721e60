//! Shell Path Resolution Example
//!
//! Shows how a remote path travels through encoding, resolution and quoting
//! for each remote shell, without connecting anywhere.
//!
//! Usage:
//!   cargo run --example resolve_path <root> <encoding> <path_override> <remote>
//!
//! Example:
//!   RUST_LOG=trace cargo run --example resolve_path /home/user Win @/volume1 "notes: draft?.txt"

use sftpkit_proto::sftp::{quote_or_escape_shell_path, Encoding, PathResolver, ShellType};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!(
            "Usage: {} <root> <encoding> <path_override> <remote>",
            args[0]
        );
        eprintln!(
            "Example: {} /home/user Win @/volume1 \"notes: draft?.txt\"",
            args[0]
        );
        std::process::exit(1);
    }

    let encoding: Encoding = args[2].parse()?;
    let remote = &args[4];

    println!("=== Path Resolution ===");
    println!("Root: {}", args[1]);
    println!("Encoding: {}", encoding);
    println!("Remote: {:?}", remote);
    println!();

    for shell in [ShellType::Unix, ShellType::Cmd, ShellType::PowerShell] {
        let resolver = PathResolver::new(args[1].as_str(), encoding)
            .with_path_override(args[3].as_str())
            .with_shell_type(Some(shell));

        println!("[{}]", shell);
        println!("  SFTP path:  {}", resolver.protocol_path(remote));
        match quote_or_escape_shell_path(shell, &resolver.shell_path(remote)) {
            Ok(quoted) => println!("  Shell arg:  {}", quoted),
            Err(e) => println!("  Shell arg:  ✗ {}", e),
        }
    }

    Ok(())
}
