//! Path encoding and quoting benchmarks
//!
//! Run with: `cargo bench --bench sftp_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sftpkit_proto::sftp::{
    parse_usage, quote_or_escape_shell_path, Encoding, PathResolver, ShellType,
};

/// Deep path with a reserved character in every segment
fn create_test_path() -> String {
    (0..16)
        .map(|i| format!("dir:{}?<x>", i))
        .collect::<Vec<_>>()
        .join("/")
}

fn bench_encoding(c: &mut Criterion) {
    let path = create_test_path();
    let encoded = Encoding::WIN.encode_path(&path);

    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Bytes(path.len() as u64));
    group.bench_function("encode_path_win", |b| {
        b.iter(|| Encoding::WIN.encode_path(black_box(&path)))
    });
    group.bench_function("decode_path_win", |b| {
        b.iter(|| Encoding::WIN.decode_path(black_box(&encoded)))
    });
    group.bench_function("encode_path_none", |b| {
        b.iter(|| Encoding::NONE.encode_path(black_box(&path)))
    });
    group.finish();
}

fn bench_shell_path(c: &mut Criterion) {
    let path = create_test_path();
    let resolver = PathResolver::new("/home/user", Encoding::WIN).with_path_override("@/volume1");

    let mut group = c.benchmark_group("shell_path");
    group.bench_function("resolve", |b| b.iter(|| resolver.shell_path(black_box(&path))));
    for shell in [ShellType::Unix, ShellType::Cmd, ShellType::PowerShell] {
        let shell_path = resolver.shell_path(&path);
        group.bench_function(format!("quote_{}", shell), |b| {
            b.iter(|| quote_or_escape_shell_path(shell, black_box(&shell_path)))
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let output = b"Filesystem   1024-blocks     Used Available Capacity iused      ifree %iused  Mounted on\n/dev/disk0s2   244277768 94454848 149566920    39%  997820 4293969459    0%   /";
    c.bench_function("parse_usage", |b| b.iter(|| parse_usage(black_box(output))));
}

criterion_group!(benches, bench_encoding, bench_shell_path, bench_parse);
criterion_main!(benches);
