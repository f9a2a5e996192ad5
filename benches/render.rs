//! Renderer benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mochi_edit::core::{Buffer, DEFAULT_TAB_STOP};
use mochi_edit::input::KeyDecoder;
use mochi_edit::renderer::{Frame, Renderer};
use mochi_edit::view::Viewport;

fn sample_buffer(lines: usize) -> Buffer {
    Buffer::from_lines(
        (0..lines).map(|i| format!("fn line_{}() {{\treturn {} + 42; }}", i, i * 7)),
        DEFAULT_TAB_STOP,
    )
}

fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let buffer = sample_buffer(1000);
    let mut view = Viewport::new(48, 160);
    view.cy = 500;
    view.scroll(&buffer);

    group.bench_function("full_frame", |b| {
        let mut renderer = Renderer::new();
        b.iter(|| {
            let frame = Frame {
                buffer: &buffer,
                view: &view,
                filename: Some("bench.rs"),
                message: Some("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find"),
            };
            black_box(renderer.render(&frame).len())
        })
    });

    group.finish();
}

fn bench_decode_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("input");

    // Plain text mixed with arrow and paging sequences
    let input = "hello world\x1b[A\x1b[B\x1b[5~\x1b[6~\x1b[H\x1b[F\x1b[3~é".repeat(100);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("decode", |b| {
        b.iter(|| {
            let mut decoder = KeyDecoder::new();
            black_box(decoder.feed(input.as_bytes()))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_render_frame, bench_decode_keys);
criterion_main!(benches);
