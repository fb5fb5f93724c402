//! Benchmarks for word wrapping and line rendering

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quill_test_utils::MonoFonts;
use quill_text::{Color, FontCache, FontKey, StyledText, TextLayout, TextStyle, wrap_ranges};

fn layout(fonts: FontCache) -> TextLayout {
    TextLayout::new(
        fonts,
        TextStyle {
            font: FontKey::sans(16),
            ..TextStyle::default()
        },
    )
}

fn bench_wrap_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap_ranges");

    let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
    group.throughput(Throughput::Bytes(text.len() as u64));
    for width in [80, 240, 640] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| {
                black_box(wrap_ranges(&text, width, |range| {
                    text[range].chars().count() as i32 * 8
                }))
            });
        });
    }

    group.finish();
}

fn bench_wrap_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap_cached");

    let plain = "A long line of dialogue that keeps going, and going... until it wraps. ".repeat(8);
    let markup = "A {b}long{/b} line of {i}dialogue{/i} that keeps going. ".repeat(8);
    let layout = layout(MonoFonts::new().cache());

    group.bench_function("plain", |b| {
        b.iter(|| black_box(layout.wrap(&plain, black_box(320))));
    });
    group.bench_function("markup", |b| {
        let styled = StyledText::parse(&markup);
        b.iter(|| black_box(layout.wrap_styled(&styled, black_box(320))));
    });

    group.finish();
}

fn bench_render_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_line");
    let layout = layout(MonoFonts::new().cache());

    for (name, line) in [
        ("plain", StyledText::plain("The quick brown fox jumps over the lazy dog")),
        ("mixed", StyledText::parse("The {b}quick{/b} brown {i}fox{/i} jumps")),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(layout.render_line(&line, Color::WHITE)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_wrap_ranges, bench_wrap_cached, bench_render_line);
criterion_main!(benches);
