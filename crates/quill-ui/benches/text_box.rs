//! Benchmarks for the dialogue box.
//!
//! Measures the per-frame cost of:
//! - Updating a box while lines reveal
//! - Drawing a full transcript with a warm layout cache
//! - Re-wrapping after a resize

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quill_core::Rect;
use quill_test_utils::MonoFonts;
use quill_ui::{Canvas, RevealParams, TextBox, Theme};

fn build_box(lines: usize, params: RevealParams) -> TextBox {
    let mut tb = TextBox::new(
        Rect::new(0, 0, 640, 240),
        MonoFonts::new().cache(),
        Theme::builder().font_size(16).build(),
        params,
    );
    tb.append_visible_lines(
        (0..lines).map(|i| format!("Line {i}: the quick brown fox jumps over the lazy dog")),
        false,
    );
    tb
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_box/update");

    for mode in ["slide_fade", "typewriter"] {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            let params = match mode {
                "typewriter" => RevealParams::typewriter(),
                _ => RevealParams::default(),
            };
            let mut tb = build_box(50, params);
            b.iter(|| {
                tb.append_line("Another line of dialogue, revealed over time.", true, false);
                for _ in 0..10 {
                    tb.update(black_box(1.0 / 60.0));
                }
                tb.trim_front(1);
            });
        });
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_box/draw");

    for lines in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            let mut tb = build_box(lines, RevealParams::default());
            let mut frame = Canvas::new(640, 240).unwrap();
            // Warm the layout cache
            tb.draw(&mut frame);

            b.iter(|| {
                tb.scroll(black_box(-3.0));
                tb.draw(&mut frame);
            });
        });
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_box/resize");

    for lines in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            let mut tb = build_box(lines, RevealParams::default());
            let mut wide = false;
            b.iter(|| {
                wide = !wide;
                let width = if wide { 640 } else { 420 };
                tb.on_resize(Rect::new(0, 0, width, 240));
                black_box(tb.visual_content_height())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_draw, bench_resize);
criterion_main!(benches);
