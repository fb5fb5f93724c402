//! Unit tests for wrapping and line rendering (no system fonts required).

use quill_test_utils::MonoFonts;
use quill_text::{Color, FontKey, StyledText, TextLayout, TextStyle};

/// 16px: 8px advance (9px bold), 20px lines, 4px line spacing.
fn layout_with(fonts: &MonoFonts) -> TextLayout {
    TextLayout::new(
        fonts.cache(),
        TextStyle {
            font: FontKey::sans(16),
            color: Color::WHITE,
            line_spacing: 4,
        },
    )
}

fn layout() -> TextLayout {
    layout_with(&MonoFonts::new())
}

const SAMPLE: &str = "It was a dark and stormy night; the rain fell in torrents, \
                      except at occasional intervals.\nSupercalifragilistic!\n\nEnd.";

#[test]
fn test_wrapped_lines_fit_or_are_single_chars() {
    let layout = layout();
    for width in [8, 20, 50, 97, 160, 400] {
        for line in layout.wrap(SAMPLE, width) {
            assert!(
                layout.measure(&line) <= width || line.chars().count() == 1,
                "{line:?} overflows {width}"
            );
        }
    }
}

#[test]
fn test_rewrapping_a_wrapped_line_is_stable() {
    let layout = layout();
    for width in [40, 97, 160] {
        for line in layout.wrap(SAMPLE, width) {
            if line.is_empty() {
                continue;
            }
            assert_eq!(layout.wrap(&line, width), vec![line.clone()]);
        }
    }
}

#[test]
fn test_wider_never_produces_more_lines() {
    let layout = layout();
    let mut previous = usize::MAX;
    // From the longest token up, so no token is hard-split
    for width in (168..=480).step_by(8) {
        let count = layout.wrap(SAMPLE, width).len();
        assert!(count <= previous, "{count} lines at {width}px");
        previous = count;
    }
}

#[test]
fn test_words_survive_wrapping() {
    let layout = layout();
    let joined = layout.wrap(SAMPLE, 200).join(" ");
    let words = |s: &str| s.split_whitespace().map(str::to_owned).collect::<Vec<_>>();
    assert_eq!(words(&joined), words(SAMPLE));
}

#[test]
fn test_styled_measure_uses_bold_face() {
    let layout = layout();
    let styled = StyledText::parse("a {b}bc{/b}");
    assert_eq!(styled.text(), "a bc");
    assert_eq!(layout.measure_styled(&styled, 0..styled.text().len()), 8 + 8 + 18);
}

#[test]
fn test_styled_wrap_ranges_index_plain_text() {
    let layout = layout();
    let styled = StyledText::parse("{i}one{/i} two {b}three{/b}");
    let lines: Vec<&str> = layout
        .wrap_styled(&styled, 64)
        .into_iter()
        .map(|r| &styled.text()[r])
        .collect();
    assert_eq!(lines, ["one two", "three"]);
}

#[test]
fn test_render_line_prefix_widths() {
    let layout = layout();
    let line = layout.render_line(&StyledText::plain("abc"), Color::WHITE);
    assert_eq!(line.prefix_widths, vec![0, 8, 16, 24]);
    assert_eq!((line.width, line.height), (24, 20));
    assert_eq!(line.char_count(), 3);
    assert_eq!(line.prefix_width(2), 16);
    assert_eq!(line.prefix_width(99), 24);

    let image = line.image.expect("rendered");
    assert_eq!((image.width(), image.height()), (24, 20));
}

#[test]
fn test_render_mixed_runs_composes_one_image() {
    let layout = layout();
    let line = layout.render_line(&StyledText::parse("a{b}b{/b}c"), Color::WHITE);
    assert_eq!(line.prefix_widths, vec![0, 8, 17, 25]);
    assert_eq!(line.width, 25);
    assert_eq!(line.image.map(|img| img.width()), Some(25));
}

#[test]
fn test_empty_line_has_no_image() {
    let layout = layout();
    let line = layout.render_line(&StyledText::plain(""), Color::WHITE);
    assert!(line.image.is_none());
    assert_eq!(line.width, 0);
    assert_eq!(line.char_count(), 0);
}

#[test]
fn test_block_height() {
    let layout = layout();
    assert_eq!(layout.block_height(0), 0);
    assert_eq!(layout.block_height(1), 20);
    assert_eq!(layout.block_height(3), 3 * 20 + 2 * 4);
}

#[test]
fn test_measurements_are_memoized() {
    let fonts = MonoFonts::new();
    let layout = layout_with(&fonts);
    fonts.clear_calls();

    assert_eq!(layout.measure("hello"), 40);
    assert_eq!(layout.measure("hello"), 40);
    assert_eq!(fonts.count_measures(), 1);

    let stats = layout.fonts().stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
    assert_eq!(stats.hit_rate(), 0.5);
}

#[test]
fn test_width_memo_is_bounded() {
    let fonts = MonoFonts::new();
    let layout = layout_with(&fonts);
    layout.fonts().set_max_widths(4);
    for word in ["a", "bb", "ccc", "dddd", "eeeee", "ffffff"] {
        layout.measure(word);
    }
    assert!(layout.fonts().stats().widths <= 4);

    layout.fonts().clear();
    let stats = layout.fonts().stats();
    assert_eq!((stats.faces, stats.widths, stats.hits), (0, 0, 0));
}

#[test]
fn test_faces_are_shared_between_layouts() {
    let fonts = MonoFonts::new();
    let cache = fonts.cache();
    let style = TextStyle {
        font: FontKey::sans(16),
        ..TextStyle::default()
    };
    let a = TextLayout::new(cache.clone(), style.clone());
    let b = TextLayout::new(cache, style);
    assert_eq!(a.face().id(), b.face().id());
    assert_eq!(a.fonts().stats().faces, 1);
}

#[test]
fn test_missing_glyphs_are_reported() {
    let fonts = MonoFonts::new().with_missing("▼");
    let layout = layout_with(&fonts);
    assert!(!layout.fonts().has_glyph(layout.face(), '▼'));
    assert!(layout.fonts().has_glyph(layout.face(), 'a'));
}
