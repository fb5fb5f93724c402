//! End-to-end tests for the text box (no system fonts required).
//!
//! All tests use the fixed-advance `MonoFonts` backend at 16px: 8px per character
//! and 20px lines, so heights and positions can be asserted exactly.

use std::sync::Arc;

use quill_core::math::Vec2;
use quill_core::{Color, Insets, Rect};
use quill_test_utils::MonoFonts;
use quill_ui::{Canvas, ImageSlots, RevealParams, TextBox, Theme};

fn theme() -> Theme {
    Theme::builder()
        .font_size(16)
        .line_spacing(4)
        .entry_gap(5)
        .padding(Insets::uniform(10))
        .build()
}

/// Viewport is `height - 20` tall and `width - 34` wide.
fn text_box(rect: Rect<i32>) -> TextBox {
    TextBox::new(rect, MonoFonts::new().cache(), theme(), RevealParams::default())
}

fn settle(tb: &mut TextBox) {
    for _ in 0..100 {
        tb.update(0.05);
    }
}

fn lines(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Line {i}")).collect()
}

#[test]
fn test_hello_world_end_to_end() {
    let mut tb = text_box(Rect::new(0, 0, 300, 200));
    tb.queue_lines("Hello\nWorld", true);
    assert_eq!(tb.pending_count(), 2);

    settle(&mut tb);
    assert!(tb.visible_entries().is_empty());

    assert!(tb.on_player_press());
    settle(&mut tb);
    assert_eq!(tb.visible_entries().len(), 1);

    assert!(tb.on_player_press());
    settle(&mut tb);
    let texts: Vec<_> = tb.visible_entries().iter().map(|e| e.text()).collect();
    assert_eq!(texts, ["Hello", "World"]);
    assert!(tb.is_settled());
    assert_eq!(tb.visual_content_height(), 20 + 5 + 20);

    let mut frame = Canvas::new(400, 300).unwrap();
    tb.draw(&mut frame);
    // Glyph box of the first character differs from the empty end of the line
    assert_ne!(frame.pixel(10 + 4, 10 + 10), frame.pixel(200, 10 + 10));
}

#[test]
fn test_release_ordering_one_press_per_line() {
    let mut tb = text_box(Rect::new(0, 0, 300, 200));
    tb.queue_lines("a\nb\nc\nd", true);
    for n in 1..=4 {
        assert!(tb.on_player_press());
        settle(&mut tb);
        assert_eq!(tb.visible_entries().len(), n);
    }
    assert!(!tb.on_player_press());
}

#[test]
fn test_automatic_lines_follow_bottom() {
    let mut tb = text_box(Rect::new(0, 0, 300, 120));
    tb.queue_lines(&lines(20).join("\n"), false);
    for _ in 0..400 {
        tb.update(0.05);
    }
    assert_eq!(tb.visible_entries().len(), 20);
    assert!(tb.max_scroll() > 0.0);
    assert!(tb.is_at_bottom());
    assert!(tb.follow_bottom());
}

#[test]
fn test_scroll_up_detaches_and_bottom_reattaches() {
    let mut tb = text_box(Rect::new(0, 0, 300, 120));
    tb.append_visible_lines(lines(20), false);
    tb.scroll_to_bottom();
    assert!(tb.follow_bottom());

    tb.scroll(-100.0);
    assert!(!tb.follow_bottom());

    // New animated lines do not pull the view down while detached
    let offset = tb.scroll_offset();
    tb.append_visible_lines(["more"], true);
    settle(&mut tb);
    assert_eq!(tb.scroll_offset(), offset);

    tb.scroll(10_000.0);
    assert!(tb.is_at_bottom());
    assert!(tb.follow_bottom());

    tb.scroll_to_top();
    assert!(tb.is_at_top());
    assert!(!tb.follow_bottom());
}

#[test]
fn test_scroll_clamps_after_content_shrinks() {
    let mut tb = text_box(Rect::new(0, 0, 300, 120));
    tb.append_visible_lines(lines(20), false);
    tb.scroll_to_bottom();
    let before = tb.max_scroll();

    assert_eq!(tb.trim_front(15), 15);
    let after = tb.max_scroll();
    assert!(after < before);
    assert!(tb.scroll_offset() <= after);
    assert_eq!(tb.trim_front(100), 5);
    assert_eq!(tb.max_scroll(), 0.0);
}

#[test]
fn test_trim_to_bottom_reattaches_follow() {
    let mut tb = text_box(Rect::new(0, 0, 300, 120));
    tb.append_visible_lines(lines(20), false);
    tb.scroll_to_bottom();
    tb.scroll(-100.0);
    assert!(!tb.follow_bottom());

    // Trimming leaves everything on screen, so the view sits at the bottom again
    tb.trim_front(18);
    assert_eq!(tb.max_scroll(), 0.0);
    assert!(tb.follow_bottom());

    // A release taller than the stick threshold is still followed
    tb.queue_lines(&"word ".repeat(24), false);
    settle(&mut tb);
    assert!(tb.max_scroll() > 24.0);
    assert!(tb.is_at_bottom());
}

#[test]
fn test_resize_to_bottom_reattaches_follow() {
    let mut tb = text_box(Rect::new(0, 0, 300, 120));
    tb.append_visible_lines(lines(6), false);
    tb.scroll_to_bottom();
    tb.scroll(-20.0);
    assert!(!tb.follow_bottom());

    tb.on_resize(Rect::new(0, 0, 300, 400));
    assert!(tb.is_at_bottom());
    assert!(tb.follow_bottom());
}

#[test]
fn test_resize_keeps_bottom_or_ratio() {
    let mut tb = text_box(Rect::new(0, 0, 300, 120));
    tb.append_visible_lines(lines(30), false);
    tb.scroll_to_bottom();

    tb.on_resize(Rect::new(0, 0, 120, 140));
    assert!(tb.is_at_bottom());

    tb.scroll_to_top();
    let half = tb.max_scroll() / 2.0;
    tb.scroll(half);
    tb.on_resize(Rect::new(0, 0, 300, 120));
    let ratio = tb.scroll_offset() / tb.max_scroll();
    assert!((ratio - 0.5).abs() < 0.01, "ratio {ratio}");
}

#[test]
fn test_narrow_resize_rewraps() {
    let mut tb = text_box(Rect::new(0, 0, 300, 400));
    tb.append_visible_lines(["one two three four five six"], false);
    assert_eq!(tb.visual_content_height(), 20);

    // 90 - 34 = 56px viewport: seven characters per line
    tb.on_resize(Rect::new(0, 0, 90, 400));
    assert!(tb.visual_content_height() > 20);

    tb.on_resize(Rect::new(0, 0, 20, 400));
    assert_eq!(tb.visual_content_height(), 0);
}

#[test]
fn test_theme_change_relayouts() {
    let mut tb = text_box(Rect::new(0, 0, 300, 400));
    tb.append_visible_lines(["abc"], false);
    assert_eq!(tb.visual_content_height(), 20);

    tb.set_theme(Theme::builder().font_size(32).padding(Insets::uniform(10)).build());
    assert_eq!(tb.visual_content_height(), 40);
}

#[test]
fn test_choice_overlay_keeps_bottom_anchor() {
    // Viewport 400px tall, 120px of settled dialogue
    let mut tb = text_box(Rect::new(0, 0, 300, 420));
    tb.append_visible_lines(lines(5), false);
    assert_eq!(tb.visual_content_height(), 120);
    assert_eq!(tb.max_scroll(), 0.0);

    tb.show_choice_box((0..8).map(|i| format!("> Option {i}")).collect());
    assert!(tb.choice_overlay().anchor_to_bottom());
    settle(&mut tb);

    // 120 + 5 + (24 + 8 * 36 + 7 * 4) = 465
    assert_eq!(tb.max_scroll(), 65.0);
    assert_eq!(tb.scroll_offset(), tb.max_scroll());
}

#[test]
fn test_choice_click_and_hover() {
    let origin = Vec2::new(50.0, 60.0);
    let mut tb = text_box(Rect::new(50, 60, 300, 420));
    tb.append_visible_lines(lines(5), false);
    tb.show_choice_box(vec!["> First".into(), "> Second".into()]);
    settle(&mut tb);
    assert_eq!(tb.max_scroll(), 0.0);

    // Panel starts at 10 + 120 + 5 + 12; row text at x = 10 + 12 + 10
    let row0 = origin + Vec2::new(32.0 + 4.0, 147.0 + 10.0);
    let row1 = origin + Vec2::new(32.0 + 4.0, 147.0 + 36.0 + 4.0 + 10.0);
    assert_eq!(tb.choice_click(row0), Some(0));
    assert_eq!(tb.choice_click(row1), Some(1));
    assert_eq!(tb.choice_selected_index(), Some(1));

    // Beyond the text only hover matches
    let beside = origin + Vec2::new(32.0 + 150.0, 147.0 + 10.0);
    assert_eq!(tb.choice_click(beside), None);
    tb.choice_hover_at(beside);
    assert_eq!(tb.choice_selected_index(), Some(0));

    tb.choice_move_cursor(1);
    assert_eq!(tb.choice_selected_index(), Some(1));
    tb.hide_choice_box();
    assert!(!tb.choice_active());
    assert_eq!(tb.choice_click(row0), None);
}

#[test]
fn test_draw_background_slot_and_opacity() {
    let mut image = Canvas::new(8, 8).unwrap();
    image.clear(Color::rgb(0.0, 0.0, 1.0));
    let mut slots = ImageSlots::new();
    slots.insert("panel", image.into_pixmap());

    let mut tb = text_box(Rect::new(20, 20, 200, 100));
    tb.bind_background(Arc::new(slots), "panel");

    let mut frame = Canvas::new(300, 200).unwrap();
    tb.draw(&mut frame);
    let inside = frame.pixel(20 + 40, 20 + 50).unwrap();
    assert!(inside.b > 0.95 && inside.r < 0.05, "{inside:?}");
    assert_eq!(frame.pixel(5, 5).map(|c| c.a), Some(0.0));

    tb.set_opacity(0.5);
    let mut frame = Canvas::new(300, 200).unwrap();
    tb.draw(&mut frame);
    let alpha = frame.pixel(20 + 40, 20 + 50).unwrap().a;
    assert!((alpha - 0.5).abs() < 0.02, "alpha {alpha}");
}

#[test]
fn test_draw_without_viewport_is_noop() {
    // 30px wide: padding and scrollbar gutter leave no text area
    let mut tb = text_box(Rect::new(10, 10, 30, 100));
    tb.append_visible_lines(["hidden"], false);
    assert!(tb.viewport_rect().is_empty());

    let mut frame = Canvas::new(100, 150).unwrap();
    tb.draw(&mut frame);
    assert!(frame.pixmap().pixels().iter().all(|px| px.alpha() == 0));
}

#[test]
fn test_typewriter_mode() {
    let mut tb = TextBox::new(
        Rect::new(0, 0, 300, 200),
        MonoFonts::new().cache(),
        theme(),
        RevealParams::typewriter(),
    );
    tb.queue_lines("Well... hello, there.", true);
    tb.on_player_press();
    let entry = &tb.visible_entries()[0];
    assert_eq!(entry.chars_to_show(), Some(0));

    let mut shown = 0;
    for _ in 0..200 {
        tb.update(0.02);
        let now = tb.visible_entries()[0].chars_to_show().unwrap();
        assert!(now >= shown);
        shown = now;
    }
    assert_eq!(shown, "Well... hello, there.".chars().count());
}
