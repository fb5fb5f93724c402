//! Image backgrounds behind the dialogue panel.

use quill_core::Rect;
use quill_core::alloc::HashMap;
use tiny_skia::Pixmap;

use crate::canvas::{Canvas, resample};

/// Supplies named background images for the text box.
pub trait BackgroundProvider {
    fn slot_has_image(&self, slot: &str) -> bool;

    /// Paint the image bound to `slot` over `rect`.
    fn draw_slot(&self, slot: &str, canvas: &mut Canvas, rect: Rect<i32>);
}

/// Static images keyed by slot name, stretched to fill the requested rect.
#[derive(Default)]
pub struct ImageSlots {
    slots: HashMap<String, Pixmap>,
}

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: impl Into<String>, image: Pixmap) -> Option<Pixmap> {
        self.slots.insert(slot.into(), image)
    }

    pub fn remove(&mut self, slot: &str) -> Option<Pixmap> {
        self.slots.remove(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl BackgroundProvider for ImageSlots {
    fn slot_has_image(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    fn draw_slot(&self, slot: &str, canvas: &mut Canvas, rect: Rect<i32>) {
        if rect.is_empty() {
            return;
        }
        let Some(image) = self.slots.get(slot) else {
            return;
        };
        if image.width() == rect.width as u32 && image.height() == rect.height as u32 {
            canvas.draw_image(image, rect.x, rect.y, 1.0);
        } else if let Some(scaled) = resample(image, rect.width as u32, rect.height as u32) {
            canvas.draw_image(&scaled, rect.x, rect.y, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Color;

    #[test]
    fn test_image_slots() {
        let mut image = Canvas::new(4, 4).unwrap();
        image.clear(Color::rgb(0.0, 0.0, 1.0));

        let mut slots = ImageSlots::new();
        assert!(!slots.slot_has_image("panel"));
        slots.insert("panel", image.into_pixmap());
        assert!(slots.slot_has_image("panel"));

        let mut canvas = Canvas::new(16, 16).unwrap();
        slots.draw_slot("panel", &mut canvas, Rect::new(0, 0, 16, 16));
        assert_eq!(canvas.pixel(8, 8), Some(Color::rgb(0.0, 0.0, 1.0)));

        slots.draw_slot("missing", &mut canvas, Rect::new(0, 0, 16, 16));
        assert_eq!(slots.len(), 1);
    }
}
