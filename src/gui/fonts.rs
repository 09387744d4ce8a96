//! Label font registration and measurement through egui's own text layout
//!
//! Labels are measured with the same galley layout the painter draws, so the
//! width that decides the auto-fit is the width that ends up on screen.

use std::sync::Arc;

use egui::{Color32, FontData, FontDefinitions, FontFamily, FontId, LayerId, Painter, Rect};
use tracing::info;

use crate::font::{LabelFont, TextMetrics};

/// egui family the speed labels are drawn with
pub const LABEL_FAMILY: &str = "label";

/// Register the label family with egui. The loaded font comes first and
/// the built-in proportional fonts fill in any glyphs it lacks; with no
/// font the family is the built-in proportional list.
pub fn install_label_font(ctx: &egui::Context, font: Option<&LabelFont>) {
    let mut fonts = FontDefinitions::default();
    let mut family = fonts.families.get(&FontFamily::Proportional).cloned().unwrap_or_default();

    if let Some(font) = font {
        fonts
            .font_data
            .insert(font.name().to_owned(), Arc::new(FontData::from_owned(font.bytes().to_vec())));
        family.insert(0, font.name().to_owned());
        info!(font = %font.name(), "Registered label font");
    }

    fonts.families.insert(FontFamily::Name(LABEL_FAMILY.into()), family);
    ctx.set_fonts(fonts);
}

pub fn label_font_id(size: f32) -> FontId {
    FontId::new(size, FontFamily::Name(LABEL_FAMILY.into()))
}

/// `TextMetrics` backed by egui's galley layout of the label family
pub struct GalleyMetrics {
    painter: Painter,
}

impl GalleyMetrics {
    pub fn new(ctx: egui::Context) -> Self {
        Self { painter: Painter::new(ctx, LayerId::background(), Rect::EVERYTHING) }
    }
}

impl TextMetrics for GalleyMetrics {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), label_font_id(font_size), Color32::WHITE)
            .size()
            .x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::load_label_font;
    use crate::gui::painter::paint_label;
    use egui::pos2;

    const LABEL: &str = "↓ 1023.5 KB/s";

    /// Run one egui pass with the label family installed
    fn with_fonts(font: Option<&LabelFont>, check: impl FnMut(&egui::Context)) {
        let ctx = egui::Context::default();
        install_label_font(&ctx, font);
        let _ = ctx.run(egui::RawInput::default(), check);
    }

    #[test]
    fn test_measured_width_matches_painted_width() {
        with_fonts(None, |ctx| {
            let metrics = GalleyMetrics::new(ctx.clone());
            let painter = Painter::new(ctx.clone(), LayerId::background(), Rect::EVERYTHING);
            for size in [8.0, 9.0, 10.0] {
                let painted = paint_label(&painter, pos2(15.0, 27.0), LABEL, size, Color32::WHITE);
                assert_eq!(metrics.measure(LABEL, size), painted.width());
            }
        });
    }

    #[test]
    fn test_loaded_font_measures_what_it_paints() {
        let Some(font) = load_label_font("DejaVu Sans Bold") else {
            return;
        };
        with_fonts(Some(&font), |ctx| {
            let metrics = GalleyMetrics::new(ctx.clone());
            let painter = Painter::new(ctx.clone(), LayerId::background(), Rect::EVERYTHING);
            let painted = paint_label(&painter, pos2(15.0, 27.0), LABEL, 10.0, Color32::WHITE);
            assert_eq!(metrics.measure(LABEL, 10.0), painted.width());

            // The label family really is the loaded face, not the built-in one
            let builtin = painter
                .layout_no_wrap(LABEL.to_owned(), FontId::proportional(10.0), Color32::WHITE)
                .size()
                .x;
            assert_ne!(painted.width(), builtin);
        });
    }

    #[test]
    fn test_width_grows_with_size() {
        with_fonts(None, |ctx| {
            let metrics = GalleyMetrics::new(ctx.clone());
            assert!(metrics.measure(LABEL, 10.0) > metrics.measure(LABEL, 8.0));
            assert_eq!(metrics.measure("", 10.0), 0.0);
        });
    }
}
