//! Label font fitting and font file discovery
//!
//! Fonts are located with fontconfig and parsed with fontdue, so an
//! unusable file is rejected here rather than by the GUI.

use anyhow::{Context, Result};
use fontconfig::Fontconfig;
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::constants::font::MIN_SIZE;

/// Font size that lets `text_width` (measured at `base_size`) fit into
/// `available_width`, never below 8
pub fn fit_font(text_width: f32, available_width: f32, base_size: f32) -> f32 {
    if !(text_width.is_finite() && available_width.is_finite()) || text_width <= 0.0 {
        return base_size;
    }
    if text_width > available_width {
        (base_size * available_width / text_width).max(MIN_SIZE)
    } else {
        base_size
    }
}

/// Pixel width of rendered text
pub trait TextMetrics {
    fn measure(&self, text: &str, font_size: f32) -> f32;
}

/// Glyphs the labels cannot do without
const LABEL_GLYPHS: [char; 2] = ['↓', '↑'];

/// Label font file, validated with fontdue before it is handed to the GUI
#[derive(Clone)]
pub struct LabelFont {
    name: String,
    bytes: Vec<u8>,
}

impl LabelFont {
    /// Load and parse a TrueType font from a file path
    pub fn from_path(name: &str, path: PathBuf) -> Result<Self> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        let font = Font::from_bytes(bytes.as_slice(), FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font: {}", e))?;
        for glyph in LABEL_GLYPHS {
            if font.lookup_glyph_index(glyph) == 0 {
                debug!(path = %path.display(), glyph = %glyph, "Font lacks glyph, built-in fonts will cover it");
            }
        }

        info!(path = %path.display(), "Loaded label font");
        Ok(Self { name: name.to_string(), bytes })
    }

    /// Resolve a font name like "DejaVu Sans Bold" via fontconfig
    pub fn from_font_name(font_name: &str) -> Result<Self> {
        let path = find_font_path(font_name)
            .with_context(|| format!("Failed to resolve font '{}'", font_name))?;
        debug!(font_name = %font_name, resolved_path = %path.display(), "Resolved font name via fontconfig");
        Self::from_path(font_name, path)
    }

    /// Try the requested name, then common system fonts
    pub fn from_system_font(font_name: &str) -> Result<Self> {
        match Self::from_font_name(font_name) {
            Ok(font) => return Ok(font),
            Err(e) => warn!(font_name = %font_name, error = %e, "Font lookup failed, trying hardcoded paths"),
        }

        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
        ];

        for path in &font_paths {
            if let Ok(font) = Self::from_path(font_name, PathBuf::from(path)) {
                return Ok(font);
            }
        }

        Err(anyhow::anyhow!(
            "Could not find any system fonts. Tried '{}' and hardcoded paths: {:?}",
            font_name,
            font_paths
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Label font for `font_name`, or `None` to draw with the built-in fonts
pub fn load_label_font(font_name: &str) -> Option<LabelFont> {
    LabelFont::from_system_font(font_name)
        .inspect_err(|e| warn!(error = %e, "No usable label font, using built-in fonts"))
        .ok()
}

/// Split "Family Style" into fontconfig family and style
fn split_style(font_name: &str) -> (&str, Option<&str>) {
    const STYLES: &[&str] = &["Bold Italic", "Bold", "Italic", "Regular"];

    for style in STYLES {
        if let Some(family) = font_name.strip_suffix(style)
            && family.ends_with(' ')
        {
            return (family.trim_end(), Some(style));
        }
    }
    (font_name, None)
}

/// Resolve a family or "Family Style" name to a font file
pub fn find_font_path(font_name: &str) -> Result<PathBuf> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
    let (family, style) = split_style(font_name);

    let font = fc
        .find(family, style)
        .with_context(|| format!("No font matched family '{}'", family))?;
    Ok(font.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::font::BASE_SIZE;

    #[test]
    fn test_fit_font_clamps_to_minimum() {
        assert_eq!(fit_font(300.0, 200.0, 10.0), 8.0);
    }

    #[test]
    fn test_fit_font_scales_down() {
        let size = fit_font(200.0, 180.0, BASE_SIZE);
        assert!((size - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_font_keeps_base_when_text_fits() {
        assert_eq!(fit_font(150.0, 190.0, BASE_SIZE), BASE_SIZE);
        assert_eq!(fit_font(190.0, 190.0, BASE_SIZE), BASE_SIZE);
    }

    #[test]
    fn test_fit_font_degenerate_inputs() {
        assert_eq!(fit_font(0.0, 190.0, BASE_SIZE), BASE_SIZE);
        assert_eq!(fit_font(f32::NAN, 190.0, BASE_SIZE), BASE_SIZE);
        assert_eq!(fit_font(100.0, 0.0, BASE_SIZE), MIN_SIZE);
        assert_eq!(fit_font(100.0, -20.0, BASE_SIZE), MIN_SIZE);
    }

    #[test]
    fn test_unparsable_font_rejected() {
        let mut path = std::env::temp_dir();
        path.push(format!("net-floater-font-{}.ttf", std::process::id()));
        fs::write(&path, b"definitely not a font").unwrap();

        assert!(LabelFont::from_path("Broken", path.clone()).is_err());
        assert!(LabelFont::from_path("Missing", PathBuf::from("/nonexistent/font.ttf")).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_label_font_keeps_requested_name() {
        if let Some(font) = load_label_font("DejaVu Sans Bold") {
            assert_eq!(font.name(), "DejaVu Sans Bold");
            assert!(!font.bytes().is_empty());
        }
    }

    #[test]
    fn test_split_style() {
        assert_eq!(split_style("DejaVu Sans Bold"), ("DejaVu Sans", Some("Bold")));
        assert_eq!(split_style("Noto Sans Bold Italic"), ("Noto Sans", Some("Bold Italic")));
        assert_eq!(split_style("Monospace"), ("Monospace", None));
        assert_eq!(split_style("Bold"), ("Bold", None));
    }

    #[test]
    fn test_find_common_fonts() {
        for family in ["DejaVu Sans", "Liberation Sans", "Monospace"] {
            if let Ok(path) = find_font_path(family) {
                assert!(path.is_absolute(), "Font path should be absolute");
            }
        }
    }
}
