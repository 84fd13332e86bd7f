// crates/skyfire_core/src/renderer/text.rs
//! Text runs drawn through egui's glyph atlas.
//!
//! A text drawable is just a string and a font. Its model matrix maps text
//! pixels (origin top-left, y down) into the world; at paint time the origin
//! is projected to the screen and the glyph size is scaled to match.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use egui::epaint::text::Fonts;
use egui::{Align2, Color32, FontData, FontDefinitions, FontFamily, Pos2};
use glam::{Mat4, Vec2, Vec4};
use skyfire_shared::{
    AssetError, Camera, DrawCall, DrawableId, FontId, FontInfo, Shading, TextLayout, Viewport,
};
use tracing::debug;

const MAX_TEXTURE_SIDE: usize = 2048;

struct FontEntry {
    family: FontFamily,
    pixel_height: f32,
}

pub struct TextOverlay {
    definitions: FontDefinitions,
    /// Off-screen copy of the fonts for measuring, in pixels.
    measure: Fonts,
    fonts: HashMap<FontId, FontEntry>,
    texts: HashMap<DrawableId, (FontId, String)>,
}

fn color32(color: Vec4) -> Color32 {
    let [r, g, b, a] = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round().to_array();
    Color32::from_rgba_unmultiplied(r as u8, g as u8, b as u8, a as u8)
}

/// Screen position (window pixels) of a text run's origin, and how many
/// screen pixels one text pixel covers.
pub fn project_text(model: &Mat4, camera: &Camera, viewport: &Viewport) -> (Vec2, f32) {
    let clip = camera.view_proj() * *model * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = Vec2::new(clip.x, clip.y) / clip.w;
    let position = viewport.offset
        + Vec2::new((ndc.x + 1.0) / 2.0, (1.0 - ndc.y) / 2.0) * viewport.size;

    // World height 2 spans the viewport height.
    let world_per_text_px = model.y_axis.truncate().length();
    (position, world_per_text_px * viewport.size.y / 2.0)
}

impl TextOverlay {
    pub fn new() -> Self {
        let definitions = FontDefinitions::default();
        Self {
            measure: Fonts::new(1.0, MAX_TEXTURE_SIDE, definitions.clone()),
            definitions,
            fonts: HashMap::new(),
            texts: HashMap::new(),
        }
    }

    /// Registers the font with `ctx`; it is usable from the next frame on.
    pub fn load_font(
        &mut self,
        ctx: &egui::Context,
        id: FontId,
        path: &Path,
        pixel_height: f32,
    ) -> Result<FontInfo, AssetError> {
        let bytes = fs::read(path).map_err(|err| AssetError::io(path, err))?;
        let name = format!("font-{}", id.0);
        debug!(path = %path.display(), %name, pixel_height, "Registering font");

        self.definitions
            .font_data
            .insert(name.clone(), FontData::from_owned(bytes));
        let family = FontFamily::Name(name.clone().into());
        self.definitions.families.insert(family.clone(), vec![name]);

        self.measure = Fonts::new(1.0, MAX_TEXTURE_SIDE, self.definitions.clone());
        ctx.set_fonts(self.definitions.clone());

        self.fonts.insert(
            id,
            FontEntry {
                family,
                pixel_height,
            },
        );
        Ok(FontInfo { id, pixel_height })
    }

    pub fn layout(&self, font: FontId, text: &str) -> TextLayout {
        let Some(entry) = self.fonts.get(&font) else {
            return TextLayout::default();
        };
        let galley = self.measure.layout_no_wrap(
            text.to_owned(),
            egui::FontId::new(entry.pixel_height, entry.family.clone()),
            Color32::WHITE,
        );
        let size = galley.size();
        TextLayout {
            width: size.x,
            height: size.y,
        }
    }

    pub fn set_text(&mut self, drawable: DrawableId, font: FontId, text: &str) {
        self.texts.insert(drawable, (font, text.to_owned()));
    }

    pub fn update_text(&mut self, drawable: DrawableId, text: &str) {
        if let Some((_, current)) = self.texts.get_mut(&drawable) {
            current.clear();
            current.push_str(text);
        }
    }

    /// Paints every text call, outline passes first.
    pub fn paint(
        &self,
        ctx: &egui::Context,
        calls: &[DrawCall],
        camera: &Camera,
        viewport: &Viewport,
    ) {
        let painter = ctx.layer_painter(egui::LayerId::background());
        let points_per_pixel = 1.0 / ctx.pixels_per_point();

        for call in calls {
            let Shading::Text(style) = &call.shading else {
                continue;
            };
            let Some((font, text)) = self.texts.get(&call.drawable) else {
                continue;
            };
            let Some(entry) = self.fonts.get(font) else {
                continue;
            };

            let (origin, scale) = project_text(&call.model, camera, viewport);
            let origin = origin * points_per_pixel;
            let font_id = egui::FontId::new(
                entry.pixel_height * scale * points_per_pixel,
                entry.family.clone(),
            );
            let at = |offset: Vec2| Pos2::new(origin.x + offset.x, origin.y + offset.y);

            if style.outline_thickness > 0.0 {
                let t = style.outline_thickness * points_per_pixel;
                let outline = color32(style.outline_color);
                for offset in [Vec2::new(-t, -t), Vec2::new(t, -t), Vec2::new(-t, t), Vec2::new(t, t)] {
                    painter.text(at(offset), Align2::LEFT_TOP, text, font_id.clone(), outline);
                }
            }
            painter.text(at(Vec2::ZERO), Align2::LEFT_TOP, text, font_id, color32(style.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_shared::Transform;

    #[test]
    fn origin_maps_through_the_letterbox() {
        let aspect = 16.0 / 9.0;
        let camera = Camera::orthographic(aspect);
        let viewport = Viewport::letterbox(2000, 900, aspect);

        let model = Transform {
            position: Vec2::new(-aspect, 1.0),
            scale: Vec2::new(0.01, -0.01),
            rotation: 0.0,
        }
        .matrix();
        let (position, scale) = project_text(&model, &camera, &viewport);

        assert!((position - Vec2::new(200.0, 0.0)).length() < 1e-2);
        assert!((scale - 4.5).abs() < 1e-4);
    }

    #[test]
    fn colors_are_quantized() {
        assert_eq!(
            color32(Vec4::new(1.0, 0.0, 0.5, 1.0)),
            Color32::from_rgba_unmultiplied(255, 0, 128, 255)
        );
    }
}
