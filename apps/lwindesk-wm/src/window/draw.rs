use raqote::{DrawOptions, DrawTarget, PathBuilder, SolidSource, Source, StrokeStyle};
use tracing::debug;

use crate::window::frame::{DecorationRegion, BUTTON_WIDTH};

const BACKGROUND: (u8, u8, u8) = (0x2b, 0x2b, 0x2b);
const CLOSE_BACKGROUND: (u8, u8, u8) = (0xc4, 0x2b, 0x1c);
const GLYPH: (u8, u8, u8) = (0xff, 0xff, 0xff);
/// Glyph box edge, centred in each button slot.
const GLYPH_SIZE: f32 = 10.0;

/// Rendered title-bar pixels, premultiplied ARGB, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub width: i32,
    pub height: i32,
    pub pixels: Vec<u32>,
}

/// Produces title-bar artwork for a given size and title.
pub trait TitlebarRenderer {
    fn render(&mut self, width: i32, height: i32, title: &str) -> Artwork;
}

/// Software renderer for the dark title bar and its three caption buttons.
/// The title text itself is left to richer renderers.
#[derive(Debug, Default)]
pub struct RaqoteRenderer;

fn solid((r, g, b): (u8, u8, u8)) -> Source<'static> {
    Source::Solid(SolidSource::from_unpremultiplied_argb(0xff, r, g, b))
}

impl RaqoteRenderer {
    fn draw_close(dt: &mut DrawTarget, x: f32, height: f32, style: &StrokeStyle) {
        let slot = BUTTON_WIDTH as f32;
        dt.fill_rect(x, 0.0, slot, height, &solid(CLOSE_BACKGROUND), &DrawOptions::new());

        let (gx, gy) = Self::glyph_origin(x, height);
        let mut pb = PathBuilder::new();
        pb.move_to(gx, gy);
        pb.line_to(gx + GLYPH_SIZE, gy + GLYPH_SIZE);
        pb.move_to(gx + GLYPH_SIZE, gy);
        pb.line_to(gx, gy + GLYPH_SIZE);
        dt.stroke(&pb.finish(), &solid(GLYPH), style, &DrawOptions::new());
    }

    fn draw_maximize(dt: &mut DrawTarget, x: f32, height: f32, style: &StrokeStyle) {
        let (gx, gy) = Self::glyph_origin(x, height);
        let mut pb = PathBuilder::new();
        pb.rect(gx, gy, GLYPH_SIZE, GLYPH_SIZE);
        dt.stroke(&pb.finish(), &solid(GLYPH), style, &DrawOptions::new());
    }

    fn draw_minimize(dt: &mut DrawTarget, x: f32, height: f32, style: &StrokeStyle) {
        let (gx, _) = Self::glyph_origin(x, height);
        let mid = (height / 2.0).floor() + 0.5;
        let mut pb = PathBuilder::new();
        pb.move_to(gx, mid);
        pb.line_to(gx + GLYPH_SIZE, mid);
        dt.stroke(&pb.finish(), &solid(GLYPH), style, &DrawOptions::new());
    }

    fn glyph_origin(slot_x: f32, height: f32) -> (f32, f32) {
        let slot = BUTTON_WIDTH as f32;
        (
            slot_x + ((slot - GLYPH_SIZE) / 2.0).floor() + 0.5,
            ((height - GLYPH_SIZE) / 2.0).floor() + 0.5,
        )
    }
}

impl TitlebarRenderer for RaqoteRenderer {
    fn render(&mut self, width: i32, height: i32, title: &str) -> Artwork {
        let width = width.max(1);
        let height = height.max(1);
        debug!("Rendering title bar {}x{} for {:?}", width, height, title);

        let mut dt = DrawTarget::new(width, height);
        let h = height as f32;
        dt.fill_rect(0.0, 0.0, width as f32, h, &solid(BACKGROUND), &DrawOptions::new());

        let style = StrokeStyle {
            width: 1.0,
            ..StrokeStyle::default()
        };
        Self::draw_close(&mut dt, DecorationRegion::Close.slot_x(width) as f32, h, &style);
        Self::draw_maximize(&mut dt, DecorationRegion::Maximize.slot_x(width) as f32, h, &style);
        Self::draw_minimize(&mut dt, DecorationRegion::Minimize.slot_x(width) as f32, h, &style);

        Artwork {
            width,
            height,
            pixels: dt.get_data().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::frame::TITLEBAR_HEIGHT;

    fn pixel(art: &Artwork, x: i32, y: i32) -> u32 {
        art.pixels[(y * art.width + x) as usize]
    }

    #[test]
    fn test_render_size_and_colours() {
        let art = RaqoteRenderer.render(640, TITLEBAR_HEIGHT, "Terminal");
        assert_eq!(art.width, 640);
        assert_eq!(art.height, TITLEBAR_HEIGHT);
        assert_eq!(art.pixels.len(), 640 * TITLEBAR_HEIGHT as usize);

        // title area is the dark background
        assert_eq!(pixel(&art, 10, 2), 0xff2b2b2b);
        // corner of the close slot is red
        assert_eq!(pixel(&art, 640 - BUTTON_WIDTH + 1, 1), 0xffc42b1c);
        // just left of the close slot is background again
        assert_eq!(pixel(&art, 640 - BUTTON_WIDTH - 1, 1), 0xff2b2b2b);
    }

    #[test]
    fn test_render_degenerate_width() {
        let art = RaqoteRenderer.render(0, TITLEBAR_HEIGHT, "");
        assert_eq!(art.width, 1);
        assert_eq!(art.pixels.len(), TITLEBAR_HEIGHT as usize);
    }
}
