use crate::chant::glow::{GlowSurface, GlowSurfaces, Side};
use crate::components::palette::{BACKDROP, blend};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::widgets::Widget;

/// Paints the three glow surfaces onto cell backgrounds. An unlit glow
/// leaves the area untouched.
pub struct GlowBackdrop<'a> {
    pub surfaces: &'a GlowSurfaces,
}

impl Widget for GlowBackdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || !self.surfaces.is_lit() {
            return;
        }

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let alpha = combined_alpha(self.surfaces, area, x, y);
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(blend(BACKDROP, accent(self.surfaces), alpha));
                }
            }
        }
    }
}

fn accent(surfaces: &GlowSurfaces) -> (u8, u8, u8) {
    surfaces
        .iter()
        .find_map(|s| s.gradient.map(|g| g.color))
        .unwrap_or(crate::chant::glow::ACCENT)
}

/// Overlapping surfaces composite like stacked translucent layers.
fn combined_alpha(surfaces: &GlowSurfaces, area: Rect, x: u16, y: u16) -> f64 {
    let clear: f64 = surfaces
        .iter()
        .map(|s| 1.0 - s.intensity_at(distance(s, area, x, y)))
        .product();
    1.0 - clear
}

/// How far (0..1) the cell centre sits from the surface's opaque edge.
fn distance(surface: &GlowSurface, area: Rect, x: u16, y: u16) -> f64 {
    let w = f64::from(area.width);
    let h = f64::from(area.height);
    match surface.side {
        Side::Top => (f64::from(y - area.y) + 0.5) / h,
        Side::Left => (f64::from(x - area.x) + 0.5) / w,
        Side::Right => (f64::from(area.right() - 1 - x) + 0.5) / w,
    }
}
