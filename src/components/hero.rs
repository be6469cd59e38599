use crate::chant::glow::GlowSurfaces;
use crate::components::glow::GlowBackdrop;
use crate::components::palette::{SquadColor, resolve};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

/// Team name, tagline and chant prompt over the bass glow.
pub struct HeroBanner<'a> {
    pub name: &'a str,
    pub tagline: Option<&'a str>,
    pub surfaces: &'a GlowSurfaces,
    pub playing: bool,
}

impl Widget for HeroBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(resolve(SquadColor::Accent));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        GlowBackdrop { surfaces: self.surfaces }.render(inner, buf);

        if inner.height < 3 {
            render_centered(
                Line::from(Span::styled(self.name.to_uppercase(), resolve(SquadColor::Primary))),
                inner,
                inner.y,
                buf,
            );
            return;
        }

        let mid = inner.y + inner.height.saturating_sub(3) / 2;
        render_centered(
            Line::from(Span::styled(self.name.to_uppercase(), resolve(SquadColor::Primary))),
            inner,
            mid,
            buf,
        );
        if let Some(tagline) = self.tagline {
            render_centered(
                Line::from(Span::styled(tagline.to_string(), resolve(SquadColor::Tagline))),
                inner,
                mid + 1,
                buf,
            );
        }

        let prompt = if self.playing {
            "♪ chanting… [space] from the top"
        } else {
            "[space] Play Team Chant"
        };
        render_centered(
            Line::from(Span::styled(prompt, resolve(SquadColor::Accent))),
            inner,
            mid + 2,
            buf,
        );
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.right().saturating_sub(x), buf);
}

/// Writes text without touching cell backgrounds, so the glow shows through.
fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let style: Style = span.style;
        for ch in span.content.chars() {
            if cx >= limit {
                return;
            }
            if let Some(cell) = buf.cell_mut((cx, y)) {
                cell.set_char(ch);
                if let Some(fg) = style.fg {
                    cell.set_fg(fg);
                }
                cell.modifier.insert(style.add_modifier);
            }
            cx += 1;
        }
    }
}
