//! Signature pad rendering

use crate::signature::{has_ink_in, DrawingSurface};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

const PAPER: Color = Color::White;
const INK: Color = Color::Black;

/// Draws the surface raster with half-block cells, two pixel rows per cell
pub struct SignaturePad<'a> {
    surface: &'a DrawingSurface,
    placeholder: Option<&'a str>,
}

impl<'a> SignaturePad<'a> {
    pub fn new(surface: &'a DrawingSurface) -> Self {
        Self {
            surface,
            placeholder: None,
        }
    }

    /// Text shown centered while the pad is blank
    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = Some(text);
        self
    }
}

impl Widget for SignaturePad<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let raster = self.surface.raster();
        let (width, height) = raster.dimensions();
        // Each cell covers two sub-rows of the raster
        let sub_rows = u32::from(area.height) * 2;
        let columns = u32::from(area.width);

        for row in 0..area.height {
            for column in 0..area.width {
                let x0 = u32::from(column) * width / columns;
                let x1 = ((u32::from(column) + 1) * width / columns).max(x0 + 1);
                let top = u32::from(row) * 2;
                let y0 = top * height / sub_rows;
                let y_mid = ((top + 1) * height / sub_rows).max(y0 + 1);
                let y1 = ((top + 2) * height / sub_rows).max(y_mid + 1);

                let upper = if has_ink_in(raster, x0, x1, y0, y_mid) { INK } else { PAPER };
                let lower = if has_ink_in(raster, x0, x1, y_mid, y1) { INK } else { PAPER };

                if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
                    cell.set_symbol("▀").set_fg(upper).set_bg(lower);
                }
            }
        }

        if let Some(text) = self.placeholder.filter(|_| !self.surface.has_ink()) {
            let text_width = (text.chars().count() as u16).min(area.width);
            let x = area.x + (area.width - text_width) / 2;
            let y = area.y + area.height / 2;
            buf.set_stringn(
                x,
                y,
                text,
                text_width as usize,
                ratatui::style::Style::default().fg(Color::DarkGray).bg(PAPER),
            );
        }
    }
}
