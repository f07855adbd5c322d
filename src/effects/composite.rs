use crate::foundation::{
    core::{Canvas, Rgba8},
    error::{BongoError, BongoResult},
};

/// A solid, opaque rectangle placed in frame pixel space.
///
/// The top-left corner may lie outside the frame (including negative coordinates); compositing
/// clips silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayRect {
    /// Left edge in pixels.
    pub x: i64,
    /// Top edge in pixels.
    pub y: i64,
    /// Width in pixels. Zero-sized rects draw nothing.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Fill color, written verbatim.
    pub color: Rgba8,
}

impl OverlayRect {
    /// Intersect with `canvas`, returning `(x0, y0, x1, y1)` as half-open pixel bounds.
    pub fn clip_to(&self, canvas: Canvas) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + i64::from(self.width)).min(i64::from(canvas.width));
        let y1 = (self.y + i64::from(self.height)).min(i64::from(canvas.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        // Bounds are inside [0, canvas] here, so they fit in u32.
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Replace the pixels covered by `rect` with its color; no blending.
pub fn fill_rect_in_place(dst: &mut [u8], canvas: Canvas, rect: &OverlayRect) -> BongoResult<()> {
    if dst.len() != canvas.rgba8_len()? {
        return Err(BongoError::validation(
            "fill_rect_in_place expects a buffer matching width*height*4",
        ));
    }

    let Some((x0, y0, x1, y1)) = rect.clip_to(canvas) else {
        return Ok(());
    };

    let px = rect.color.to_array();
    let stride = canvas.width as usize * 4;
    for y in y0..y1 {
        let row = y as usize * stride;
        let span = &mut dst[row + x0 as usize * 4..row + x1 as usize * 4];
        for d in span.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
