//! Palette-indexed framebuffer and the integer line rasterizer.

use glam::IVec2;
use tracing::warn;

use super::clip::FrameLine;

/// Automap area inside the framebuffer (`f_x`, `f_y`, `f_w`, `f_h`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl FrameRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Last column and row that still belong to the frame.
    #[inline]
    pub fn max(&self) -> IVec2 {
        IVec2::new(self.x + self.w - 1, self.y + self.h - 1)
    }

    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.w && p.y < self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }
}

pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    /// Lines refused because an endpoint was outside the frame.
    pub bad_lines: u64,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            bad_lines: 0,
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    /// Single pixel, silently ignored outside `rect`.
    #[inline]
    pub fn put(&mut self, rect: FrameRect, p: IVec2, color: u8) {
        if rect.contains(p) && self.inside(p) {
            self.pixels[p.y as usize * self.width + p.x as usize] = color;
        }
    }

    pub fn fill(&mut self, rect: FrameRect, color: u8) {
        for y in rect.y.max(0)..(rect.y + rect.h).min(self.height as i32) {
            let row = y as usize * self.width;
            let x0 = rect.x.max(0) as usize;
            let x1 = ((rect.x + rect.w).max(0) as usize).min(self.width);
            if x0 < x1 {
                self.pixels[row + x0..row + x1].fill(color);
            }
        }
    }

    #[inline]
    fn inside(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Bresenham between the endpoints of an already clipped line.
    ///
    /// Both endpoints must lie in `rect`; otherwise the line is counted in
    /// [`bad_lines`](Self::bad_lines), logged and skipped.
    pub fn draw_line(&mut self, rect: FrameRect, line: &FrameLine, color: u8) {
        let (a, b) = (line.a, line.b);
        if !rect.contains(a) || !rect.contains(b) || !self.inside(a) || !self.inside(b) {
            self.bad_lines += 1;
            warn!(?a, ?b, count = self.bad_lines, "line endpoint outside the frame");
            return;
        }

        let dx = b.x - a.x;
        let ax = 2 * dx.abs();
        let sx = if dx < 0 { -1 } else { 1 };

        let dy = b.y - a.y;
        let ay = 2 * dy.abs();
        let sy = if dy < 0 { -1 } else { 1 };

        let (mut x, mut y) = (a.x, a.y);
        let w = self.width;
        let mut plot = |x: i32, y: i32| self.pixels[y as usize * w + x as usize] = color;

        if ax > ay {
            let mut d = ay - ax / 2;
            loop {
                plot(x, y);
                if x == b.x {
                    return;
                }
                if d >= 0 {
                    y += sy;
                    d -= ax;
                }
                x += sx;
                d += ay;
            }
        } else {
            let mut d = ax - ay / 2;
            loop {
                plot(x, y);
                if y == b.y {
                    return;
                }
                if d >= 0 {
                    x += sx;
                    d -= ay;
                }
                y += sy;
                d += ax;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: FrameRect = FrameRect::new(0, 0, 16, 8);

    fn lit(fb: &FrameBuffer) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..fb.height as i32 {
            for x in 0..fb.width as i32 {
                if fb.get(x, y) == Some(7) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn horizontal_and_single_pixel() {
        let mut fb = FrameBuffer::new(16, 8);
        fb.draw_line(RECT, &FrameLine::new(IVec2::new(2, 3), IVec2::new(5, 3)), 7);
        assert_eq!(lit(&fb), vec![(2, 3), (3, 3), (4, 3), (5, 3)]);

        let mut fb = FrameBuffer::new(16, 8);
        fb.draw_line(RECT, &FrameLine::new(IVec2::new(9, 1), IVec2::new(9, 1)), 7);
        assert_eq!(lit(&fb), vec![(9, 1)]);
    }

    #[test]
    fn steep_line_has_one_pixel_per_row() {
        let mut fb = FrameBuffer::new(16, 8);
        fb.draw_line(RECT, &FrameLine::new(IVec2::new(1, 7), IVec2::new(3, 0)), 7);
        let px = lit(&fb);
        assert_eq!(px.len(), 8);
        for row in 0..8 {
            assert_eq!(px.iter().filter(|p| p.1 == row).count(), 1);
        }
        assert!(px.contains(&(1, 7)) && px.contains(&(3, 0)));
    }

    #[test]
    fn diagonal_is_exact() {
        let mut fb = FrameBuffer::new(16, 8);
        fb.draw_line(RECT, &FrameLine::new(IVec2::new(0, 0), IVec2::new(4, 4)), 7);
        assert_eq!(lit(&fb), (0..5).map(|i| (i, i)).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_frame_line_is_counted_and_skipped() {
        let mut fb = FrameBuffer::new(16, 8);
        fb.draw_line(RECT, &FrameLine::new(IVec2::new(-1, 0), IVec2::new(4, 4)), 7);
        fb.draw_line(RECT, &FrameLine::new(IVec2::new(0, 0), IVec2::new(4, 8)), 7);
        assert_eq!(fb.bad_lines, 2);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn fill_respects_rect() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill(FrameRect::new(1, 1, 2, 10), 7);
        assert_eq!(lit(&fb), vec![(1, 1), (2, 1), (1, 2), (2, 2), (1, 3), (2, 3)]);
    }
}
