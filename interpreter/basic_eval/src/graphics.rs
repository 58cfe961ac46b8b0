//! The drawable surface and the rasterizers behind `DRAW` and `BOX`.

/// A width × height framebuffer of RGBA color strings.
///
/// The core never inspects how a surface is implemented; hosts hand one
/// out from `create_image`. Implementations must clip out-of-range
/// coordinates rather than fail.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self, color: &str);
    fn set_pixel(&mut self, x: u32, y: u32, color: &str);
    fn get_pixel(&self, x: u32, y: u32) -> Option<String>;
}

/// Plot one point, clipping negatives before the u32 conversion.
pub(crate) fn draw_point(surface: &mut dyn Surface, x: i64, y: i64, color: &str) {
    if x >= 0 && y >= 0 && x <= i64::from(u32::MAX) && y <= i64::from(u32::MAX) {
        surface.set_pixel(x as u32, y as u32, color);
    }
}

/// Rasterize a line with the standard incremental (Bresenham) walk.
pub(crate) fn draw_line(surface: &mut dyn Surface, x1: i64, y1: i64, x2: i64, y2: i64, color: &str) {
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        draw_point(surface, x, y, color);
        if x == x2 && y == y2 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw the outline of an axis-aligned rectangle.
pub(crate) fn draw_box(
    surface: &mut dyn Surface,
    left: i64,
    top: i64,
    width: i64,
    height: i64,
    color: &str,
) {
    if width <= 0 || height <= 0 {
        return;
    }
    let right = left + width - 1;
    let bottom = top + height - 1;
    draw_line(surface, left, top, right, top, color);
    draw_line(surface, left, bottom, right, bottom, color);
    draw_line(surface, left, top, left, bottom, color);
    draw_line(surface, right, top, right, bottom, color);
}
