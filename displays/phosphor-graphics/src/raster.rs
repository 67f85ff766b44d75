//! Rasterizer primitives
//!
//! Every primitive takes a [`PixelBuffer`] by value, draws into it and
//! returns it. Pixels are only ever turned on, so shapes drawn one after
//! another combine as a logical OR. Anything that falls outside the buffer
//! is clipped.

use crate::buffer::PixelBuffer;

/// A straight line walked from a start point at an angle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSpec {
    /// Start column
    pub x0: i32,
    /// Start row
    pub y0: i32,
    /// Direction in degrees, counter-clockwise from +x
    pub angle: f32,
    /// Number of pixels to plot
    pub length: u32,
}

impl LineSpec {
    pub const fn new(x0: i32, y0: i32, angle: f32, length: u32) -> Self {
        Self {
            x0,
            y0,
            angle,
            length,
        }
    }
}

impl From<(i32, i32, f32, u32)> for LineSpec {
    fn from((x0, y0, angle, length): (i32, i32, f32, u32)) -> Self {
        Self::new(x0, y0, angle, length)
    }
}

/// A circle for [`draw_circles`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CircleSpec {
    pub cx: i32,
    pub cy: i32,
    pub radius: u16,
    pub filled: bool,
}

impl CircleSpec {
    pub const fn new(cx: i32, cy: i32, radius: u16, filled: bool) -> Self {
        Self {
            cx,
            cy,
            radius,
            filled,
        }
    }
}

impl From<(i32, i32, u16, bool)> for CircleSpec {
    fn from((cx, cy, radius, filled): (i32, i32, u16, bool)) -> Self {
        Self::new(cx, cy, radius, filled)
    }
}

/// Points of one circle octant from the midpoint algorithm
///
/// Yields `(x, y)` offsets with `x >= y`, starting at `(r, 0)`. Mirroring
/// each offset across the axes and diagonals gives the full circle.
struct Octant {
    x: i32,
    y: i32,
    d: i32,
}

impl Octant {
    fn new(radius: u16) -> Self {
        let r = radius as i32;
        Self { x: r, y: 0, d: 1 - r }
    }
}

impl Iterator for Octant {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.x < self.y {
            return None;
        }
        let point = (self.x, self.y);

        self.y += 1;
        if self.d <= 0 {
            self.d += 2 * self.y + 1;
        } else {
            self.x -= 1;
            self.d += 2 * (self.y - self.x) + 1;
        }

        Some(point)
    }
}

/// Plot each line pixel by pixel
///
/// Pixel `i` lands at `round(x0 + cos(a) * i)`, `round(y0 - sin(a) * i)`;
/// rows grow downward, hence the subtraction. Halves round to even.
pub fn draw_lines<const W: usize, const H: usize>(
    mut buffer: PixelBuffer<W, H>,
    lines: &[LineSpec],
) -> PixelBuffer<W, H> {
    for line in lines {
        let radians = (line.angle as f64).to_radians();
        let dx = libm::cos(radians);
        let dy = libm::sin(radians);

        for i in 0..line.length {
            let step = i as f64;
            let x = libm::rint(line.x0 as f64 + dx * step) as i32;
            let y = libm::rint(line.y0 as f64 - dy * step) as i32;
            buffer.set(x, y);
        }
    }
    buffer
}

// Offsets are in i64; points outside the i32 range are off the canvas.

fn plot<const W: usize, const H: usize>(buffer: &mut PixelBuffer<W, H>, x: i64, y: i64) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        buffer.set(x, y);
    }
}

fn narrow(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn hspan<const W: usize, const H: usize>(
    buffer: &mut PixelBuffer<W, H>,
    y: i64,
    x0: i64,
    x1: i64,
) {
    if let Ok(y) = i32::try_from(y) {
        buffer.hspan(y, narrow(x0), narrow(x1));
    }
}

fn vspan<const W: usize, const H: usize>(
    buffer: &mut PixelBuffer<W, H>,
    x: i64,
    y0: i64,
    y1: i64,
) {
    if let Ok(x) = i32::try_from(x) {
        buffer.vspan(x, narrow(y0), narrow(y1));
    }
}

/// Circle outline centred on `(cx, cy)`
///
/// A radius of 0 plots the centre alone.
pub fn draw_circle<const W: usize, const H: usize>(
    mut buffer: PixelBuffer<W, H>,
    cx: i32,
    cy: i32,
    radius: u16,
) -> PixelBuffer<W, H> {
    let (cx, cy) = (cx as i64, cy as i64);
    for (x, y) in Octant::new(radius) {
        let (x, y) = (x as i64, y as i64);
        plot(&mut buffer, cx + x, cy + y);
        plot(&mut buffer, cx - x, cy + y);
        plot(&mut buffer, cx + x, cy - y);
        plot(&mut buffer, cx - x, cy - y);
        plot(&mut buffer, cx + y, cy + x);
        plot(&mut buffer, cx - y, cy + x);
        plot(&mut buffer, cx + y, cy - x);
        plot(&mut buffer, cx - y, cy - x);
    }
    buffer
}

/// Solid disk centred on `(cx, cy)`
///
/// Covers exactly the outline of [`draw_circle`] plus everything inside it.
pub fn draw_circle_filled<const W: usize, const H: usize>(
    mut buffer: PixelBuffer<W, H>,
    cx: i32,
    cy: i32,
    radius: u16,
) -> PixelBuffer<W, H> {
    let (cx, cy) = (cx as i64, cy as i64);
    for (x, y) in Octant::new(radius) {
        let (x, y) = (x as i64, y as i64);
        hspan(&mut buffer, cy + y, cx - x, cx + x);
        hspan(&mut buffer, cy - y, cx - x, cx + x);
        hspan(&mut buffer, cy + x, cx - y, cx + y);
        hspan(&mut buffer, cy - x, cx - y, cx + y);
    }
    buffer
}

/// Draw a batch of circles, each stroked or filled
pub fn draw_circles<const W: usize, const H: usize>(
    buffer: PixelBuffer<W, H>,
    circles: &[CircleSpec],
) -> PixelBuffer<W, H> {
    circles.iter().fold(buffer, |buffer, c| {
        if c.filled {
            draw_circle_filled(buffer, c.cx, c.cy, c.radius)
        } else {
            draw_circle(buffer, c.cx, c.cy, c.radius)
        }
    })
}

/// Rounded rectangle with its top-left corner at `(x, y)`
///
/// `radius` is clamped to half the shorter side; 0 gives square corners.
/// A zero width or height draws nothing.
pub fn draw_box<const W: usize, const H: usize>(
    mut buffer: PixelBuffer<W, H>,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    radius: u16,
    fill: bool,
) -> PixelBuffer<W, H> {
    if width == 0 || height == 0 {
        return buffer;
    }

    let radius = radius.min(width.min(height) / 2);
    let r = radius as i64;
    let (x, y) = (x as i64, y as i64);
    let right = x + width as i64 - 1;
    let bottom = y + height as i64 - 1;

    // Corner arc centres
    let left_c = x + r;
    let right_c = right - r;
    let top_c = y + r;
    let bottom_c = bottom - r;

    if fill {
        for row in top_c.max(0)..=bottom_c.min(H as i64 - 1) {
            hspan(&mut buffer, row, x, right);
        }
        for (ox, oy) in Octant::new(radius) {
            let (ox, oy) = (ox as i64, oy as i64);
            hspan(&mut buffer, top_c - oy, left_c - ox, right_c + ox);
            hspan(&mut buffer, top_c - ox, left_c - oy, right_c + oy);
            hspan(&mut buffer, bottom_c + oy, left_c - ox, right_c + ox);
            hspan(&mut buffer, bottom_c + ox, left_c - oy, right_c + oy);
        }
    } else {
        hspan(&mut buffer, y, left_c, right_c);
        hspan(&mut buffer, bottom, left_c, right_c);
        vspan(&mut buffer, x, top_c, bottom_c);
        vspan(&mut buffer, right, top_c, bottom_c);

        for (ox, oy) in Octant::new(radius) {
            let (ox, oy) = (ox as i64, oy as i64);
            // top left
            plot(&mut buffer, left_c - ox, top_c - oy);
            plot(&mut buffer, left_c - oy, top_c - ox);
            // top right
            plot(&mut buffer, right_c + ox, top_c - oy);
            plot(&mut buffer, right_c + oy, top_c - ox);
            // bottom left
            plot(&mut buffer, left_c - ox, bottom_c + oy);
            plot(&mut buffer, left_c - oy, bottom_c + ox);
            // bottom right
            plot(&mut buffer, right_c + ox, bottom_c + oy);
            plot(&mut buffer, right_c + oy, bottom_c + ox);
        }
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    type Buf10 = PixelBuffer<10, 10>;

    #[test]
    fn test_horizontal_line() {
        let buf = draw_lines(Buf10::new(), &[LineSpec::new(0, 0, 0.0, 5)]);

        for x in 0..5 {
            assert!(buf.get(x, 0));
        }
        assert_eq!(buf.count_set(), 5);
    }

    #[test]
    fn test_zero_length_line() {
        let buf = draw_lines(Buf10::new(), &[LineSpec::new(3, 3, 45.0, 0)]);
        assert_eq!(buf.count_set(), 0);
    }

    #[test]
    fn test_vertical_line_goes_up() {
        let buf = draw_lines(Buf10::new(), &[LineSpec::new(2, 9, 90.0, 4)]);
        for y in 6..=9 {
            assert!(buf.get(2, y));
        }
        assert_eq!(buf.count_set(), 4);
    }

    #[test]
    fn test_diagonal_line() {
        // 315 degrees heads right and down
        // Steps 1 and 2 both round to (1, 1)
        let buf = draw_lines(Buf10::new(), &[LineSpec::new(0, 0, 315.0, 4)]);
        assert!(buf.get(0, 0));
        assert!(buf.get(1, 1));
        assert!(buf.get(2, 2));
        assert_eq!(buf.count_set(), 3);
    }

    #[test]
    fn test_line_clips() {
        let buf = draw_lines(Buf10::new(), &[LineSpec::new(8, 0, 0.0, 10)]);
        assert_eq!(buf.count_set(), 2);
        let buf = draw_lines(Buf10::new(), &[(5, 0, 90.0, 10).into()]);
        assert_eq!(buf.count_set(), 1);
    }

    #[test]
    fn test_overlapping_lines_or() {
        let buf = draw_lines(
            Buf10::new(),
            &[LineSpec::new(0, 5, 0.0, 10), LineSpec::new(5, 9, 90.0, 10)],
        );
        assert!(buf.get(5, 5));
        assert_eq!(buf.count_set(), 19);
    }

    #[test]
    fn test_radius_zero_is_a_point() {
        let buf = draw_circle(Buf10::new(), 4, 4, 0);
        assert!(buf.get(4, 4));
        assert_eq!(buf.count_set(), 1);

        let buf = draw_circle_filled(Buf10::new(), 4, 4, 0);
        assert_eq!(buf.count_set(), 1);
    }

    #[test]
    fn test_circle_radius_two() {
        let buf = draw_circle(PixelBuffer::<11, 11>::new(), 5, 5, 2);
        let expected = [
            (7, 5), (3, 5), (5, 7), (5, 3),
            (7, 6), (7, 4), (3, 6), (3, 4),
            (6, 7), (4, 7), (6, 3), (4, 3),
        ];
        for (x, y) in expected {
            assert!(buf.get(x, y), "missing ({}, {})", x, y);
        }
        assert_eq!(buf.count_set(), expected.len());
        assert!(!buf.get(5, 5));
    }

    #[test]
    fn test_filled_disk_radius_two() {
        let buf = draw_circle_filled(PixelBuffer::<11, 11>::new(), 5, 5, 2);

        // 3 + 5 + 5 + 5 + 3
        assert_eq!(buf.count_set(), 21);
        for (x, y) in buf.iter_set() {
            let (dx, dy) = ((x - 5) as f32, (y - 5) as f32);
            assert!(dx * dx + dy * dy <= 2.5 * 2.5);
        }
        // No holes
        for y in 4..=6 {
            for x in 3..=7 {
                assert!(buf.get(x, y));
            }
        }
    }

    #[test]
    fn test_filled_covers_outline() {
        for r in 0..6 {
            let outline = draw_circle(PixelBuffer::<16, 16>::new(), 8, 8, r);
            let disk = draw_circle_filled(PixelBuffer::<16, 16>::new(), 8, 8, r);
            for (x, y) in outline.iter_set() {
                assert!(disk.get(x, y), "r={} ({}, {})", r, x, y);
            }
        }
    }

    #[test]
    fn test_circle_clips_at_edges() {
        let buf = draw_circle(Buf10::new(), 0, 0, 3);
        assert!(buf.get(3, 0));
        assert!(buf.get(0, 3));
        assert!(buf.iter_set().all(|(x, y)| x >= 0 && y >= 0));
    }

    #[test]
    fn test_draw_circles_batch() {
        let buf = draw_circles(
            PixelBuffer::<20, 10>::new(),
            &[CircleSpec::new(4, 4, 2, false), (14, 4, 2, true).into()],
        );
        assert!(!buf.get(4, 4));
        assert!(buf.get(14, 4));
        assert_eq!(buf.count_set(), 12 + 21);
    }

    #[test]
    fn test_square_box_outline() {
        let buf = draw_box(Buf10::new(), 1, 1, 4, 3, 0, false);
        // Perimeter of a 4x3 rectangle
        assert_eq!(buf.count_set(), 10);
        assert!(buf.get(1, 1));
        assert!(buf.get(4, 3));
        assert!(!buf.get(2, 2));
    }

    #[test]
    fn test_square_box_filled() {
        let buf = draw_box(Buf10::new(), 1, 1, 4, 3, 0, true);
        assert_eq!(buf.count_set(), 12);
    }

    #[test]
    fn test_zero_sized_box() {
        assert_eq!(draw_box(Buf10::new(), 0, 0, 0, 5, 0, true).count_set(), 0);
        assert_eq!(draw_box(Buf10::new(), 0, 0, 5, 0, 2, false).count_set(), 0);
    }

    #[test]
    fn test_rounded_box_corners() {
        let buf = draw_box(PixelBuffer::<12, 12>::new(), 0, 0, 10, 10, 3, false);

        // Corners are cut
        assert!(!buf.get(0, 0));
        assert!(!buf.get(9, 0));
        assert!(!buf.get(0, 9));
        assert!(!buf.get(9, 9));
        // Edges stay straight between the arcs
        for i in 3..=6 {
            assert!(buf.get(i, 0));
            assert!(buf.get(i, 9));
            assert!(buf.get(0, i));
            assert!(buf.get(9, i));
        }
        // Hollow
        assert!(!buf.get(5, 5));
    }

    #[test]
    fn test_rounded_box_filled_has_no_holes() {
        let outline = draw_box(PixelBuffer::<12, 12>::new(), 1, 1, 10, 8, 3, false);
        let filled = draw_box(PixelBuffer::<12, 12>::new(), 1, 1, 10, 8, 3, true);

        for (x, y) in outline.iter_set() {
            assert!(filled.get(x, y), "({}, {})", x, y);
        }
        for y in 1..=8 {
            let cols: usize = (0..12).filter(|&x| filled.get(x, y)).count();
            let first = (0..12).find(|&x| filled.get(x, y)).unwrap();
            let last = (0..12).rev().find(|&x| filled.get(x, y)).unwrap();
            assert_eq!(cols as i32, last - first + 1, "gap in row {}", y);
        }
        assert!(!filled.get(1, 1));
    }

    #[test]
    fn test_box_radius_is_clamped() {
        // Radius 5 on an 8 pixel tall box behaves like radius 4
        let clamped = draw_box(PixelBuffer::<45, 8>::new(), 0, 0, 45, 8, 5, false);
        let exact = draw_box(PixelBuffer::<45, 8>::new(), 0, 0, 45, 8, 4, false);
        assert_eq!(clamped, exact);

        // Top and bottom rows are still reached
        assert!((0..45).any(|x| clamped.get(x, 0)));
        assert!((0..45).any(|x| clamped.get(x, 7)));
        assert!(clamped.get(0, 3) && clamped.get(0, 4));
    }

    #[test]
    fn test_box_clips() {
        let buf = draw_box(PixelBuffer::<5, 5>::new(), -2, -2, 20, 20, 0, true);
        assert_eq!(buf.count_set(), 25);
    }

    #[test]
    fn test_extreme_origins_clip() {
        type Buf8 = PixelBuffer<8, 8>;
        for (cx, cy) in [(i32::MAX, 0), (i32::MIN, 0), (0, i32::MAX), (i32::MIN, i32::MIN)] {
            assert_eq!(draw_circle(Buf8::new(), cx, cy, 3).count_set(), 0);
            assert_eq!(draw_circle_filled(Buf8::new(), cx, cy, 3).count_set(), 0);
            assert_eq!(draw_box(Buf8::new(), cx, cy, 10, 4, 2, false).count_set(), 0);
            assert_eq!(draw_box(Buf8::new(), cx, cy, 10, 4, 2, true).count_set(), 0);
        }
        assert_eq!(draw_box(Buf8::new(), i32::MAX - 2, 0, 10, 4, 0, false).count_set(), 0);
        assert_eq!(draw_circle(Buf8::new(), 0, 0, u16::MAX).count_set(), 0);
    }

    #[test]
    fn test_large_box_from_negative_origin() {
        // Only the right edge lands on the canvas
        let buf = draw_box(PixelBuffer::<8, 8>::new(), -65534, 0, u16::MAX, 8, 0, false);
        assert_eq!(buf.count_set(), 8);
        assert!((0..8).all(|y| buf.get(0, y)));
    }
}
