//! Property tests for the rasterizer and packer

use phosphor_graphics::{
    draw_box, draw_circle, draw_circle_filled, draw_lines, pack, unpack, LineSpec, PixelBuffer,
};
use proptest::prelude::*;

type Canvas = PixelBuffer<40, 32>;

fn canvas_from(points: &[(i32, i32)]) -> Canvas {
    let mut buf = Canvas::new();
    for &(x, y) in points {
        buf.set(x, y);
    }
    buf
}

proptest! {
    #[test]
    fn circle_is_quadrant_symmetric(cx in -5i32..45, cy in -5i32..37, r in 0u16..20) {
        // Draw on a canvas large enough that nothing clips, then compare
        let buf = draw_circle(PixelBuffer::<128, 128>::new(), cx + 44, cy + 48, r);
        let (cx, cy) = (cx + 44, cy + 48);
        for (x, y) in buf.iter_set() {
            prop_assert!(buf.get(2 * cx - x, y));
            prop_assert!(buf.get(x, 2 * cy - y));
            prop_assert!(buf.get(2 * cx - x, 2 * cy - y));
        }
    }

    #[test]
    fn filled_circle_stays_within_radius(r in 0u16..15) {
        let buf = draw_circle_filled(PixelBuffer::<64, 64>::new(), 32, 32, r);
        let limit = r as f32 + 0.5;
        for (x, y) in buf.iter_set() {
            let (dx, dy) = ((x - 32) as f32, (y - 32) as f32);
            prop_assert!(dx * dx + dy * dy <= limit * limit);
        }
    }

    #[test]
    fn pack_then_unpack_is_identity(points in prop::collection::vec((0i32..40, 0i32..32), 0..200)) {
        let buf = canvas_from(&points);
        let packed = pack(&buf).unwrap();
        prop_assert_eq!(packed.len(), 40 * 4);
        let restored: Canvas = unpack(packed.as_bytes()).unwrap();
        prop_assert_eq!(restored, buf);
    }

    #[test]
    fn zero_length_line_changes_nothing(
        points in prop::collection::vec((0i32..40, 0i32..32), 0..50),
        x0 in -10i32..50,
        y0 in -10i32..40,
        angle in 0f32..360.0,
    ) {
        let buf = canvas_from(&points);
        let drawn = draw_lines(buf.clone(), &[LineSpec::new(x0, y0, angle, 0)]);
        prop_assert_eq!(drawn, buf);
    }

    #[test]
    fn drawing_never_clears_pixels(
        points in prop::collection::vec((0i32..40, 0i32..32), 0..50),
        x in -10i32..40,
        y in -10i32..32,
        w in 0u16..50,
        h in 0u16..40,
        radius in 0u16..10,
        fill in any::<bool>(),
    ) {
        let buf = canvas_from(&points);
        let drawn = draw_box(buf.clone(), x, y, w, h, radius, fill);
        for (px, py) in buf.iter_set() {
            prop_assert!(drawn.get(px, py));
        }
    }
}
