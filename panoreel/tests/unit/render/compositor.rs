use super::*;

use std::sync::Arc;

fn solid_photo(w: u32, h: u32, rgba: [u8; 4]) -> PhotoPixels {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&rgba);
    }
    PhotoPixels {
        width: w,
        height: h,
        rgba8: Arc::new(data),
    }
}

fn solid_strip(w: u32, h: u32, rgba: [u8; 4]) -> RasterFrame {
    let mut strip = RasterFrame {
        width: w,
        height: h,
        data: vec![0; (w * h * 4) as usize],
    };
    strip.fill(rgba);
    strip
}

const SMALL: Canvas = Canvas {
    width: 16,
    height: 8,
};

#[test]
fn strip_overlap_clips_both_edges() {
    // Fully onscreen.
    assert_eq!(
        strip_overlap(2, 4, 16),
        Some(StripOverlap {
            canvas_start: 2,
            strip_start: 0,
            len: 4
        })
    );
    // Entering from the right: only the head is shown.
    assert_eq!(
        strip_overlap(14, 4, 16),
        Some(StripOverlap {
            canvas_start: 14,
            strip_start: 0,
            len: 2
        })
    );
    // Leaving on the left: only the tail is shown.
    assert_eq!(
        strip_overlap(-3, 4, 16),
        Some(StripOverlap {
            canvas_start: 0,
            strip_start: 3,
            len: 1
        })
    );
    // Exactly offscreen on either side.
    assert_eq!(strip_overlap(16, 4, 16), None);
    assert_eq!(strip_overlap(-4, 4, 16), None);
}

#[test]
fn adjacent_strips_tile_without_gap_or_overlap() {
    // Two entries sharing a boundary: positions p and p + footprint.
    let a = strip_overlap(-2, 6, 16).unwrap();
    let b = strip_overlap(4, 6, 16).unwrap();
    assert_eq!(a.canvas_start + a.len, b.canvas_start);
}

#[test]
fn blit_horizontal_writes_expected_columns() {
    let mut frame = RasterFrame::filled(SMALL, [0, 0, 0, 255]);
    let strip = solid_strip(6, 8, [255, 0, 0, 255]);

    blit_strip(&mut frame, &strip, 12, SMALL).unwrap();

    for y in 0..8usize {
        for x in 0..16usize {
            let px = &frame.data[(y * 16 + x) * 4..(y * 16 + x) * 4 + 4];
            if x >= 12 {
                assert_eq!(px, &[255, 0, 0, 255], "expected strip at ({x},{y})");
            } else {
                assert_eq!(px, &[0, 0, 0, 255], "expected background at ({x},{y})");
            }
        }
    }
}

#[test]
fn blit_vertical_writes_expected_rows() {
    let canvas = Canvas {
        width: 8,
        height: 16,
    };
    let mut frame = RasterFrame::filled(canvas, [0, 0, 0, 255]);
    let strip = solid_strip(8, 6, [0, 255, 0, 255]);

    blit_strip(&mut frame, &strip, -2, canvas).unwrap();

    for y in 0..16usize {
        let px = &frame.data[y * 8 * 4..y * 8 * 4 + 4];
        if y < 4 {
            assert_eq!(px, &[0, 255, 0, 255], "expected strip at row {y}");
        } else {
            assert_eq!(px, &[0, 0, 0, 255], "expected background at row {y}");
        }
    }
}

#[test]
fn blit_skips_offscreen_strip() {
    let mut frame = RasterFrame::filled(SMALL, [1, 2, 3, 255]);
    let before = frame.clone();
    let strip = solid_strip(6, 8, [255, 0, 0, 255]);
    blit_strip(&mut frame, &strip, 16, SMALL).unwrap();
    assert_eq!(frame, before);
}

#[test]
fn blit_rejects_mismatched_cross_dimension() {
    let mut frame = RasterFrame::filled(SMALL, [0, 0, 0, 255]);
    let strip = solid_strip(6, 7, [255, 0, 0, 255]);
    assert!(blit_strip(&mut frame, &strip, 0, SMALL).is_err());
}

#[test]
fn crop_resize_produces_axis_oriented_strip() {
    let photo = solid_photo(100, 50, [9, 8, 7, 255]);
    let rect = CropRect {
        x: 10.0,
        y: 5.0,
        width: 80.0,
        height: 40.0,
    };

    let strip = crop_resize_strip(&photo, rect, 12, SMALL).unwrap();
    assert_eq!((strip.width, strip.height), (12, 8));
    assert_eq!(&strip.data[0..4], &[9, 8, 7, 255]);

    let portrait = Canvas {
        width: 8,
        height: 16,
    };
    let strip = crop_resize_strip(&photo, rect, 12, portrait).unwrap();
    assert_eq!((strip.width, strip.height), (8, 12));
}

#[test]
fn crop_resize_rejects_out_of_bounds_rect() {
    let photo = solid_photo(100, 50, [9, 8, 7, 255]);
    let rect = CropRect {
        x: 60.0,
        y: 5.0,
        width: 80.0,
        height: 40.0,
    };
    assert!(crop_resize_strip(&photo, rect, 12, SMALL).is_err());
}
