use super::*;

use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Fps};

const TINY: Canvas = Canvas {
    width: 16,
    height: 8,
};

fn tiny_config() -> ReelConfig {
    ReelConfig {
        canvas: TINY,
        fps: Fps { num: 24, den: 1 },
        seed: 7,
        ..ReelConfig::default()
    }
}

/// Two 20x10 solid photos: footprint 16 each on the 16x8 canvas.
fn fixture_photos(name: &str) -> Vec<std::path::PathBuf> {
    let dir = std::path::PathBuf::from("target")
        .join("unit_session")
        .join(name);
    std::fs::create_dir_all(&dir).unwrap();

    let colors = [[200u8, 40, 40, 255], [40, 200, 40, 255]];
    let mut paths = Vec::new();
    for (i, color) in colors.iter().enumerate() {
        let path = dir.join(format!("photo_{i}.png"));
        let mut img = image::RgbaImage::new(20, 10);
        for px in img.pixels_mut() {
            *px = image::Rgba(*color);
        }
        img.save(&path).unwrap();
        paths.push(path);
    }
    paths
}

#[test]
fn new_rejects_zero_frames_and_bad_config() {
    let photos = fixture_photos("validation");
    assert!(RenderSession::new(&tiny_config(), &photos, 0).is_err());

    let bad = ReelConfig {
        min_scale: 2.0,
        ..tiny_config()
    };
    assert!(RenderSession::new(&bad, &photos, 20).is_err());
}

#[test]
fn first_frame_is_pure_background() {
    let photos = fixture_photos("background");
    let config = ReelConfig {
        background: [10, 20, 30, 255],
        ..tiny_config()
    };
    let mut sess = RenderSession::new(&config, &photos, 20).unwrap();

    // At offset 0 the leading endcap spans the whole canvas.
    let frame = sess.render_frame(FrameIndex(0)).unwrap();
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255])
    );
}

#[test]
fn render_frame_rejects_out_of_range_index() {
    let photos = fixture_photos("range");
    let mut sess = RenderSession::new(&tiny_config(), &photos, 20).unwrap();
    assert!(sess.render_frame(FrameIndex(20)).is_err());
}

#[test]
fn mid_render_frames_show_photo_pixels() {
    let photos = fixture_photos("midframe");
    let mut sess = RenderSession::new(&tiny_config(), &photos, 20).unwrap();

    // Halfway through, at least one photo strip is onscreen.
    let frame = sess.render_frame(FrameIndex(10)).unwrap();
    let has_photo_pixels = frame
        .data
        .chunks_exact(4)
        .any(|px| px != [0, 0, 0, 255]);
    assert!(has_photo_pixels, "expected photo content mid-render");
}

#[test]
fn repeated_frames_are_identical() {
    let photos = fixture_photos("deterministic");
    let mut a = RenderSession::new(&tiny_config(), &photos, 20).unwrap();
    let mut b = RenderSession::new(&tiny_config(), &photos, 20).unwrap();

    for i in [0u64, 5, 10, 19] {
        let fa = a.render_frame(FrameIndex(i)).unwrap();
        let fb = b.render_frame(FrameIndex(i)).unwrap();
        assert_eq!(fa.data, fb.data, "frame {i} differs between sessions");
    }
}

#[test]
fn render_range_streams_in_order() {
    let photos = fixture_photos("inorder");
    let mut sess = RenderSession::new(&tiny_config(), &photos, 20).unwrap();

    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(0), FrameIndex(20)).unwrap();
    let stats = sess
        .render_range(range, &mut sink, &RenderSessionOpts::default())
        .unwrap();

    assert_eq!(stats.frames_total, 20);
    assert_eq!(sink.frames().len(), 20);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (16, 8));
    }
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (16, 8));
}

#[test]
fn render_range_rejects_empty_or_overlong_ranges() {
    let photos = fixture_photos("badrange");
    let mut sess = RenderSession::new(&tiny_config(), &photos, 20).unwrap();
    let mut sink = InMemorySink::new();

    let empty = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
    assert!(
        sess.render_range(empty, &mut sink, &RenderSessionOpts::default())
            .is_err()
    );

    let overlong = FrameRange::new(FrameIndex(0), FrameIndex(21)).unwrap();
    assert!(
        sess.render_range(overlong, &mut sink, &RenderSessionOpts::default())
            .is_err()
    );
}
