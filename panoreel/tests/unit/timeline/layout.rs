use super::*;

const HD: Canvas = Canvas {
    width: 1920,
    height: 1080,
};

fn fake_probe(dims: &[(&str, Option<(u32, u32)>)]) -> impl FnMut(&Path) -> ReelResult<(u32, u32)> {
    let table: Vec<(String, Option<(u32, u32)>)> = dims
        .iter()
        .map(|(name, d)| (name.to_string(), *d))
        .collect();
    move |path: &Path| {
        let name = path.to_string_lossy().to_string();
        match table.iter().find(|(n, _)| *n == name) {
            Some((_, Some(d))) => Ok(*d),
            _ => Err(ReelError::asset(format!("unreadable '{name}'"))),
        }
    }
}

#[test]
fn worked_example_layout() {
    // Three 3000x2000 photos on a 1920x1080 canvas: footprint 1620 each,
    // endcaps 1920, total length 8700.
    let photos = ["a.jpg", "b.jpg", "c.jpg"];
    let probe = fake_probe(&[
        ("a.jpg", Some((3000, 2000))),
        ("b.jpg", Some((3000, 2000))),
        ("c.jpg", Some((3000, 2000))),
    ]);
    let tl = build_timeline_with(&photos, HD, probe).unwrap();

    let entries = tl.entries();
    assert_eq!(entries.len(), 5);
    assert!(entries[0].is_endcap());
    assert!(entries[4].is_endcap());
    assert_eq!(entries[0].footprint, 1920);
    assert_eq!(entries[4].footprint, 1920);
    for e in &entries[1..4] {
        assert_eq!(e.footprint, 1620);
        assert_eq!(e.native, Some((3000, 2000)));
    }
    assert_eq!(entries[1].position, 1920);
    assert_eq!(entries[2].position, 3540);
    assert_eq!(entries[3].position, 5160);
    assert_eq!(entries[4].position, 6780);
    assert_eq!(tl.total_length(), 8700);
}

#[test]
fn entries_tile_the_scroll_axis_exactly() {
    let photos = ["a.jpg", "b.jpg", "c.jpg"];
    let probe = fake_probe(&[
        ("a.jpg", Some((3000, 2000))),
        ("b.jpg", Some((1234, 999))),
        ("c.jpg", Some((800, 601))),
    ]);
    let tl = build_timeline_with(&photos, HD, probe).unwrap();

    let entries = tl.entries();
    let mut expected_position = 0u64;
    for e in entries {
        assert_eq!(e.position, expected_position);
        assert!(e.footprint > 0);
        expected_position += u64::from(e.footprint);
    }
    assert_eq!(tl.total_length(), expected_position);
}

#[test]
fn layout_is_deterministic() {
    let photos = ["a.jpg", "b.jpg"];
    let dims = [
        ("a.jpg", Some((3000, 2000))),
        ("b.jpg", Some((4032, 3024))),
    ];
    let a = build_timeline_with(&photos, HD, fake_probe(&dims)).unwrap();
    let b = build_timeline_with(&photos, HD, fake_probe(&dims)).unwrap();
    assert_eq!(a.entries(), b.entries());
    assert_eq!(a.total_length(), b.total_length());
}

#[test]
fn unreadable_photo_is_skipped_not_fatal() {
    let photos = ["a.jpg", "broken.jpg", "c.jpg"];
    let probe = fake_probe(&[
        ("a.jpg", Some((3000, 2000))),
        ("broken.jpg", None),
        ("c.jpg", Some((3000, 2000))),
    ]);
    let tl = build_timeline_with(&photos, HD, probe).unwrap();

    // Two photos plus two endcaps; the broken file contributes nothing.
    assert_eq!(tl.entries().len(), 4);
    assert_eq!(tl.total_length(), 1920 + 1620 + 1620 + 1920);
}

#[test]
fn all_photos_unreadable_is_an_error() {
    let photos = ["broken.jpg"];
    let probe = fake_probe(&[("broken.jpg", None)]);
    assert!(matches!(
        build_timeline_with(&photos, HD, probe),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn portrait_canvas_uses_vertical_footprints() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    let photos = ["a.jpg"];
    let probe = fake_probe(&[("a.jpg", Some((3000, 2000)))]);
    let tl = build_timeline_with(&photos, canvas, probe).unwrap();

    // Cross axis is width (1080): scale = 1080/3000, footprint = round(2000 * 0.36).
    assert_eq!(tl.entries()[1].footprint, 720);
    assert_eq!(tl.entries()[0].footprint, 1920);
}

#[test]
fn photo_footprint_matches_worked_example() {
    assert_eq!(photo_footprint(3000, 2000, HD), 1620);
    assert_eq!(photo_footprint(1080, 1080, HD), 1080);
}
