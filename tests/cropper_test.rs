// End-to-end and property tests for the boundary cropper
use proptest::prelude::*;
use screencrop::cropper::{
    Bitmap, BoundaryCropper, CropConfig, CropError, ImageSource, RgbaPixel, plan_from_downsampled,
};
use screencrop::storage::{self, OutputFormat};

const DARK: RgbaPixel = RgbaPixel::new(25, 30, 35);

fn filled(width: u32, height: u32, pixel: RgbaPixel) -> Bitmap {
    Bitmap::from_pixels(width, height, vec![pixel; (width * height) as usize])
        .expect("failed to build bitmap")
}

fn paint_rows(bitmap: &mut Bitmap, rows: std::ops::Range<u32>, pixel: RgbaPixel) {
    for y in rows {
        for x in 0..bitmap.width() {
            bitmap.set(x, y, pixel);
        }
    }
}

/// 截图式图片：上下是浅色背景，中间是深色内容区。
fn screenshot_like() -> Bitmap {
    let mut source = filled(400, 800, DARK);
    paint_rows(&mut source, 0..240, RgbaPixel::new(245, 245, 245));
    paint_rows(&mut source, 560..800, RgbaPixel::new(245, 245, 245));
    source
}

#[test]
fn screenshot_band_is_found_near_light_edges() {
    let cropper = BoundaryCropper::new(CropConfig::default()).expect("cropper init failed");
    let source = screenshot_like();

    let plan = cropper.plan(&source).expect("plan should succeed");
    assert_eq!(plan.downsampled_size, (100, 200));
    assert!((58..=60).contains(&plan.boundaries.above), "above={}", plan.boundaries.above);
    assert!((139..=141).contains(&plan.boundaries.below), "below={}", plan.boundaries.below);

    let expected_top = (plan.boundaries.above + 1) * 2;
    let expected_height = 2 * (plan.boundaries.below - (plan.boundaries.above + 1));
    assert_eq!(plan.rect.x, 0);
    assert_eq!(plan.rect.width, 400);
    assert_eq!(plan.rect.y, expected_top);
    assert_eq!(plan.rect.height, expected_height);

    let cropped = cropper.crop(&source).expect("crop should succeed");
    assert_eq!(cropped.dimensions(), (400, expected_height));
    for y in 0..cropped.height() {
        assert_eq!(cropped.row(y), source.row(expected_top + y));
    }
}

#[test]
fn all_white_source_is_degenerate() {
    let cropper = BoundaryCropper::new(CropConfig::default()).expect("cropper init failed");
    let result = cropper.crop(&filled(400, 800, RgbaPixel::WHITE));

    match result {
        Err(CropError::DegenerateCrop { top, height, .. }) => {
            assert_eq!((top, height), (202, -2));
        }
        other => panic!("expected degenerate crop, got {:?}", other.map(|b| b.dimensions())),
    }
}

#[test]
fn file_round_trip_through_loader_and_storage() {
    let dir = std::env::temp_dir().join("screencrop-e2e");
    let dir = storage::resolve_output_dir(dir.to_str()).expect("output dir");

    let input = storage::save_bitmap(&screenshot_like(), &dir, OutputFormat::Png).expect("save input");
    let cropper = BoundaryCropper::new(CropConfig::default()).expect("cropper init failed");

    let loaded = cropper.load(ImageSource::FilePath(input)).expect("load");
    assert_eq!(loaded, screenshot_like());

    let cropped = cropper.crop(&loaded).expect("crop");
    let output = storage::save_bitmap(&cropped, &dir, OutputFormat::Png).expect("save output");
    let reopened = image::open(&output).expect("reopen");
    assert_eq!((reopened.width(), reopened.height()), cropped.dimensions());
}

fn injected_bitmap(width: u32, height: u32, rows: &[u32]) -> Bitmap {
    let mut bitmap = filled(width, height, DARK);
    for &y in rows {
        paint_rows(&mut bitmap, y..y + 1, RgbaPixel::WHITE);
    }
    bitmap
}

proptest! {
    #[test]
    fn injected_boundaries_reproduce_hand_computed_rect(
        width in 4u32..64,
        height in 4u32..256,
        above_frac in proptest::option::of(0.0f64..1.0),
        below_frac in proptest::option::of(0.0f64..1.0),
    ) {
        let center = height / 2;
        let above_row = above_frac.map(|f| ((f * (center + 1) as f64) as u32).min(center));
        let below_row = below_frac
            .map(|f| center + ((f * (height - center) as f64) as u32).min(height - center - 1));

        let rows: Vec<u32> = above_row.into_iter().chain(below_row).collect();
        let downsampled = injected_bitmap(width, height, &rows);

        // 注入行恰好落在中线时，两个方向都会命中它
        let above = i64::from(rows.iter().copied().filter(|&r| r <= center).max().unwrap_or(0));
        let below = i64::from(rows.iter().copied().filter(|&r| r >= center).min().unwrap_or(height));
        let expected_top = (above + 1) * 2;
        let expected_height = 2 * (below - (above + 1));

        let result = plan_from_downsampled(&downsampled, width * 4, height * 4);
        if expected_height > 0 {
            let plan = result.expect("plan should succeed");
            prop_assert_eq!(i64::from(plan.rect.y), expected_top);
            prop_assert_eq!(i64::from(plan.rect.height), expected_height);
            prop_assert_eq!(plan.rect.width, width * 4);
        } else {
            prop_assert!(result.unwrap_err().is_degenerate());
        }
    }

    #[test]
    fn rows_just_below_ratio_never_qualify(width in 20u32..200) {
        let threshold = (f64::from(width) * 0.95) as u32;
        let mut downsampled = filled(width, 9, DARK);
        for x in 0..threshold {
            downsampled.set(x, 6, RgbaPixel::WHITE);
        }

        let plan = plan_from_downsampled(&downsampled, width * 4, 36).expect("plan");
        prop_assert_eq!(plan.boundaries.below, 9);
    }
}
