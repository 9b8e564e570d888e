//! Runs the whole reframing pipeline with the real `image` backend on small
//! synthetic photos in a temp folder.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use meuralize::config::MeuralConfig;
use meuralize::governor::SizeBudget;
use meuralize::imaging::Dimensions;
use meuralize::output;
use meuralize::process::{self, FileStatus, ProcessEvent};
use std::path::Path;
use tempfile::TempDir;

fn write_photo(path: &Path, width: u32, height: u32, format: ImageFormat) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
        .save_with_format(path, format)
        .unwrap();
}

fn run(folder: &Path, config: &MeuralConfig) -> (process::BatchReport, Vec<String>) {
    let mut lines = Vec::new();
    let report = process::process(folder, config, |event: ProcessEvent| {
        lines.extend(output::format_process_event(&event))
    })
    .unwrap();
    (report, lines)
}

#[test]
fn landscape_4_3_becomes_1920x1080() {
    let tmp = TempDir::new().unwrap();
    write_photo(&tmp.path().join("beach.jpg"), 800, 600, ImageFormat::Jpeg);

    let (report, lines) = run(tmp.path(), &MeuralConfig::default());

    let output = tmp.path().join("beach-meural.jpg");
    assert_eq!(image::image_dimensions(&output).unwrap(), (1920, 1080));
    assert_eq!(report.count(FileStatus::Saved), 1);
    assert!(lines.contains(&"  → Creating Meural version (aspect ratio: 1.33)".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("  ✓ Saved: beach-meural.jpg (")));
    assert_eq!(lines.last().unwrap(), "Processing complete!");
}

#[test]
fn foreground_pixels_are_preserved_in_the_center() {
    let tmp = TempDir::new().unwrap();
    let img = RgbImage::from_pixel(1080, 1080, Rgb([250, 10, 10]));
    DynamicImage::ImageRgb8(img)
        .save_with_format(tmp.path().join("red.png"), ImageFormat::Png)
        .unwrap();

    run(tmp.path(), &MeuralConfig::default());

    let out = image::open(tmp.path().join("red-meural.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(out.dimensions(), (1920, 1080));
    // Foreground spans x 420..1500 unscaled; PNG is lossless
    assert_eq!(out.get_pixel(960, 540), &Rgb([250, 10, 10]));
    assert_eq!(out.get_pixel(420, 0), &Rgb([250, 10, 10]));
    // The muted backdrop is darker than the source
    assert!(out.get_pixel(10, 540)[0] < 250);
}

#[test]
fn sixteen_by_nine_is_skipped() {
    let tmp = TempDir::new().unwrap();
    write_photo(&tmp.path().join("hd.png"), 320, 180, ImageFormat::Png);

    let (report, lines) = run(tmp.path(), &MeuralConfig::default());

    assert_eq!(report.count(FileStatus::Skipped), 1);
    assert!(!tmp.path().join("hd-meural.png").exists());
    assert!(lines.contains(&"  ✓ Already 16:9 aspect ratio, skipping".to_string()));
}

#[test]
fn corrupt_file_does_not_stop_the_batch() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("a-broken.jpg"), b"definitely not a jpeg").unwrap();
    write_photo(&tmp.path().join("b-tall.jpg"), 300, 600, ImageFormat::Jpeg);

    let (report, lines) = run(tmp.path(), &MeuralConfig::default());

    let statuses: Vec<FileStatus> = report.files.iter().map(|f| f.status).collect();
    assert_eq!(statuses, vec![FileStatus::Failed, FileStatus::Saved]);
    assert!(lines.iter().any(|l| l.starts_with("  ✗ Error processing a-broken.jpg: ")));
    assert!(!tmp.path().join("a-broken-meural.jpg").exists());
    assert_eq!(
        image::image_dimensions(tmp.path().join("b-tall-meural.jpg")).unwrap(),
        (1920, 1080)
    );
}

#[test]
fn rerun_skips_previous_outputs() {
    let tmp = TempDir::new().unwrap();
    write_photo(&tmp.path().join("pic.jpg"), 400, 400, ImageFormat::Jpeg);

    run(tmp.path(), &MeuralConfig::default());
    let (report, _) = run(tmp.path(), &MeuralConfig::default());

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.count(FileStatus::Skipped), 1);
    assert!(!tmp.path().join("pic-meural-meural.jpg").exists());
}

#[test]
fn tight_budget_runs_the_governor() {
    let tmp = TempDir::new().unwrap();
    write_photo(&tmp.path().join("noisy.jpg"), 1000, 1000, ImageFormat::Jpeg);
    let config = MeuralConfig {
        budget: SizeBudget {
            max_bytes: 20_000,
            floor: Dimensions::new(1920, 1080),
        },
        ..MeuralConfig::default()
    };

    let (report, lines) = run(tmp.path(), &config);

    let file = &report.files[0];
    assert_eq!(file.status, FileStatus::Saved);
    let on_disk = std::fs::metadata(tmp.path().join("noisy-meural.jpg"))
        .unwrap()
        .len();
    assert_eq!(Some(on_disk), file.final_bytes);
    let initial = file.initial_bytes.unwrap();
    assert!(initial > 20_000, "first write was {initial} bytes");
    assert!(on_disk < initial, "{on_disk} not below {initial}");
    assert!(lines.iter().any(|l| l.contains("exceeds limit, optimizing...")));

    let reduced = lines.iter().any(|l| l.starts_with("    → Reduced to "));
    let warned = lines.iter().any(|l| l.starts_with("    → Warning: Could not reduce"));
    assert!(reduced != warned);
    assert_eq!(file.within_budget, Some(reduced));
    assert_eq!(reduced, on_disk <= 20_000);
}

#[test]
fn missing_folder_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = process::process(&tmp.path().join("nope"), &MeuralConfig::default(), |_| {});
    assert!(result.is_err());
}

#[test]
fn report_json_lists_every_file() {
    let tmp = TempDir::new().unwrap();
    write_photo(&tmp.path().join("one.png"), 100, 50, ImageFormat::Png);
    write_photo(&tmp.path().join("two.png"), 160, 90, ImageFormat::Png);

    let (report, _) = run(tmp.path(), &MeuralConfig::default());
    let json = serde_json::to_value(&report).unwrap();
    let statuses: Vec<&str> = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["saved", "skipped"]);
}
