//! Integration tests for image ingestion (composer-renderer).
//!
//! Covers batches mixing good and bad files, both append orders, uploads read
//! from disk, and the fit invariants.

use composer_core::{IdSequence, ImageDefaults, ImageRecord, IngestOrder};
use composer_renderer::image::fit_within;
use composer_renderer::{ImageService, IngestError, UploadedFile};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Encode a solid PNG of the given size.
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

fn png_upload(name: &str, width: u32, height: u32) -> UploadedFile {
    UploadedFile::from_bytes(name, "image/png", png_bytes(width, height))
}

fn service_with_order(order: IngestOrder) -> ImageService {
    ImageService::with_sequence(
        IdSequence::new(),
        ImageDefaults {
            order,
            ..ImageDefaults::default()
        },
    )
}

// ==========================================================================
// Batch behaviour
// ==========================================================================

#[tokio::test]
async fn test_batch_appends_one_record_per_decoded_file() {
    init_tracing();
    let service = ImageService::new();
    let mut images: Vec<ImageRecord> = Vec::new();

    let files = vec![
        png_upload("a.png", 10, 10),
        UploadedFile::from_bytes("broken.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47, 1, 2]),
        png_upload("b.png", 20, 20),
        UploadedFile::from_bytes("readme.txt", "text/plain", b"not an image".to_vec()),
    ];

    let outcomes = service.process_uploaded_files(files, &mut images).await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 2);
    assert_eq!(images.len(), 2);

    let failed: Vec<_> = outcomes
        .iter()
        .filter(|o| !o.is_ok())
        .map(|o| o.file_name.as_str())
        .collect();
    assert_eq!(failed, ["broken.png", "readme.txt"]);
    assert!(outcomes
        .iter()
        .filter(|o| !o.is_ok())
        .all(|o| matches!(o.result, Err(IngestError::Decode(_)))));
}

#[tokio::test]
async fn test_input_order_is_preserved() {
    init_tracing();
    let service = service_with_order(IngestOrder::Input);
    let mut images = Vec::new();

    // The large file takes longest to decode but must still come first.
    let files = vec![
        png_upload("large.png", 1200, 900),
        png_upload("small.png", 4, 4),
        png_upload("medium.png", 200, 150),
    ];

    let outcomes = service.process_uploaded_files(files, &mut images).await;

    let names: Vec<_> = images.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, ["large.png", "small.png", "medium.png"]);
    let ids: Vec<_> = images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["image-1", "image-2", "image-3"]);
    let outcome_names: Vec<_> = outcomes.iter().map(|o| o.file_name.as_str()).collect();
    assert_eq!(outcome_names, names);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_completion_order_keeps_every_record() {
    init_tracing();
    let service = service_with_order(IngestOrder::Completion);
    let mut images = Vec::new();

    let files = vec![
        png_upload("one.png", 800, 600),
        png_upload("two.png", 2, 2),
        png_upload("three.png", 50, 50),
    ];

    let outcomes = service.process_uploaded_files(files, &mut images).await;
    assert!(outcomes.iter().all(|o| o.is_ok()));

    let mut names: Vec<_> = images.iter().map(|i| i.file_name.clone()).collect();
    names.sort();
    assert_eq!(names, ["one.png", "three.png", "two.png"]);

    // Ids follow append order whatever order files finished in.
    let ids: Vec<_> = images.iter().map(|i| i.id.to_string()).collect();
    assert_eq!(ids, ["image-1", "image-2", "image-3"]);

    // Outcomes and records agree on the order.
    for (outcome, record) in outcomes.iter().zip(&images) {
        assert_eq!(outcome.file_name, record.file_name);
        assert_eq!(outcome.result.as_ref().ok(), Some(&record.id));
    }
}

#[tokio::test]
async fn test_empty_batch() {
    let service = ImageService::new();
    let mut images = Vec::new();
    let outcomes = service.process_uploaded_files(Vec::new(), &mut images).await;
    assert!(outcomes.is_empty());
    assert!(images.is_empty());
}

#[tokio::test]
async fn test_batch_appends_after_existing_records() {
    let service = ImageService::new();
    let mut images = Vec::new();

    service
        .process_uploaded_files(vec![png_upload("first.png", 5, 5)], &mut images)
        .await;
    service
        .process_uploaded_files(vec![png_upload("second.png", 5, 5)], &mut images)
        .await;

    let ids: Vec<_> = images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["image-1", "image-2"]);
}

// ==========================================================================
// Scenario: 600x400 upload
// ==========================================================================

#[tokio::test]
async fn test_600x400_scales_to_box() {
    let service = ImageService::new();
    let mut images = Vec::new();

    service
        .process_uploaded_files(vec![png_upload("wide.png", 600, 400)], &mut images)
        .await;

    let img = &images[0];
    assert!((img.width - 300.0).abs() < 1e-3);
    assert!((img.height - 200.0).abs() < 1e-3);
    assert!((img.width / 600.0 - 0.5).abs() < 1e-6);
    assert!((img.height / 400.0 - 0.5).abs() < 1e-6);
    assert_eq!(img.original_width, 600);
    assert_eq!(img.original_height, 400);
}

// ==========================================================================
// Disk-backed uploads
// ==========================================================================

#[tokio::test]
async fn test_upload_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("photo.png");
    std::fs::write(&path, png_bytes(400, 100))?;

    let service = ImageService::new();
    let mut images = Vec::new();
    let outcomes = service
        .process_uploaded_files(
            vec![
                UploadedFile::from_path(&path),
                UploadedFile::from_path(dir.path().join("missing.png")),
            ],
            &mut images,
        )
        .await;

    assert!(outcomes[0].is_ok());
    assert!(matches!(outcomes[1].result, Err(IngestError::Read(_))));
    assert_eq!(images.len(), 1);

    let img = &images[0];
    assert_eq!(img.file_name, "photo.png");
    assert!(img.preview_uri.starts_with("data:image/png;base64,"));
    assert!((img.width - 300.0).abs() < 1e-3);
    assert!((img.height - 75.0).abs() < 1e-3);
    Ok(())
}

// ==========================================================================
// Fit invariants
// ==========================================================================

proptest! {
    #[test]
    fn prop_oversized_images_fit_and_keep_aspect(w in 1u32..5000, h in 1u32..5000) {
        prop_assume!(w > 300 || h > 200);
        let (fw, fh) = fit_within(w, h, 300.0, 200.0);

        prop_assert!(fw <= 300.0 + 1e-3);
        prop_assert!(fh <= 200.0 + 1e-3);

        let original = f64::from(w) / f64::from(h);
        let fitted = f64::from(fw) / f64::from(fh);
        prop_assert!((original - fitted).abs() / original < 1e-4);
    }

    #[test]
    fn prop_small_images_unchanged(w in 0u32..=300, h in 0u32..=200) {
        let (fw, fh) = fit_within(w, h, 300.0, 200.0);
        prop_assert_eq!(fw, w as f32);
        prop_assert_eq!(fh, h as f32);
    }
}
