// Unit tests for thumbnail dispatch

use super::*;
use crate::source::NamedHandle;
use crate::test_support::{capture_logs, fake_backends, png_bytes, FakeFrames};
use std::io::Cursor;

fn service() -> ThumbnailService {
    ThumbnailService::new(
        &ExtensionSettings::default(),
        &ThumbnailSettings::default(),
        &fake_backends(),
    )
}

fn request(size: ThumbnailSize, background: Option<Background>) -> ThumbnailRequest<'static> {
    ThumbnailRequest {
        size,
        background,
        ..ThumbnailRequest::default()
    }
}

#[test]
fn test_thumbnail_filename() {
    assert_eq!(
        thumbnail_filename("media/test.mp4", ThumbnailSize::Square(256), "jpg"),
        "test_mp4_thumb_256.jpg"
    );
    assert_eq!(
        thumbnail_filename("scan.PDF", ThumbnailSize::Box(320, 180), "png"),
        "scan_PDF_thumb_320x180.png"
    );
    assert_eq!(
        thumbnail_filename("README", ThumbnailSize::Square(64), "jpg"),
        "README_thumb_64.jpg"
    );
}

#[test]
fn test_output_format_follows_background_alpha() {
    assert_eq!(output_format(None), "jpg");
    assert_eq!(output_format(Some(Background::rgb(1, 2, 3))), "jpg");
    assert_eq!(output_format(Some(Background::rgba(1, 2, 3, 255))), "jpg");
    assert_eq!(output_format(Some(Background::rgba(255, 255, 255, 200))), "png");
}

#[test]
fn test_video_thumbnail_fits_without_background() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = NamedHandle::new(Cursor::new(vec![0u8; 16]), "clip.mp4");
    let output = service()
        .generate_thumbnail(
            MediaSource::Handle(&mut handle),
            dir.path(),
            &request(ThumbnailSize::Square(128), None),
        )
        .unwrap()
        .unwrap();

    assert_eq!(output.size, (128, 128));
    assert_eq!(output.path, dir.path().join("clip_mp4_thumb_128.jpg"));
    // The frame at 2.0s is the first past 10% of 10s; it is 642x360
    let (width, height) = ::image::image_dimensions(&output.path).unwrap();
    assert_eq!((width, height), (128, 72));
}

#[test]
fn test_video_without_late_key_frame_is_fatal() {
    let mut backends = fake_backends();
    backends.frames = Arc::new(FakeFrames {
        duration_micros: 60_000_000,
        times: vec![0.0, 5.0, 6.0],
        size: (320, 240),
    });
    let service = ThumbnailService::new(
        &ExtensionSettings::default(),
        &ThumbnailSettings::default(),
        &backends,
    );
    let dir = tempfile::tempdir().unwrap();
    let mut handle = NamedHandle::new(Cursor::new(Vec::new()), "long.mkv");
    let err = service
        .generate_thumbnail(
            MediaSource::Handle(&mut handle),
            dir.path(),
            &request(ThumbnailSize::Square(64), None),
        )
        .unwrap_err();
    assert!(matches!(err, MediaMetaError::ThumbnailExtraction { .. }));
}

#[test]
fn test_translucent_background_writes_exact_png_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = NamedHandle::new(Cursor::new(png_bytes(400, 100)), "wide.png");
    let output = service()
        .generate_thumbnail(
            MediaSource::Handle(&mut handle),
            dir.path(),
            &request(
                ThumbnailSize::Square(200),
                Some(Background::rgba(255, 255, 255, 200)),
            ),
        )
        .unwrap()
        .unwrap();

    assert_eq!(output.path, dir.path().join("wide_png_thumb_200.png"));
    let canvas = ::image::open(&output.path).unwrap().to_rgba8();
    assert_eq!(canvas.dimensions(), (200, 200));
    // 400x100 fits as 200x50, pasted at (0, 75)
    assert_eq!(canvas.get_pixel(100, 10).0, [255, 255, 255, 200]);
    assert_eq!(canvas.get_pixel(100, 100).0, [200, 30, 30, 255]);
    assert_eq!(canvas.get_pixel(100, 190).0, [255, 255, 255, 200]);
}

#[test]
fn test_document_thumbnail_uses_first_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = NamedHandle::new(Cursor::new(Vec::new()), "report.pdf");
    let output = service()
        .generate_thumbnail(
            MediaSource::Handle(&mut handle),
            dir.path(),
            &request(ThumbnailSize::Box(170, 170), Some(Background::rgb(0, 0, 0))),
        )
        .unwrap()
        .unwrap();
    assert_eq!(output.path, dir.path().join("report_pdf_thumb_170x170.jpg"));
    assert_eq!(::image::image_dimensions(&output.path).unwrap(), (170, 170));
}

#[test]
fn test_unmapped_extension_warns_and_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("thumbs");
    let mut handle = NamedHandle::new(Cursor::new(Vec::new()), "notes.txt");

    let (result, logs) = capture_logs(|| {
        service().generate_thumbnail(
            MediaSource::Handle(&mut handle),
            &out,
            &request(ThumbnailSize::Square(128), None),
        )
    });
    assert_eq!(result.unwrap(), None);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("Generator for extension .txt not installed"));
    assert!(out.is_dir());
}

#[test]
fn test_explicit_output_filename_and_handle_name_override() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = NamedHandle::new(Cursor::new(png_bytes(10, 10)), "blob");
    let request = ThumbnailRequest {
        filename: Some("upload/avatar.png"),
        size: ThumbnailSize::Square(64),
        output_filename: Some("custom.jpg"),
        background: None,
    };
    let output = service()
        .generate_thumbnail(MediaSource::Handle(&mut handle), dir.path(), &request)
        .unwrap()
        .unwrap();
    assert_eq!(output.path, dir.path().join("custom.jpg"));
    assert_eq!(::image::image_dimensions(&output.path).unwrap(), (10, 10));
}

#[test]
fn test_batch_runs_every_size_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = ThumbnailSettings::default();
    settings.sizes = vec![ThumbnailSize::Square(32), ThumbnailSize::Box(48, 16)];
    let service = ThumbnailService::new(&ExtensionSettings::default(), &settings, &fake_backends());
    let mut handle = NamedHandle::new(Cursor::new(png_bytes(96, 96)), "square.png");

    let results = service.generate_thumbnails(MediaSource::Handle(&mut handle), dir.path(), None, None);
    assert_eq!(results.len(), 2);

    let first = results[0].as_ref().unwrap().as_ref().unwrap();
    assert_eq!(first.size, (32, 32));
    assert_eq!(first.path, dir.path().join("square_png_thumb_32.jpg"));

    let second = results[1].as_ref().unwrap().as_ref().unwrap();
    assert_eq!(second.size, (48, 16));
    assert_eq!(second.path, dir.path().join("square_png_thumb_48x16.jpg"));
    assert_eq!(::image::image_dimensions(&second.path).unwrap(), (16, 16));
}

#[test]
fn test_batch_reports_each_failure_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = NamedHandle::new(Cursor::new(b"not a png".to_vec()), "broken.png");

    let (results, logs) = capture_logs(|| {
        service().generate_thumbnails(MediaSource::Handle(&mut handle), dir.path(), None, None)
    });
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_err()));
    assert_eq!(logs.matches("Thumbnail generation failed").count(), 3);
}
