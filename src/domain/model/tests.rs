// Unit tests for domain models

use super::*;
use serde_json::json;

fn file_info(name: &str, ext: &str) -> MediaFileInfo {
    MediaFileInfo::new(name.to_string(), name.to_string(), ext.to_string())
}

fn video_track(width: u32, height: u32) -> VideoTrackInfo {
    VideoTrackInfo {
        av: AvTrackInfo {
            track: MediaTrackInfo {
                format: "AVC".to_string(),
                stream_size: Some(1_000),
            },
            codec_id: None,
            duration: 9_000,
            bit_rate: 800_000,
        },
        format_profile: Some("High".to_string()),
        format_settings: None,
        width,
        height,
        bit_depth: Some(8),
        frame_count: 270,
        frame_rate: Decimal::new(29970, 3),
        frame_rate_mode: Some("CFR".to_string()),
        color_space: Some("YUV".to_string()),
        chroma_subsampling: Some("4:2:0".to_string()),
        bits_per_pixel_frame: Decimal::new(125, 3),
        writing_library: None,
        rotation: None,
    }
}

fn video_record(duration_ms: i64) -> FileInfoRecord {
    FileInfoRecord::Video(VideoFileInfo {
        file: file_info("clip.mp4", ".mp4"),
        general: AvFileGeneralInfo {
            general: MediaFileGeneralInfo {
                container: "MPEG-4".to_string(),
                file_size: 4_096,
                writing_application: None,
                internet_media_type: Some("video/mp4".to_string()),
            },
            duration: duration_ms,
            overall_bit_rate: 900_000,
        },
        video: vec![video_track(1920, 1080)],
        audio: None,
    })
}

fn pdf_record(pages: u32) -> FileInfoRecord {
    FileInfoRecord::Pdf(PdfFileInfo {
        file: file_info("report.pdf", ".pdf"),
        general: MediaFileGeneralInfo {
            container: "PDF".to_string(),
            file_size: 2_048,
            writing_application: None,
            internet_media_type: Some("application/pdf".to_string()),
        },
        document: DocumentInfo {
            pages,
            author: Some("Alice".to_string()),
            creator: None,
            producer: None,
            subject: None,
            title: Some("1.5".to_string()),
            creation_date: Some("D:20200101000000Z".to_string()),
            modification_date: None,
        },
    })
}

#[test]
fn test_video_duration_rounds_up_to_whole_seconds() {
    assert_eq!(video_record(9_000).duration(), 9);
    assert_eq!(video_record(9_001).duration(), 10);
    assert_eq!(video_record(0).duration(), 0);
}

#[test]
fn test_document_duration_is_negative_page_count() {
    assert_eq!(pdf_record(10).duration(), -10);
}

#[test]
fn test_image_and_generic_duration_is_minus_one() {
    let image = FileInfoRecord::Image(ImageFileInfo {
        file: file_info("a.png", ".png"),
        general: MediaFileGeneralInfo {
            container: "PNG".to_string(),
            file_size: 10,
            writing_application: None,
            internet_media_type: None,
        },
        image: vec![ImageTrackInfo {
            track: MediaTrackInfo {
                format: "PNG".to_string(),
                stream_size: None,
            },
            format_profile: None,
            width: 64,
            height: 32,
            bit_depth: Some(8),
            color_space: Some("RGB".to_string()),
            chroma_subsampling: None,
        }],
    });
    assert_eq!(image.duration(), -1);
    assert_eq!(image.width(), Some(64));
    assert_eq!(image.height(), Some(32));

    let generic = FileInfoRecord::Generic(file_info("notes.txt", ".txt"));
    assert_eq!(generic.duration(), -1);
    assert_eq!(generic.width(), None);
}

#[test]
fn test_visual_accessors_use_first_track() {
    let record = video_record(1_000);
    assert_eq!(record.width(), Some(1920));
    assert_eq!(record.height(), Some(1080));
    assert_eq!(pdf_record(1).width(), None);
    assert_eq!(pdf_record(1).height(), None);
}

#[test]
fn test_as_dict_omits_absent_fields_at_every_depth() {
    let dict = video_record(9_000).as_dict().unwrap();
    assert!(dict.get("audio").is_none());
    assert!(dict["general"].get("writing_application").is_none());
    let track = &dict["video"][0];
    assert!(track.get("codec_id").is_none());
    assert!(track.get("rotation").is_none());
    assert_eq!(track["format"], json!("AVC"));
    assert_eq!(track["frame_rate"], json!("29.970"));
}

#[test]
fn test_as_dict_flattens_file_identity_first() {
    let dict = pdf_record(3).as_dict().unwrap();
    let keys: Vec<&str> = dict
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec!["filename", "original_filename", "ext", "general", "document"]
    );
    assert_eq!(dict["document"]["title"], json!("1.5"));
}

#[test]
fn test_as_json_is_deterministic() {
    let first = video_record(12_345).as_json().unwrap();
    let second = video_record(12_345).as_json().unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("{\n  \"filename\": \"clip.mp4\""));
    assert!(!first.contains("null"));
}

#[test]
fn test_general_info_requires_mime_outside_images() {
    let fields = RawFields::from_pairs([("container", json!("PNG")), ("file_size", json!(5))]);
    let image_general = MediaFileGeneralInfo::from_image_fields(&fields).unwrap();
    assert_eq!(image_general.internet_media_type, None);
    assert!(MediaFileGeneralInfo::from_fields(&fields).is_err());
}

#[test]
fn test_video_track_from_fields_coerces_values() {
    let fields = RawFields::from_pairs([
        ("format", json!("AVC")),
        ("duration", json!("9000.7")),
        ("bit_rate", json!("800000")),
        ("width", json!(1920)),
        ("height", json!("1080")),
        ("frame_count", json!(270)),
        ("frame_rate", json!("29.970")),
        ("bits_per_pixel_frame", json!(0.125)),
        ("rotation", json!("90.000")),
    ]);
    let track = VideoTrackInfo::from_fields(&fields).unwrap();
    assert_eq!(track.av.duration, 9000);
    assert_eq!(track.height, 1080);
    assert_eq!(track.frame_rate.to_string(), "29.970");
    assert_eq!(track.bits_per_pixel_frame, Decimal::new(125, 3));
    assert_eq!(track.rotation, Some(Decimal::new(90000, 3)));
    assert_eq!(track.av.codec_id, None);
}

#[test]
fn test_audio_track_requires_channels() {
    let fields = RawFields::from_pairs([
        ("format", json!("AAC")),
        ("duration", json!(1000)),
        ("bit_rate", json!(128000)),
        ("sampling_rate", json!(48000)),
    ]);
    match AudioTrackInfo::from_fields(&fields).unwrap_err() {
        crate::error::MediaMetaError::SchemaValidation { field, .. } => {
            assert_eq!(field, "channels")
        }
        other => panic!("unexpected error: {other}"),
    }
}
