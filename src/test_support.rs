// Test support - Fake collaborators and log capture

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use crate::adapters::ProbeImageAdapter;
use crate::app::Backends;
use crate::domain::rules::RawFields;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::{
    DecodedFrame, DocumentPort, KeyframeReader, ProbePort, ProbeReport, VideoFramePort,
};
use crate::source::{NamedHandle, OpenMedia};

pub fn fields(value: Value) -> RawFields {
    match value {
        Value::Object(map) => RawFields::from(map),
        _ => panic!("fixture must be an object"),
    }
}

pub fn empty_handle(name: &str) -> NamedHandle<Cursor<Vec<u8>>> {
    NamedHandle::new(Cursor::new(Vec::new()), name)
}

pub fn solid_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    solid_image(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Probe returning a canned report
pub struct FakeProbe {
    report: ProbeReport,
}

impl FakeProbe {
    pub fn new(report: ProbeReport) -> Self {
        Self { report }
    }
}

impl ProbePort for FakeProbe {
    fn probe(&self, _media: &mut OpenMedia<'_>) -> MediaMetaResult<ProbeReport> {
        Ok(self.report.clone())
    }
}

/// Spools the media like a path-only backend, remembering what it was handed.
///
/// The MIME type is guessed from the spooled file, so a copy named without the
/// dispatch extension yields a report that fails validation.
#[derive(Default)]
pub struct RecordingProbe {
    pub seen: Mutex<Vec<(Option<String>, String)>>,
}

impl ProbePort for RecordingProbe {
    fn probe(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<ProbeReport> {
        let local = media.local_file()?;
        let path = local.path().to_string_lossy().into_owned();
        self.seen.lock().unwrap().push((media.name(), path));

        let mut general = fields(serde_json::json!({
            "format": "MPEG-4",
            "file_size": media.size()?,
            "duration": 4000,
            "overall_bit_rate": 500000,
        }));
        general.insert_opt(
            "internet_media_type",
            mime_guess::from_path(local.path())
                .first()
                .map(|mime| mime.essence_str().to_string()),
        );
        let video = fields(serde_json::json!({
            "format": "AVC",
            "duration": 4000,
            "bit_rate": 450000,
            "width": 320,
            "height": 240,
            "frame_count": 100,
            "frame_rate": "25.000",
            "bits__pixel_frame": "0.234",
        }));
        Ok(ProbeReport {
            general: vec![general],
            video: vec![video],
            ..ProbeReport::default()
        })
    }
}

/// Document collaborator returning canned fields and a solid first page
pub struct FakeDocuments {
    fields: RawFields,
    page: (u32, u32),
}

impl FakeDocuments {
    pub fn new(fields: RawFields) -> Self {
        Self {
            fields,
            page: (850, 1100),
        }
    }
}

impl DocumentPort for FakeDocuments {
    fn read_document(&self, _media: &mut OpenMedia<'_>) -> MediaMetaResult<RawFields> {
        Ok(self.fields.clone())
    }

    fn render_first_page(&self, _media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage> {
        Ok(solid_image(self.page.0, self.page.1))
    }
}

/// Key frames at fixed times, each a solid image of the given size
pub struct FakeFrames {
    pub duration_micros: i64,
    pub times: Vec<f64>,
    pub size: (u32, u32),
}

struct FakeReader {
    duration_micros: i64,
    frames: std::vec::IntoIter<f64>,
    size: (u32, u32),
}

impl KeyframeReader for FakeReader {
    fn duration_micros(&self) -> i64 {
        self.duration_micros
    }

    fn next_frame(&mut self) -> MediaMetaResult<Option<DecodedFrame>> {
        Ok(self.frames.next().map(|time_secs| DecodedFrame {
            time_secs,
            // Width encodes the frame time so tests can tell frames apart
            image: solid_image(self.size.0 + time_secs as u32, self.size.1),
        }))
    }
}

impl VideoFramePort for FakeFrames {
    fn open_keyframes<'m>(
        &self,
        _media: &'m mut OpenMedia<'_>,
    ) -> MediaMetaResult<Box<dyn KeyframeReader + 'm>> {
        Ok(Box::new(FakeReader {
            duration_micros: self.duration_micros,
            frames: self.times.clone().into_iter(),
            size: self.size,
        }))
    }
}

/// Probe that always fails
pub struct FailingProbe;

impl ProbePort for FailingProbe {
    fn probe(&self, _media: &mut OpenMedia<'_>) -> MediaMetaResult<ProbeReport> {
        Err(MediaMetaError::Probe {
            message: "probe unavailable".to_string(),
        })
    }
}

/// Real image probing, fakes for everything that needs native libraries
pub fn fake_backends() -> Backends {
    Backends {
        av_probe: Arc::new(FailingProbe),
        image_probe: Arc::new(ProbeImageAdapter::new()),
        documents: Arc::new(FakeDocuments::new(fields(serde_json::json!({ "pages": 3 })))),
        frames: Arc::new(FakeFrames {
            duration_micros: 10_000_000,
            times: vec![0.0, 0.5, 2.0, 4.0],
            size: (640, 360),
        }),
    }
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(Arc::clone(&self.0))
    }
}

/// Run `f` with a scoped subscriber and return what it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
