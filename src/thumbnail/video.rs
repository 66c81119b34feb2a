// Video thumbnails - First key frame past a tenth of the duration

use std::sync::Arc;

use ::image::DynamicImage;
use tracing::debug;

use super::ThumbnailGenerator;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::VideoFramePort;
use crate::source::OpenMedia;

/// Fraction of the duration a representative frame must come after
const FRAME_POSITION: f64 = 0.1;

pub struct VideoThumbnailGenerator {
    frames: Arc<dyn VideoFramePort>,
}

impl VideoThumbnailGenerator {
    pub fn new(frames: Arc<dyn VideoFramePort>) -> Self {
        Self { frames }
    }
}

impl ThumbnailGenerator for VideoThumbnailGenerator {
    fn family(&self) -> &'static str {
        "video"
    }

    /// Key frames are decoded from the start of the stream; the first one whose
    /// time is strictly after the threshold wins. Running out of frames is fatal.
    fn representative_image(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage> {
        let mut reader = self.frames.open_keyframes(media)?;
        let duration = reader.duration_micros() as f64 * 1e-6;
        let threshold = duration * FRAME_POSITION;

        while let Some(frame) = reader.next_frame()? {
            if frame.time_secs > threshold {
                debug!(time = frame.time_secs, threshold, "Selected key frame");
                return Ok(frame.image);
            }
        }

        Err(MediaMetaError::ThumbnailExtraction {
            message: format!(
                "No key frame after {:.3}s in a {:.3}s stream",
                threshold, duration
            ),
        })
    }
}
