// Frames LibAV adapter - Key-frame decoding using libav

use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::codec::discard::Discard;
use ffmpeg_next::codec::packet::{Flags as PacketFlags, Packet};
use ffmpeg_next::format::context::Input;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling::{context::Context as ScaleContext, flag::Flags};
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use ffmpeg_next::{codec, Rational};
use image::{DynamicImage, RgbImage};
use tracing::debug;

use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::{DecodedFrame, KeyframeReader, VideoFramePort};
use crate::source::{LocalFile, OpenMedia};

/// Decodes only key frames of the best video stream
pub struct LibavFrameAdapter;

impl LibavFrameAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LibavFrameAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoFramePort for LibavFrameAdapter {
    fn open_keyframes<'m>(
        &self,
        media: &'m mut OpenMedia<'_>,
    ) -> MediaMetaResult<Box<dyn KeyframeReader + 'm>> {
        let local = media.local_file()?;
        let input = ffmpeg_next::format::input(&local.path())?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| MediaMetaError::ThumbnailExtraction {
                message: "No video stream to decode".to_string(),
            })?;
        let stream_index = stream.index();
        let time_base = stream.time_base();

        let mut decoder = CodecContext::from_parameters(stream.parameters())?
            .decoder()
            .video()?;
        decoder.skip_frame(Discard::NonKey);

        debug!(
            stream = stream_index,
            duration_us = input.duration(),
            "Opened key-frame decoder"
        );

        Ok(Box::new(LibavKeyframeReader {
            input,
            decoder,
            scaler: None,
            stream_index,
            time_base,
            flushed: false,
            _local: local,
        }))
    }
}

struct LibavKeyframeReader {
    input: Input,
    decoder: codec::decoder::Video,
    scaler: Option<ScaleContext>,
    stream_index: usize,
    time_base: Rational,
    flushed: bool,
    // Keeps a spooled copy alive while the demuxer reads it
    _local: LocalFile,
}

impl LibavKeyframeReader {
    fn convert_frame(&mut self, frame: &VideoFrame) -> MediaMetaResult<DynamicImage> {
        let (width, height) = (frame.width(), frame.height());
        let stale = self.scaler.as_ref().map_or(true, |scaler| {
            scaler.input().width != width
                || scaler.input().height != height
                || scaler.input().format != frame.format()
        });
        if stale {
            self.scaler = Some(ScaleContext::get(
                frame.format(),
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                Flags::BILINEAR,
            )?);
        }
        let scaler = self.scaler.as_mut().ok_or_else(|| MediaMetaError::ThumbnailExtraction {
            message: "Scaler unavailable".to_string(),
        })?;

        let mut rgb = VideoFrame::empty();
        scaler.run(frame, &mut rgb)?;

        // Rows are padded to the frame stride
        let row = width as usize * 3;
        let stride = rgb.stride(0);
        let data = rgb.data(0);
        let mut pixels = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            pixels.extend_from_slice(&data[y * stride..y * stride + row]);
        }

        let image = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
            MediaMetaError::ThumbnailExtraction {
                message: format!("Decoded frame does not match {}x{}", width, height),
            }
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl KeyframeReader for LibavKeyframeReader {
    fn duration_micros(&self) -> i64 {
        self.input.duration()
    }

    fn next_frame(&mut self) -> MediaMetaResult<Option<DecodedFrame>> {
        loop {
            let mut decoded = VideoFrame::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let timestamp = decoded.timestamp().or(decoded.pts()).unwrap_or(0);
                let time_secs = timestamp as f64 * f64::from(self.time_base);
                let image = self.convert_frame(&decoded)?;
                return Ok(Some(DecodedFrame { time_secs, image }));
            }
            if self.flushed {
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index
                        && packet.flags().contains(PacketFlags::KEY)
                    {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(ffmpeg_next::Error::Eof) => {
                    self.decoder.send_eof()?;
                    self.flushed = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
