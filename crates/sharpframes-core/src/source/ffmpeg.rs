use std::path::{Path, PathBuf};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    decoder,
    format::{self, Pixel},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    Packet, Rational,
};
use ndarray::Array3;
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SharpFramesError};
use crate::frame::{ColorMode, Frame, SourceInfo};

use super::FrameSource;

/// Frame source over any container ffmpeg can demux.
///
/// Seeking jumps to the nearest keyframe and decodes forward to the target.
/// Skipping decodes without the RGB conversion, which is the cheapest advance
/// an inter-frame codec allows.
pub struct FfmpegSource {
    input: format::context::Input,
    decoder: decoder::Video,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: Rational,
    start_pts: i64,
    frames_per_second: f64,
    frame_count: Option<usize>,
    width: u32,
    height: u32,
    path: PathBuf,
    position: usize,
    eof_sent: bool,
    // Set by `seek` until the first picture at the cursor arrives.
    after_seek: bool,
}

impl FfmpegSource {
    pub fn open(path: &Path) -> Result<Self> {
        ffmpeg_next::init()?;
        let input = format::input(&path).map_err(|_| SharpFramesError::SourceNotFound {
            path: path.to_path_buf(),
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| SharpFramesError::Decode("No video stream".into()))?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        let start_pts = match stream.start_time() {
            i64::MIN => 0,
            t => t,
        };

        let rate = stream.avg_frame_rate();
        let frames_per_second = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let frame_count = if stream.frames() > 0 {
            Some(stream.frames() as usize)
        } else if frames_per_second > 0.0 && input.duration() > 0 {
            Some((input.duration() as f64 / 1_000_000.0 * frames_per_second) as usize)
        } else {
            None
        };

        let decoder = CodecContext::from_parameters(stream.parameters())?
            .decoder()
            .video()?;
        let width = decoder.width();
        let height = decoder.height();
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        debug!(
            stream = stream_index,
            fps = frames_per_second,
            frames = ?frame_count,
            "Opened ffmpeg video stream"
        );

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base,
            start_pts,
            frames_per_second,
            frame_count,
            width,
            height,
            path: path.to_path_buf(),
            position: 0,
            eof_sent: false,
            after_seek: false,
        })
    }

    fn next_packet(&mut self) -> Option<Packet> {
        let stream_index = self.stream_index;
        for (stream, packet) in self.input.packets() {
            if stream.index() == stream_index {
                return Some(packet);
            }
        }
        None
    }

    /// Pull the next decoded picture, feeding packets as needed.
    fn next_picture(&mut self) -> Result<Option<VideoFrame>> {
        loop {
            let mut picture = VideoFrame::empty();
            if self.decoder.receive_frame(&mut picture).is_ok() {
                return Ok(Some(picture));
            }
            if self.eof_sent {
                return Ok(None);
            }
            match self.next_packet() {
                Some(packet) => self.decoder.send_packet(&packet)?,
                None => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
            }
        }
    }

    fn pts_seconds(&self, picture: &VideoFrame) -> Option<f64> {
        let pts = picture.timestamp().or(picture.pts())?;
        Some(
            (pts - self.start_pts) as f64 * self.time_base.numerator() as f64
                / self.time_base.denominator() as f64,
        )
    }

    fn pts_index(&self, picture: &VideoFrame) -> Option<usize> {
        if self.frames_per_second <= 0.0 {
            return None;
        }
        let seconds = self.pts_seconds(picture)?;
        Some((seconds * self.frames_per_second).round().max(0.0) as usize)
    }

    /// Next picture at or after the cursor. Right after a seek, pictures
    /// before the cursor are keyframe pre-roll and are dropped; sequential
    /// decode passes every picture through.
    fn next_at_cursor(&mut self) -> Result<Option<VideoFrame>> {
        while let Some(picture) = self.next_picture()? {
            let index = self.pts_index(&picture);
            if is_preroll(self.after_seek, index, self.position) {
                continue;
            }
            self.after_seek = false;
            return Ok(Some(picture));
        }
        Ok(None)
    }

    fn convert(&mut self, picture: &VideoFrame) -> Result<Frame> {
        let mut rgb = VideoFrame::empty();
        self.scaler.run(picture, &mut rgb)?;

        let w = self.width as usize;
        let h = self.height as usize;
        let stride = rgb.stride(0);
        let row_bytes = w * COLOR_CHANNEL_COUNT;
        let plane = rgb.data(0);

        let mut values = Vec::with_capacity(row_bytes * h);
        for row in 0..h {
            let start = row * stride;
            values.extend(plane[start..start + row_bytes].iter().map(|&b| b as f32 / 255.0));
        }
        let data = Array3::from_shape_vec((h, w, COLOR_CHANNEL_COUNT), values)
            .map_err(|e| SharpFramesError::Decode(format!("RGB buffer shape: {e}")))?;

        let mut frame = Frame::new(data, 8).with_index(self.position);
        frame.metadata.timestamp_us = self
            .pts_seconds(picture)
            .map(|s| (s.max(0.0) * 1_000_000.0) as u64);
        Ok(frame)
    }
}

impl FrameSource for FfmpegSource {
    fn frame_count(&self) -> Option<usize> {
        self.frame_count
    }

    fn position(&self) -> usize {
        self.position
    }

    fn seek(&mut self, index: usize) -> Result<()> {
        if index == self.position {
            return Ok(());
        }
        if self.frames_per_second <= 0.0 {
            return Err(SharpFramesError::Decode(
                "Cannot seek a stream without a frame rate".into(),
            ));
        }
        // Container-level seek takes microseconds.
        let target = (index as f64 / self.frames_per_second * 1_000_000.0) as i64;
        self.input.seek(target, ..target)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.after_seek = true;
        self.position = index;
        Ok(())
    }

    fn decode_next(&mut self) -> Result<Option<Frame>> {
        let Some(picture) = self.next_at_cursor()? else {
            return Ok(None);
        };
        let frame = self.convert(&picture)?;
        self.position += 1;
        Ok(Some(frame))
    }

    fn skip(&mut self, count: usize) -> Result<usize> {
        let mut skipped = 0;
        while skipped < count {
            if self.next_at_cursor()?.is_none() {
                break;
            }
            self.position += 1;
            skipped += 1;
        }
        Ok(skipped)
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            filename: self.path.clone(),
            total_frames: self.frame_count,
            width: self.width,
            height: self.height,
            bit_depth: 8,
            color_mode: ColorMode::RGB,
            frames_per_second: (self.frames_per_second > 0.0).then_some(self.frames_per_second),
            observer: None,
            telescope: None,
            instrument: None,
        }
    }
}

fn is_preroll(after_seek: bool, picture_index: Option<usize>, position: usize) -> bool {
    after_seek && picture_index.is_some_and(|index| index < position)
}
