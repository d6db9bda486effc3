use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>, // Tightly packed RGBA
    pub width: u32,
    pub height: u32,
}

/// RGBA appsink used as the video element's `video-sink`.
pub struct FrameSink {
    appsink: gst_app::AppSink,
}

impl FrameSink {
    pub fn new() -> Self {
        let caps = gst_video::VideoCapsBuilder::new()
            .format(gst_video::VideoFormat::Rgba)
            .build();
        let appsink = gst_app::AppSink::builder().caps(&caps).build();

        // Only the newest frame matters for display
        appsink.set_property("max-buffers", 1u32);
        appsink.set_property("drop", true);

        Self { appsink }
    }

    pub fn element(&self) -> &gst::Element {
        self.appsink.upcast_ref::<gst::Element>()
    }

    /// Latest decoded frame, or the preroll frame while paused.
    pub fn pull_frame(&self) -> Option<VideoFrame> {
        let sample = self
            .appsink
            .try_pull_sample(gst::ClockTime::ZERO)
            .or_else(|| self.appsink.try_pull_preroll(gst::ClockTime::ZERO))?;

        let info = gst_video::VideoInfo::from_caps(sample.caps()?).ok()?;
        let buffer = sample.buffer()?;
        let map = buffer.map_readable().ok()?;

        let width = info.width();
        let height = info.height();
        let row_bytes = width as usize * 4;
        let stride = info.stride()[0] as usize;

        let data = if stride == row_bytes {
            map.as_slice().to_vec()
        } else {
            let mut packed = Vec::with_capacity(row_bytes * height as usize);
            for row in map.as_slice().chunks(stride).take(height as usize) {
                packed.extend_from_slice(&row[..row_bytes.min(row.len())]);
            }
            packed
        };

        if data.len() != row_bytes * height as usize {
            tracing::debug!(
                got = data.len(),
                expected = row_bytes * height as usize,
                "frame size mismatch"
            );
            return None;
        }

        Some(VideoFrame {
            data,
            width,
            height,
        })
    }
}
