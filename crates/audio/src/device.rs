use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{info, warn};

use crate::backend::{ClickSink, QueuedClick};
use crate::dsp::ClickTone;
use crate::stream::click_channel;

/// Seconds of click audio the output queue can hold.
const QUEUE_SECONDS: u32 = 2;

enum DeviceState {
    Closed,
    Open {
        // dropping the stream stops playback
        _stream: cpal::Stream,
        click: QueuedClick,
    },
    Unavailable,
}

/// Click sink on the default output device. The device is opened on the
/// first tick and reused afterwards; if opening fails the sink goes quiet.
pub struct DeviceClick {
    tone: ClickTone,
    state: DeviceState,
}

impl DeviceClick {
    pub fn new(tone: ClickTone) -> Self {
        Self {
            tone,
            state: DeviceState::Closed,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.state, DeviceState::Unavailable)
    }

    fn open(tone: ClickTone) -> Result<DeviceState> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no default output device"))?;
        let supported = device
            .default_output_config()
            .context("query default output config")?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(anyhow!(
                "unsupported sample format {:?}",
                supported.sample_format()
            ));
        }
        let config: cpal::StreamConfig = supported.config();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;
        let (feeder, mut playback) = click_channel((sample_rate * QUEUE_SECONDS) as usize);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    playback.fill_frames(data, channels);
                },
                |err| warn!(%err, "click stream error"),
                None,
            )
            .context("build click output stream")?;
        stream.play().context("start click output stream")?;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".into()),
            sample_rate,
            channels,
            "click output opened"
        );
        Ok(DeviceState::Open {
            _stream: stream,
            click: QueuedClick::new(tone, sample_rate, feeder),
        })
    }
}

impl ClickSink for DeviceClick {
    fn play_tick(&mut self, downbeat: bool) {
        if matches!(self.state, DeviceState::Closed) {
            self.state = match Self::open(self.tone) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "audio click unavailable, continuing silently");
                    DeviceState::Unavailable
                }
            };
        }
        if let DeviceState::Open { click, .. } = &mut self.state {
            click.play_tick(downbeat);
        }
    }
}
