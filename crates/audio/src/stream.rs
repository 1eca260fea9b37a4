use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use tracing::debug;

/// Creates the queue between click synthesis and the output callback.
/// `capacity` is in mono samples.
pub fn click_channel(capacity: usize) -> (ClickFeeder, ClickPlayback) {
    let (producer, consumer) = HeapRb::<f32>::new(capacity.max(1)).split();
    (ClickFeeder { producer }, ClickPlayback { consumer })
}

/// Producer half, owned by whoever triggers clicks.
pub struct ClickFeeder {
    producer: HeapProducer<f32>,
}

impl ClickFeeder {
    /// Queues as much of `samples` as fits and returns the number queued.
    pub fn queue(&mut self, samples: &[f32]) -> usize {
        let pushed = self.producer.push_slice(samples);
        if pushed < samples.len() {
            debug!(
                dropped = samples.len() - pushed,
                "click queue full, truncating click"
            );
        }
        pushed
    }

    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Consumer half, moved into the audio callback.
pub struct ClickPlayback {
    consumer: HeapConsumer<f32>,
}

impl ClickPlayback {
    /// Fills an interleaved buffer, copying each mono sample to every
    /// channel and padding with silence once the queue runs dry.
    pub fn fill_frames(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels.max(1)) {
            let sample = self.consumer.pop().unwrap_or(0.0);
            for out in frame {
                *out = sample;
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.consumer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_duplicates_mono_samples() {
        let (mut feeder, mut playback) = click_channel(8);
        assert_eq!(feeder.queue(&[0.5, -0.5]), 2);
        let mut data = [1.0f32; 6];
        playback.fill_frames(&mut data, 2);
        assert_eq!(data, [0.5, 0.5, -0.5, -0.5, 0.0, 0.0]);
        assert_eq!(playback.pending(), 0);
    }

    #[test]
    fn full_queue_truncates() {
        let (mut feeder, playback) = click_channel(3);
        assert_eq!(feeder.queue(&[0.1, 0.2, 0.3, 0.4]), 3);
        assert_eq!(feeder.free_len(), 0);
        assert_eq!(playback.pending(), 3);
    }
}
