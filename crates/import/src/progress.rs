use std::time::{Duration, Instant};


#[derive(Copy, Clone, Debug)]
struct Sample {
    blocks: u64,
    time: Instant,
}


/// Block throughput over a sliding window of recent samples.
pub struct Progress {
    samples: Vec<Sample>,
    tail: usize,
    capacity: usize,
    granularity: Duration,
}


impl Progress {
    pub fn new(window_size: usize, granularity: Duration) -> Self {
        let capacity = window_size.max(1) + 1;
        Self {
            samples: Vec::with_capacity(capacity),
            tail: 0,
            capacity,
            granularity,
        }
    }

    pub fn start(&mut self) {
        self.record_at(0, Instant::now())
    }

    pub fn record(&mut self, blocks: u64) {
        self.record_at(blocks, Instant::now())
    }

    fn record_at(&mut self, blocks: u64, time: Instant) {
        let has_baseline = self.samples.len() > 1;
        let granularity = self.granularity;
        if let Some(last) = self.last_mut() {
            let blocks = blocks.max(last.blocks);
            // samples closer than the granularity are merged, the first one is kept as a baseline
            if has_baseline && time <= last.time + granularity {
                last.blocks = blocks;
                return;
            }
        }

        let sample = Sample { blocks, time };
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.tail] = sample;
        }
        self.tail = (self.tail + 1) % self.capacity;
    }

    pub fn blocks(&self) -> u64 {
        self.last().map_or(0, |s| s.blocks)
    }

    pub fn blocks_per_second(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let first = if self.samples.len() < self.capacity {
            &self.samples[0]
        } else {
            &self.samples[self.tail]
        };
        let Some(last) = self.last() else {
            return 0.0;
        };
        let secs = last.time.duration_since(first.time).as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (last.blocks - first.blocks) as f64 / secs
    }

    fn last_index(&self) -> Option<usize> {
        if self.samples.is_empty() {
            None
        } else {
            Some((self.capacity + self.tail - 1) % self.capacity)
        }
    }

    fn last(&self) -> Option<&Sample> {
        self.last_index().map(|i| &self.samples[i])
    }

    fn last_mut(&mut self) -> Option<&mut Sample> {
        self.last_index().map(|i| &mut self.samples[i])
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_over_window() {
        let mut progress = Progress::new(2, Duration::from_millis(10));
        let t0 = Instant::now();
        progress.record_at(0, t0);
        assert_eq!(progress.blocks_per_second(), 0.0);

        progress.record_at(100, t0 + Duration::from_secs(1));
        assert_eq!(progress.blocks(), 100);
        assert!((progress.blocks_per_second() - 100.0).abs() < 1e-9);

        // the oldest sample falls out of the window
        progress.record_at(200, t0 + Duration::from_secs(2));
        progress.record_at(500, t0 + Duration::from_secs(3));
        assert!((progress.blocks_per_second() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_close_samples_are_merged() {
        let mut progress = Progress::new(4, Duration::from_secs(1));
        let t0 = Instant::now();
        progress.record_at(0, t0);
        progress.record_at(10, t0 + Duration::from_secs(2));
        progress.record_at(20, t0 + Duration::from_millis(2500));
        assert_eq!(progress.samples.len(), 2);
        assert_eq!(progress.blocks(), 20);
        assert!((progress.blocks_per_second() - 10.0).abs() < 1e-9);
    }
}
