/// Per-buffer RMS normalization followed by a simple noise gate.
///
/// Both stages are stateless: the same buffer and valid length always produce
/// the same output, and no filter memory is carried across calls. This is a
/// deliberate simplification (a per-buffer gain stage, not a true stateful
/// noise suppressor).
#[derive(Debug, Clone)]
pub struct AudioPipeline {
    /// Target RMS as a fraction of full scale.
    target_rms: f64,
    /// Samples below this fraction of full scale are zeroed.
    noise_gate_threshold: f64,
}

impl Default for AudioPipeline {
    fn default() -> Self {
        Self {
            target_rms: 0.15,
            noise_gate_threshold: 0.02,
        }
    }
}

impl AudioPipeline {
    pub fn new(target_rms: f64, noise_gate_threshold: f64) -> Self {
        Self {
            target_rms,
            noise_gate_threshold,
        }
    }

    /// Returns a transformed copy of the first `valid_len` samples of `input`.
    /// The input slice and anything beyond `valid_len` are left untouched.
    pub fn process(&self, input: &[i16], valid_len: usize) -> Vec<i16> {
        let len = valid_len.min(input.len());
        let mut buffer = input[..len].to_vec();
        self.apply_rms_normalization(&mut buffer);
        self.apply_noise_gate(&mut buffer);
        buffer
    }

    fn apply_rms_normalization(&self, buffer: &mut [i16]) {
        let mut sum = 0.0f64;
        for &sample in buffer.iter() {
            sum += sample as f64 * sample as f64;
        }
        let rms = (sum / buffer.len().max(1) as f64).sqrt() / i16::MAX as f64;
        // Silence: skip entirely rather than amplify by an infinite gain.
        if rms <= 0.0 {
            return;
        }
        let gain = self.target_rms / rms;
        for sample in buffer.iter_mut() {
            let amplified = (*sample as f64 * gain) as i32;
            *sample = amplified.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }
    }

    fn apply_noise_gate(&self, buffer: &mut [i16]) {
        let threshold = (self.noise_gate_threshold * i16::MAX as f64) as i32;
        for sample in buffer.iter_mut() {
            if (*sample as i32).abs() < threshold {
                *sample = 0;
            }
        }
    }
}
