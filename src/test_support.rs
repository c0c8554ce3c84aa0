//! Synthetic recordings for tests.
use std::fmt::Write;

/// Gaussian momentum pulses per segment plus an energy pulse marking contact.
/// Centers and widths are in samples.
#[derive(Debug, Clone)]
pub struct SyntheticSwing {
    pub movement_id: String,
    pub sample_rate_hz: f64,
    pub sample_count: usize,
    pub centers: [f64; 3],
    pub amplitudes: [f64; 3],
    pub width: f64,
    pub energy_center: f64,
    pub energy_width: f64,
}

impl SyntheticSwing {
    /// Clean proximal -> mid -> distal cascade at 300 Hz for one second.
    /// Velocity peaks sit 7 samples (~23 ms) and 6 samples (20 ms) apart,
    /// and every pulse has decayed well before the energy maximum.
    pub fn cascade(movement_id: &str) -> SyntheticSwing {
        SyntheticSwing {
            movement_id: movement_id.to_string(),
            sample_rate_hz: 300.0,
            sample_count: 300,
            centers: [165.0, 172.0, 178.0],
            amplitudes: [10.0, 15.0, 20.0],
            width: 12.0,
            energy_center: 195.0,
            energy_width: 15.0,
        }
    }

    pub fn with_amplitude(mut self, segment: usize, amplitude: f64) -> SyntheticSwing {
        self.amplitudes[segment] = amplitude;
        self
    }

    pub fn with_center(mut self, segment: usize, center: f64) -> SyntheticSwing {
        self.centers[segment] = center;
        self
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> SyntheticSwing {
        self.sample_count = sample_count;
        self
    }

    fn pulse(i: usize, center: f64, width: f64, amplitude: f64) -> f64 {
        let d = i as f64 - center;
        amplitude * (-(d * d) / (2.0 * width * width)).exp()
    }

    fn write_rows(&self, out: &mut String) {
        for i in 0..self.sample_count {
            let time = i as f64 / self.sample_rate_hz;
            let segments: Vec<f64> = (0..3)
                .map(|s| Self::pulse(i, self.centers[s], self.width, self.amplitudes[s]))
                .collect();
            let energy = 1.0 + Self::pulse(i, self.energy_center, self.energy_width, 100.0);
            let _ = writeln!(
                out,
                "{:.6},{},{:.9},{:.9},{:.9},{:.9},0.1,0.9,0.0",
                time, self.movement_id, segments[0], segments[1], segments[2], energy
            );
        }
    }

    /// Rotation rows with separation closing linearly from 40 to 0 degrees.
    fn write_rotation_rows(&self, out: &mut String) {
        for i in 0..self.sample_count {
            let time = i as f64 / self.sample_rate_hz;
            let progress = i as f64 / self.sample_count as f64;
            let _ = writeln!(out, "{:.6},{},{:.6},{:.6}", time, self.movement_id, 40.0, 40.0 * progress);
        }
    }
}

pub const MOMENTUM_HEADER: &str = "time,movement_id,pelvis_angular_momentum,torso_angular_momentum,arm_angular_momentum,total_kinetic_energy,com_x,com_y,com_z";
pub const ROTATION_HEADER: &str = "time,movement_id,pelvis_rotation,torso_rotation";

pub fn momentum_csv(swings: &[SyntheticSwing]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", MOMENTUM_HEADER);
    for swing in swings {
        swing.write_rows(&mut out);
    }
    out
}

pub fn rotation_csv(swings: &[SyntheticSwing]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ROTATION_HEADER);
    for swing in swings {
        swing.write_rotation_rows(&mut out);
    }
    out
}
