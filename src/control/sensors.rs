//! Normalisation of raw biometric readings into 0..1 control signals.
//!
//! Acquisition (serial port, microphone device) happens elsewhere; this module
//! only turns numbers into smoothed levels.

/// One line from the sensor board, e.g. `GSR:523,DIST:37`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorLine {
    pub gsr: Option<i32>,
    pub distance: Option<i32>,
}

impl SensorLine {
    /// Parse comma-separated `GSR:` / `DIST:` fields.
    ///
    /// Unknown fields are skipped and a field whose value does not parse is
    /// treated as absent. Returns `None` when neither field was found.
    pub fn parse(line: &str) -> Option<Self> {
        let mut reading = SensorLine::default();
        for field in line.trim().split(',') {
            let field = field.trim();
            if let Some(value) = field.strip_prefix("GSR:") {
                reading.gsr = value.trim().parse().ok().or(reading.gsr);
            } else if let Some(value) = field.strip_prefix("DIST:") {
                reading.distance = value.trim().parse().ok().or(reading.distance);
            }
        }

        if reading.gsr.is_none() && reading.distance.is_none() {
            None
        } else {
            Some(reading)
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Calibration ranges for [`BioNormalizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BioCalibration {
    pub gsr_min: f32,
    pub gsr_max: f32,
    /// Chest-to-sensor distance range covering a normal breath.
    pub distance_min: f32,
    pub distance_max: f32,
    /// Exponent applied after normalising; >1 boosts the deep end.
    pub breath_curve: f32,
    /// Fraction of the new value taken each reading.
    pub breath_smoothing: f32,
    /// Minimum rise per reading that counts as inhaling.
    pub inhale_threshold: f32,
}

impl Default for BioCalibration {
    fn default() -> Self {
        Self {
            gsr_min: 300.0,
            gsr_max: 800.0,
            distance_min: 25.0,
            distance_max: 40.0,
            breath_curve: 2.0,
            breath_smoothing: 0.2,
            inhale_threshold: 0.001,
        }
    }
}

/// Latest normalised view of skin conductance and breathing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BioState {
    pub gsr: f32,
    pub breath: f32,
    pub breath_delta: f32,
    pub is_inhale: bool,
}

/// Turns raw sensor lines into [`BioState`].
#[derive(Debug, Clone, Default)]
pub struct BioNormalizer {
    calibration: BioCalibration,
    gsr_raw: i32,
    distance_raw: i32,
    smooth_breath: f32,
    last_breath: f32,
    state: BioState,
}

impl BioNormalizer {
    pub fn new(calibration: BioCalibration) -> Self {
        Self {
            calibration,
            ..Self::default()
        }
    }

    /// Fold a parsed line in. Missing fields keep their last raw value.
    pub fn update(&mut self, line: SensorLine) -> BioState {
        if let Some(gsr) = line.gsr {
            self.gsr_raw = gsr;
        }
        if let Some(distance) = line.distance {
            self.distance_raw = distance;
        }

        self.update_gsr(self.gsr_raw);
        self.update_breath(self.distance_raw);
        self.state
    }

    fn update_gsr(&mut self, raw: i32) {
        let c = &self.calibration;
        self.state.gsr = inverse_lerp(c.gsr_min, c.gsr_max, raw as f32);
    }

    fn update_breath(&mut self, raw: i32) {
        // the board reports 0 or negative when the echo is lost
        if raw <= 0 {
            return;
        }
        let c = self.calibration;

        let clamped = (raw as f32).clamp(c.distance_min, c.distance_max);
        let norm = inverse_lerp(c.distance_min, c.distance_max, clamped).powf(c.breath_curve);

        self.smooth_breath = lerp(self.smooth_breath, norm, c.breath_smoothing);
        self.state.breath_delta = self.smooth_breath - self.last_breath;
        self.state.is_inhale = self.state.breath_delta > c.inhale_threshold;
        self.last_breath = self.smooth_breath;
        self.state.breath = self.smooth_breath.clamp(0.0, 1.0);
    }

    pub fn state(&self) -> BioState {
        self.state
    }

    pub fn raw(&self) -> (i32, i32) {
        (self.gsr_raw, self.distance_raw)
    }
}

/// RMS level follower for a breath microphone.
#[derive(Debug, Clone, Copy)]
pub struct MicLeveler {
    /// Gain applied to the RMS before clamping; raise it for a quiet mic.
    pub sensitivity: f32,
    /// 0 follows instantly, values toward 1 respond more slowly.
    pub smoothing: f32,
    level: f32,
}

impl Default for MicLeveler {
    fn default() -> Self {
        Self::new(10.0, 0.4)
    }
}

impl MicLeveler {
    pub fn new(sensitivity: f32, smoothing: f32) -> Self {
        Self {
            sensitivity,
            smoothing: smoothing.clamp(0.0, 1.0),
            level: 0.0,
        }
    }

    /// Feed one analysis window and return the smoothed level in [0, 1].
    pub fn process(&mut self, window: &[f32]) -> f32 {
        if window.is_empty() {
            return self.level;
        }
        let target = (rms(window) * self.sensitivity).clamp(0.0, 1.0);
        self.level = lerp(self.level, target, 1.0 - self.smoothing);
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

pub fn rms(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = window.iter().map(|s| s * s).sum();
    (sum_sq / window.len() as f32).sqrt()
}
