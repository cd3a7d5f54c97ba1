/// Precomputed sine/cosine table indexed by degree.
///
/// Built once before the first frame and then only read. The table is passed
/// by reference into every stage that rotates something, so there is no
/// process-wide state.
#[derive(Debug, Clone)]
pub struct TrigTable {
    /// Table steps per degree (1 = whole degrees).
    resolution: usize,
    sin: Vec<f32>,
    cos: Vec<f32>,
}

impl Default for TrigTable {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TrigTable {
    pub fn new(resolution: usize) -> Self {
        let resolution = resolution.max(1);
        let size = 360 * resolution;
        let step = (1.0_f64 / resolution as f64).to_radians();

        let mut sin = Vec::with_capacity(size);
        let mut cos = Vec::with_capacity(size);
        for i in 0..size {
            let angle = i as f64 * step;
            sin.push(angle.sin() as f32);
            cos.push(angle.cos() as f32);
        }

        Self {
            resolution,
            sin,
            cos,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Maps any angle in degrees to the nearest table slot.
    #[inline]
    fn index(&self, degrees: f32) -> usize {
        let size = self.sin.len();
        let steps = (degrees * self.resolution as f32).round() as i64;
        steps.rem_euclid(size as i64) as usize
    }

    #[inline]
    pub fn sin(&self, degrees: f32) -> f32 {
        self.sin[self.index(degrees)]
    }

    #[inline]
    pub fn cos(&self, degrees: f32) -> f32 {
        self.cos[self.index(degrees)]
    }

    /// Both values at once; rotation code always needs the pair.
    #[inline]
    pub fn sin_cos(&self, degrees: f32) -> (f32, f32) {
        let i = self.index(degrees);
        (self.sin[i], self.cos[i])
    }
}
