/// A piecewise-constant 1-D probability distribution built from a
/// non-negative function sampled at `n` equal-width steps, together with
/// its cumulative distribution function so `sample`/`d_sample` can invert
/// it in `O(log n)`.
pub struct Pdf1D {
    func: Vec<f32>,
    cdf: Vec<f32>,
    integral: f32,
    inv_integral: f32,
}

impl Pdf1D {
    pub fn new(f: &[f32]) -> Self {
        let n = f.len();
        let mut cdf = vec![0.0f32; n + 1];
        let delta = 1.0 / n as f64;
        let mut c = 0.0f64;
        for i in 1..=n {
            c += f[i - 1] as f64 * delta;
            cdf[i] = c as f32;
        }
        let integral = c as f32;
        let inv_integral = if integral > 0.0 { 1.0 / integral } else { 0.0 };
        if integral > 0.0 {
            for v in cdf.iter_mut().skip(1) {
                *v /= integral;
            }
        }
        Self { func: f.to_vec(), cdf, integral, inv_integral }
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Invert the CDF at `u`, returning a continuous position in
    /// `[0, n]` and the pdf (with respect to that continuous measure) at
    /// the bin it landed in. `u` below `cdf[0] == 0.0` cannot happen for
    /// `u >= 0.0`; a `u` that still resolves to index `-1` (e.g. `u` is
    /// negative) is logged and clamped to index `0`.
    pub fn sample(&self, u: f32) -> (f32, f32) {
        let index = self.find_index(u);
        let index = if index < 0 {
            log::error!("Pdf1D::sample: index out of bounds for u={}, clamping to 0", u);
            0
        } else {
            index as usize
        };
        let delta = (u - self.cdf[index]) / (self.cdf[index + 1] - self.cdf[index]).max(1e-20);
        let pdf = self.func[index] * self.inv_integral;
        (index as f32 + delta, pdf)
    }

    /// Like `sample`, but returns the discrete bin index instead of a
    /// continuous position within it. Used to pick one of several lights
    /// weighted by power, or one of several BSDF lobes.
    pub fn d_sample(&self, u: f32) -> (usize, f32) {
        if u == 0.0 {
            return (0, self.func[0] * self.inv_integral);
        }
        let index = self.find_index(u);
        let index = if index < 0 {
            log::error!("Pdf1D::d_sample: index out of bounds for u={}, clamping to 0", u);
            0
        } else {
            index as usize
        };
        (index, self.func[index] * self.inv_integral)
    }

    fn find_index(&self, u: f32) -> i64 {
        match self.cdf.binary_search_by(|probe| probe.partial_cmp(&u).unwrap()) {
            Ok(i) => i as i64 - 1,
            Err(i) => i as i64 - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_function_has_uniform_pdf() {
        let f = vec![1.0; 4];
        let dist = Pdf1D::new(&f);
        let (_, pdf) = dist.sample(0.5);
        assert!((pdf - 1.0).abs() < 1e-5);
    }

    #[test]
    fn recovers_skewed_histogram() {
        let f = vec![1.0, 3.0, 1.0, 1.0];
        let dist = Pdf1D::new(&f);
        let mut counts = [0u32; 4];
        let n = 20_000;
        for i in 0..n {
            let u = (i as f32 + 0.5) / n as f32;
            let (x, _) = dist.sample(u);
            let bin = (x as usize).min(3);
            counts[bin] += 1;
        }
        let expected = [1.0 / 6.0, 3.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0];
        for (count, expected_fraction) in counts.iter().zip(expected.iter()) {
            let fraction = *count as f32 / n as f32;
            assert!((fraction - expected_fraction).abs() < 0.02);
        }
    }

    #[test]
    fn discrete_sample_picks_heavier_bin_more_often() {
        let f = vec![1.0, 9.0];
        let dist = Pdf1D::new(&f);
        let mut heavy = 0;
        let n = 5000;
        for i in 0..n {
            let u = (i as f32 + 0.5) / n as f32;
            let (index, _) = dist.d_sample(u);
            if index == 1 {
                heavy += 1;
            }
        }
        assert!(heavy as f32 / n as f32 > 0.8);
    }
}
