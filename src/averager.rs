/// Cumulative mean, with an optional running variance
/// of the new samples about the previous mean.
#[derive(Debug, Clone, Default)]
pub struct Averager {
    pub mean: f64,
    pub variance: f64,
    pub count: u64,
}

impl Averager {
    /// Builds new Averager
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            variance: 0.0,
        }
    }

    /// Builds an [Averager] holding one sample, with an a priori deviation.
    pub fn seeded(x: f64, sigma: f64) -> Self {
        Self {
            count: 1,
            mean: x,
            variance: sigma * sigma,
        }
    }

    /// Push new value into [Averager]
    pub fn add(&mut self, x: f64) {
        self.count += 1;
        let k = self.count as f64;
        let dx = x - self.mean;
        self.variance = self.variance * (k - 1.0) / k + dx * dx / k;
        self.mean = x / k + self.mean * (k - 1.0) / k;
    }

    /// Running standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Returns the mean, when at least one sample was pushed
    pub fn value(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.mean)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::Averager;

    #[test]
    fn test_averager() {
        let mut avg = Averager::new();
        assert!(avg.value().is_none());

        for (x_i, mean) in [(1.0, 1.0), (0.5, 0.75)] {
            avg.add(x_i);
            assert_eq!(avg.mean, mean);
        }
        assert_eq!(avg.value(), Some(0.75));
    }

    #[test]
    fn seeded_deviation() {
        let mut avg = Averager::seeded(10.0, 2.0);
        assert_eq!(avg.std_dev(), 2.0);

        // constant samples: variance decays as 1/k
        avg.add(10.0);
        assert_eq!(avg.variance, 2.0);
        avg.add(10.0);
        assert!((avg.variance - 4.0 / 3.0).abs() < 1.0E-12);
        assert!((avg.mean - 10.0).abs() < 1.0E-12);

        avg.add(13.0);
        assert!((avg.mean - 10.75).abs() < 1.0E-12);
        assert!((avg.variance - (4.0 / 3.0 * 3.0 / 4.0 + 9.0 / 4.0)).abs() < 1.0E-12);
    }
}
