//! Volume baseline indicator.

use super::sma::Sma;
use crate::services::signals::Indicator;
use crate::types::Bar;

/// Rolling average of traded volume, with the ratio of each bar's volume
/// to that average.
pub struct VolumeBaseline {
    period: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeSeries {
    pub baseline: Vec<Option<f64>>,
    /// Undefined while the baseline is undefined or zero.
    pub ratio: Vec<Option<f64>>,
}

impl Default for VolumeBaseline {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl VolumeBaseline {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for VolumeBaseline {
    type Output = VolumeSeries;

    fn id(&self) -> &str {
        "volume_baseline"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> VolumeSeries {
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let baseline = Sma::rolling(&volumes, self.period);

        let ratio = volumes
            .iter()
            .zip(&baseline)
            .map(|(volume, avg)| match avg {
                Some(avg) if *avg > 0.0 => Some(volume / avg),
                _ => None,
            })
            .collect();

        VolumeSeries { baseline, ratio }
    }
}
