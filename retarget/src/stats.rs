use nalgebra as na;

/// Samples considered by the spike-rejection pass per report.
pub const DEFAULT_FILTER_WINDOW: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("statistics require at least one sample")]
    NoSamples,
}

/// Componentwise arithmetic mean.
pub fn mean(samples: &[na::Vector3<f32>]) -> Result<na::Vector3<f32>, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::NoSamples);
    }

    let mut sum = na::Vector3::zeros();
    for sample in samples {
        sum += sample;
    }
    Ok(sum / samples.len() as f32)
}

/// Componentwise population standard deviation (no Bessel correction).
pub fn standard_deviation(
    samples: &[na::Vector3<f32>],
) -> Result<na::Vector3<f32>, StatsError> {
    let mean = mean(samples)?;

    let mut accum = na::Vector3::zeros();
    for sample in samples {
        let deviation = sample - mean;
        accum += deviation.component_mul(&deviation);
    }
    accum /= samples.len() as f32;
    Ok(accum.map(f32::sqrt))
}

/// Rejects vertical spikes from a position signal.
///
/// Scans backward from the second-to-last sample and keeps points whose y
/// component sits strictly below both chronological neighbors, stopping
/// once `max_count` points are collected. The first and last samples have
/// only one neighbor and are never candidates.
///
/// The result is ordered most-recent-first, not chronologically.
pub fn vertical_minima(
    samples: &[na::Vector3<f32>],
    max_count: usize,
) -> Vec<na::Vector3<f32>> {
    let mut minima = Vec::new();
    if samples.len() < 3 {
        return minima;
    }

    let mut i = samples.len() - 2;
    while minima.len() < max_count && i > 0 {
        if samples[i + 1].y > samples[i].y && samples[i - 1].y > samples[i].y {
            minima.push(samples[i]);
        }
        i -= 1;
    }

    minima
}
