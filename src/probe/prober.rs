use crate::{
    foundation::{
        core::{Dimensions, is_positive_duration},
        error::{StitchError, StitchResult},
    },
    model::source::Source,
};

/// Measures sources before normalization.
///
/// Implementations are called from rayon workers when parallel probing is enabled, hence `Sync`.
/// Timeouts are the implementation's concern: a call that gives up should return an error, which
/// the allocator treats as a soft failure for that one source.
pub trait Prober: Sync {
    /// Duration in seconds of a time-based source.
    fn probe_duration(&self, source: &Source) -> StitchResult<f64>;
    /// Pixel size of an image source.
    fn probe_dimensions(&self, source: &Source) -> StitchResult<Dimensions>;
}

impl<P: Prober + ?Sized> Prober for &P {
    fn probe_duration(&self, source: &Source) -> StitchResult<f64> {
        (**self).probe_duration(source)
    }

    fn probe_dimensions(&self, source: &Source) -> StitchResult<Dimensions> {
        (**self).probe_dimensions(source)
    }
}

/// Return a copy of `source` with the measurement its kind needs filled in.
///
/// Caller-supplied measurements are kept as-is and the prober is not consulted for them.
pub fn resolve_source(prober: &dyn Prober, source: &Source) -> StitchResult<Source> {
    let mut out = source.clone();
    if out.needs_probe() {
        if out.kind.is_time_based() {
            out.raw_duration = Some(prober.probe_duration(source)?);
        } else {
            out.raw_dimensions = Some(prober.probe_dimensions(source)?);
        }
    }

    if out.kind.is_time_based() {
        let secs = out.raw_duration.unwrap_or(f64::NAN);
        if !is_positive_duration(secs) {
            return Err(StitchError::probe(format!(
                "'{}' reported unusable duration {secs}",
                source.location
            )));
        }
    } else if let Some(dims) = out.raw_dimensions
        && (dims.width == 0 || dims.height == 0)
    {
        return Err(StitchError::probe(format!(
            "'{}' reported empty dimensions {}x{}",
            source.location, dims.width, dims.height
        )));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/probe/prober.rs"]
mod tests;
