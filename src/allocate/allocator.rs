use rayon::prelude::*;

use crate::{
    allocate::{
        diagnostics::{Allocation, Diagnostic},
        pool::Pool,
    },
    config::settings::{AllocatorConfig, ProbeMode},
    foundation::{
        core::{SECS_EPSILON, is_positive_duration},
        error::{StitchError, StitchResult},
    },
    model::{
        segment::{Segment, Timeline},
        source::Source,
    },
    normalize::segment::{Normalized, normalize_source},
    probe::prober::{Prober, resolve_source},
};

/// Fill `target_duration` seconds from `pools` in fixed priority order (clip, image, filler).
///
/// Pools are stably reordered by [`crate::PoolKind`], so caller order only matters between pools
/// of the same kind. Within a pool, sources are consumed in input order. Each candidate segment
/// is clamped to the remaining budget; after all pools only the last segment is ever trimmed.
///
/// A source that fails to probe or normalize is skipped and reported in
/// [`Allocation::diagnostics`]. Running out of sources yields a shorter timeline (see
/// [`Allocation::shortfall`]). Only an allocation that produced no segment at all fails, with
/// [`StitchError::NoSourcesAvailable`].
#[tracing::instrument(skip(pools, prober, cfg), fields(pools = pools.len()))]
pub fn allocate(
    target_duration: f64,
    pools: &[Pool],
    prober: &dyn Prober,
    cfg: &AllocatorConfig,
) -> StitchResult<Allocation> {
    if !is_positive_duration(target_duration) {
        return Err(StitchError::validation(format!(
            "target duration must be finite and > 0, got {target_duration}"
        )));
    }
    cfg.validate()?;
    for pool in pools {
        pool.validate()?;
    }
    if pools.iter().all(Pool::is_empty) {
        return Err(StitchError::NoSourcesAvailable);
    }

    let mut ordered: Vec<&Pool> = pools.iter().collect();
    ordered.sort_by_key(|p| p.kind);

    let thread_pool = match cfg.probe_mode {
        ProbeMode::Sequential => None,
        ProbeMode::Parallel { threads } => Some(build_thread_pool(threads)?),
    };

    let mut state = AllocState::new(target_duration);
    for pool in ordered {
        if state.is_filled() {
            break;
        }
        match &thread_pool {
            None => {
                for source in &pool.sources {
                    let resolved = resolve_source(prober, source);
                    state.consume(pool, source, resolved, cfg);
                    if state.is_filled() {
                        break;
                    }
                }
            }
            Some(tp) => {
                // Probe everything up front; consumption below stays in input order.
                let resolved: Vec<StitchResult<Source>> = tp.install(|| {
                    pool.sources
                        .par_iter()
                        .map(|s| resolve_source(prober, s))
                        .collect()
                });
                for (source, resolved) in pool.sources.iter().zip(resolved) {
                    state.consume(pool, source, resolved, cfg);
                    if state.is_filled() {
                        break;
                    }
                }
            }
        }
    }

    state.trim_overshoot();

    if state.timeline.is_empty() {
        tracing::warn!(
            diagnostics = state.diagnostics.len(),
            "no pool yielded a usable segment"
        );
        return Err(StitchError::NoSourcesAvailable);
    }
    state.timeline.validate(cfg.fps)?;

    let actual_duration = state.timeline.total_duration();
    let allocation = Allocation {
        timeline: state.timeline,
        target_duration,
        actual_duration,
        diagnostics: state.diagnostics,
    };
    if let Some(gap) = allocation.shortfall() {
        tracing::info!(
            target = target_duration,
            actual = actual_duration,
            shortfall = gap,
            "pools exhausted before the target duration"
        );
    }
    Ok(allocation)
}

/// Per-call accumulator threaded through the allocation loop.
struct AllocState {
    target: f64,
    elapsed: f64,
    timeline: Timeline,
    diagnostics: Vec<Diagnostic>,
}

impl AllocState {
    fn new(target: f64) -> Self {
        Self {
            target,
            elapsed: 0.0,
            timeline: Timeline::new(target),
            diagnostics: Vec::new(),
        }
    }

    fn remaining(&self) -> f64 {
        self.target - self.elapsed
    }

    fn is_filled(&self) -> bool {
        self.remaining() <= SECS_EPSILON
    }

    fn consume(
        &mut self,
        pool: &Pool,
        original: &Source,
        resolved: StitchResult<Source>,
        cfg: &AllocatorConfig,
    ) {
        let normalized = resolved.and_then(|src| normalize_source(&src, cfg));
        let candidate = match normalized {
            Ok(Normalized::Segment(seg)) => seg,
            Ok(Normalized::ImageTooSmall(dimensions)) => {
                tracing::debug!(
                    location = %original.location,
                    width = dimensions.width,
                    height = dimensions.height,
                    "image below minimum size, skipped"
                );
                self.diagnostics.push(Diagnostic::ImageTooSmall {
                    pool: pool.name.clone(),
                    location: original.location.clone(),
                    dimensions,
                });
                return;
            }
            Err(e) => {
                tracing::warn!(location = %original.location, error = %e, "source skipped");
                self.diagnostics.push(Diagnostic::SourceProbeFailed {
                    pool: pool.name.clone(),
                    location: original.location.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        match candidate.truncated(self.remaining()) {
            Some(seg) => self.push(seg),
            None => self.drop_zero_length(pool, original),
        }
    }

    fn push(&mut self, seg: Segment) {
        tracing::debug!(
            location = %seg.source.location,
            kind = ?seg.kind,
            duration = seg.duration,
            natural = seg.natural_duration,
            "segment appended"
        );
        self.elapsed += seg.duration;
        self.timeline.segments.push(seg);
    }

    fn drop_zero_length(&mut self, pool: &Pool, original: &Source) {
        self.diagnostics.push(Diagnostic::ZeroLengthDropped {
            pool: pool.name.clone(),
            location: original.location.clone(),
        });
    }

    /// Cut the last segment so the total does not exceed the target. Earlier segments are never
    /// touched.
    fn trim_overshoot(&mut self) {
        let total = self.timeline.total_duration();
        if total <= self.target + SECS_EPSILON {
            return;
        }
        let Some(last) = self.timeline.segments.pop() else {
            return;
        };
        let before_last = total - last.duration;
        match last.truncated(self.target - before_last) {
            Some(seg) => self.timeline.segments.push(seg),
            None => {
                tracing::debug!(location = %last.source.location, "last segment trimmed away");
                self.diagnostics.push(Diagnostic::ZeroLengthDropped {
                    pool: "timeline".to_string(),
                    location: last.source.location.clone(),
                });
            }
        }
        self.elapsed = self.timeline.total_duration();
    }
}

fn build_thread_pool(threads: Option<usize>) -> StitchResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StitchError::validation(
            "probe 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StitchError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/allocate/allocator.rs"]
mod tests;
