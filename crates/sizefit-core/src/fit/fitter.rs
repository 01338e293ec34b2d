//! The quality-then-dimensions size search.

use enough::{Stop, Unstoppable};
use log::{debug, info, warn};

use super::config::{FitConfig, UnattainablePolicy};
use super::types::{EncodedCandidate, FitAttempt, FitError, FitResult};
use crate::codec::{EncodeRequest, ImageCodec, RasterCodec};
use crate::decode::scaled_dimensions;
use crate::sharpness::estimate_sharpness;
use crate::surface::PixelSurface;

/// Re-encodes an image until it fits a byte budget.
///
/// Quality is lowered first, one step at a time, down to its floor. Only then
/// is the image drawn smaller, one scale step at a time, with quality held at
/// the floor. Every attempt lowers quality or scale, so the number of encodes
/// is bounded by [`FitConfig::max_attempts`].
#[derive(Debug, Clone, Default)]
pub struct SizeFitter<C = RasterCodec> {
    codec: C,
    config: FitConfig,
}

impl<C: ImageCodec> SizeFitter<C> {
    /// Create a fitter with the default schedule.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            config: FitConfig::default(),
        }
    }

    /// Replace the search schedule.
    pub fn with_config(mut self, config: FitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Fit `image` into `target_size` bytes.
    ///
    /// # Errors
    ///
    /// See [`FitError`]. Under the default best-effort policy a missed target
    /// is not an error; check [`FitResult::met_target`].
    pub fn fit(&self, image: &[u8], target_size: u64) -> Result<FitResult, FitError> {
        self.fit_with_stop(image, target_size, &Unstoppable)
    }

    /// Like [`fit`](Self::fit), checking `stop` before every attempt.
    pub fn fit_with_stop(
        &self,
        image: &[u8],
        target_size: u64,
        stop: &dyn Stop,
    ) -> Result<FitResult, FitError> {
        if target_size == 0 {
            return Err(FitError::InvalidTarget);
        }
        self.config.validate()?;

        let source = self.codec.decode(image)?;
        let original = source.surface.dimensions();
        let format = source.format;
        let quality_steps = self.config.quality_steps();
        let scale_steps = self.config.scale_steps();

        debug!(
            "fitting {}x{} {:?} into {} bytes (up to {} attempts)",
            original.0,
            original.1,
            format,
            target_size,
            self.config.max_attempts()
        );

        let mut k = 0u32;
        let mut j = 0u32;
        let mut drawn: Option<PixelSurface> = None;
        let mut smallest: Option<EncodedCandidate> = None;
        let mut attempts = Vec::new();
        let mut dimensions_reduced = false;

        loop {
            if let Err(reason) = stop.check() {
                debug!("fit stopped after {} attempts: {:?}", attempts.len(), reason);
                return Err(reason.into());
            }

            let quality = self.config.quality_at(k);
            let scale = self.config.scale_at(j);
            let (width, height) = scaled_dimensions(original.0, original.1, scale);

            if (width, height) != original
                && drawn.as_ref().map(PixelSurface::dimensions) != Some((width, height))
            {
                drawn = Some(self.codec.draw(&source.surface, width, height)?);
            }
            let surface = match &drawn {
                Some(s) if s.dimensions() == (width, height) => s,
                _ => &source.surface,
            };

            let bytes = self
                .codec
                .encode(&EncodeRequest::new(surface, quality, format))?;
            let candidate = EncodedCandidate {
                bytes,
                width,
                height,
                quality,
                format,
            };

            debug!(
                "attempt {}: {}x{} q={} -> {} bytes",
                attempts.len() + 1,
                width,
                height,
                quality,
                candidate.size()
            );
            attempts.push(FitAttempt {
                width,
                height,
                quality,
                scale,
                size: candidate.size(),
            });
            if width < original.0 || height < original.1 {
                dimensions_reduced = true;
            }

            if candidate.size() <= target_size {
                info!(
                    "fit {} bytes into {} after {} attempts ({}x{}, q={})",
                    candidate.size(),
                    target_size,
                    attempts.len(),
                    width,
                    height,
                    quality
                );
                return self.finish(candidate, true, dimensions_reduced, target_size, original, attempts);
            }

            let best = match smallest.take() {
                Some(s) if s.size() <= candidate.size() => s,
                _ => candidate,
            };

            // Lossless output ignores quality, so there is nothing to gain
            // from walking the quality axis.
            if !format.is_lossy() && k < quality_steps {
                k = quality_steps;
            }

            if k < quality_steps {
                k += 1;
                smallest = Some(best);
                continue;
            }

            match next_scale_step(original, j, scale_steps, (width, height), &self.config) {
                Some(next) => {
                    j = next;
                    smallest = Some(best);
                }
                None => {
                    return match self.config.unattainable {
                        UnattainablePolicy::Fail => {
                            warn!(
                                "could not fit into {} bytes; smallest attempt was {} bytes",
                                target_size,
                                best.size()
                            );
                            Err(FitError::Unattainable {
                                target: target_size,
                                smallest: best.size(),
                            })
                        }
                        UnattainablePolicy::BestEffort => {
                            warn!(
                                "target of {} bytes not met; returning smallest attempt of {} bytes",
                                target_size,
                                best.size()
                            );
                            self.finish(best, false, dimensions_reduced, target_size, original, attempts)
                        }
                    };
                }
            }
        }
    }

    fn finish(
        &self,
        candidate: EncodedCandidate,
        met_target: bool,
        dimensions_reduced: bool,
        target_size: u64,
        original_dimensions: (u32, u32),
        attempts: Vec<FitAttempt>,
    ) -> Result<FitResult, FitError> {
        let decoded = self.codec.decode(&candidate.bytes)?;
        let sharpness_score = estimate_sharpness(&decoded.surface)?;

        Ok(FitResult {
            candidate,
            dimensions_reduced,
            sharpness_score,
            met_target,
            target_size,
            original_dimensions,
            attempts,
        })
    }
}

/// Next scale index whose drawn size differs from `current`.
///
/// Scale steps that floor to the same pixel size would only repeat the last
/// encode, so they are skipped.
fn next_scale_step(
    original: (u32, u32),
    mut j: u32,
    scale_steps: u32,
    current: (u32, u32),
    config: &FitConfig,
) -> Option<u32> {
    while j < scale_steps {
        j += 1;
        if scaled_dimensions(original.0, original.1, config.scale_at(j)) != current {
            return Some(j);
        }
    }
    None
}

/// Fit encoded image bytes into `target_size` bytes with the `image`-crate
/// codec and the default schedule.
///
/// # Example
/// ```ignore
/// let bytes = std::fs::read("photo.jpg")?;
/// let result = sizefit_core::fit(&bytes, 100 * 1024)?;
/// println!("{} bytes, met target: {}", result.candidate.size(), result.met_target);
/// ```
pub fn fit(image: &[u8], target_size: u64) -> Result<FitResult, FitError> {
    SizeFitter::new(RasterCodec).fit(image, target_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::SyntheticCodec;
    use crate::encode::encode_surface;
    use crate::format::ImageFormat;
    use enough::StopReason;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KB: u64 = 1024;

    /// 100x80 source whose max-quality encode is 500 KB and whose smallest
    /// encode (q=0.1, half scale) is 80 KB.
    fn scenario_codec() -> SyntheticCodec {
        SyntheticCodec::new(|w, h, q| {
            let area = (w as f64 * h as f64) / (100.0 * 80.0);
            let quality_factor = 0.64 + (q - 0.1) * 0.45;
            (500.0 * KB as f64 * area * quality_factor).round() as usize
        })
    }

    fn scenario_source() -> Vec<u8> {
        SyntheticCodec::source(100, 80)
    }

    /// Stop token that lets `remaining` checks pass, then reports `reason`.
    struct StopAfter {
        remaining: AtomicUsize,
        reason: StopReason,
    }

    impl StopAfter {
        fn new(remaining: usize, reason: StopReason) -> Self {
            Self {
                remaining: AtomicUsize::new(remaining),
                reason,
            }
        }
    }

    impl Stop for StopAfter {
        fn check(&self) -> Result<(), StopReason> {
            self.remaining
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                .map(|_| ())
                .map_err(|_| self.reason)
        }
    }

    #[test]
    fn test_fits_on_first_attempt_when_already_small() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), 600 * KB).unwrap();

        assert_eq!(result.iterations(), 1);
        assert!(result.met_target);
        assert!(!result.dimensions_reduced);
        assert_eq!(result.candidate.quality, 0.9);
        assert_eq!((result.candidate.width, result.candidate.height), (100, 80));
        assert_eq!(result.candidate.size(), 500 * KB);
    }

    #[test]
    fn test_reduces_quality_before_dimensions() {
        // q=0.5 at full size: 512000 * 0.82 = 419840
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), 420_000).unwrap();

        assert!(result.met_target);
        assert!(!result.dimensions_reduced);
        assert_eq!(result.candidate.quality, 0.5);
        assert_eq!(result.iterations(), 5);
    }

    #[test]
    fn test_scenario_100kb_needs_downscale() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), 100 * KB).unwrap();

        assert!(result.met_target);
        assert!(result.candidate.size() <= 100 * KB);
        assert!(result.dimensions_reduced);
        assert!(result.candidate_reduced());
        assert_eq!(result.candidate.quality, 0.1);
        assert_eq!((result.candidate.width, result.candidate.height), (50, 40));
        assert_eq!(result.candidate.size(), 80 * KB);
        assert_eq!(result.iterations(), 14);
    }

    #[test]
    fn test_scenario_1kb_best_effort() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), KB).unwrap();

        assert!(!result.met_target);
        assert_eq!(result.candidate.size(), 80 * KB);
        assert!(result.dimensions_reduced);
        assert_eq!(result.iterations(), 14);
    }

    #[test]
    fn test_scenario_1kb_strict() {
        let fitter = SizeFitter::new(scenario_codec()).with_config(FitConfig::new().strict());
        let result = fitter.fit(&scenario_source(), KB);

        match result {
            Err(FitError::Unattainable { target, smallest }) => {
                assert_eq!(target, KB);
                assert_eq!(smallest, 80 * KB);
            }
            other => panic!("Expected Unattainable, got {:?}", other),
        }
    }

    #[test]
    fn test_best_effort_returns_smallest_not_last() {
        // Sizes grow as the image shrinks, so the last attempt is not the smallest.
        let codec = SyntheticCodec::new(|w, _h, q| 10_000 - (w as usize) * 10 + (q * 100.0) as usize);
        let fitter = SizeFitter::new(codec);
        let result = fitter.fit(&SyntheticCodec::source(100, 100), 10).unwrap();

        let min = result.attempts.iter().map(|a| a.size).min().unwrap();
        assert_eq!(result.candidate.size(), min);
        assert!(!result.met_target);

        // Later attempts were drawn smaller, but the returned one was not
        assert!(result.dimensions_reduced);
        assert!(!result.candidate_reduced());
        assert_eq!((result.candidate.width, result.candidate.height), (100, 100));
    }

    #[test]
    fn test_attempts_are_monotonic_and_unique() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), KB).unwrap();

        for pair in result.attempts.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(b.quality <= a.quality, "quality increased: {:?} -> {:?}", a, b);
            assert!(b.scale <= a.scale, "scale increased: {:?} -> {:?}", a, b);
            assert!(b.width <= a.width && b.height <= a.height);
            assert!(
                b.quality < a.quality || b.scale < a.scale,
                "no progress: {:?} -> {:?}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_iteration_bound() {
        // ceil((0.9 - 0.1) / 0.1) * ceil((1.0 - 0.5) / 0.1)
        let bound = 8 * 5;
        let fitter = SizeFitter::new(scenario_codec());

        for target in [1, KB, 50 * KB, 100 * KB, 300 * KB, 10_000 * KB] {
            let result = fitter.fit(&scenario_source(), target).unwrap();
            assert!(result.iterations() <= bound);
            assert!(result.iterations() <= fitter.config().max_attempts() as usize);
        }
    }

    #[test]
    fn test_dimensions_never_exceed_original() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), KB).unwrap();
        for attempt in &result.attempts {
            assert!(attempt.width <= 100 && attempt.height <= 80);
            assert!(attempt.scale > 0.0 && attempt.scale <= 1.0);
        }
        assert_eq!(result.original_dimensions, (100, 80));
    }

    #[test]
    fn test_draws_once_per_size() {
        let fitter = SizeFitter::new(scenario_codec());
        fitter.fit(&scenario_source(), KB).unwrap();

        let draws = fitter.codec().draw_calls();
        assert_eq!(draws, vec![(90, 72), (80, 64), (70, 56), (60, 48), (50, 40)]);
    }

    #[test]
    fn test_candidate_round_trip_dimensions() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), 100 * KB).unwrap();

        let decoded = fitter.codec().decode(&result.candidate.bytes).unwrap();
        assert_eq!(
            decoded.surface.dimensions(),
            (result.candidate.width, result.candidate.height)
        );
        let last = result.attempts.last().unwrap();
        assert_eq!((last.width, last.height), (result.candidate.width, result.candidate.height));
    }

    #[test]
    fn test_sharpness_is_reported() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter.fit(&scenario_source(), 100 * KB).unwrap();
        assert!(result.sharpness_score.is_finite());
        assert!(result.sharpness_score > 0.0);
    }

    #[test]
    fn test_tiny_image_cannot_shrink() {
        let codec = SyntheticCodec::new(|_, _, _| 5000);
        let fitter = SizeFitter::new(codec);
        let result = fitter.fit(&SyntheticCodec::source(1, 1), 10).unwrap();

        assert!(!result.met_target);
        assert!(!result.dimensions_reduced);
        // Every quality once; no scale step changes a 1x1 image
        assert_eq!(result.iterations(), 9);
    }

    #[test]
    fn test_dimensions_reduced_only_when_pixels_drop() {
        // 3x3 at 0.9 floors to 2x2, so the first scale step counts
        let codec = SyntheticCodec::new(|w, _, _| if w < 3 { 1 } else { 5000 });
        let fitter = SizeFitter::new(codec);
        let result = fitter.fit(&SyntheticCodec::source(3, 3), 100).unwrap();

        assert!(result.met_target);
        assert!(result.dimensions_reduced);
        assert_eq!((result.candidate.width, result.candidate.height), (2, 2));
    }

    #[test]
    fn test_zero_target_rejected() {
        let fitter = SizeFitter::new(scenario_codec());
        assert!(matches!(
            fitter.fit(&scenario_source(), 0),
            Err(FitError::InvalidTarget)
        ));
        assert!(fitter.codec().encode_calls().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FitConfig {
            scale_floor: 0.0,
            ..Default::default()
        };
        let fitter = SizeFitter::new(scenario_codec()).with_config(config);
        assert!(matches!(
            fitter.fit(&scenario_source(), KB),
            Err(FitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_decode_failure_propagates() {
        let fitter = SizeFitter::new(scenario_codec());
        assert!(matches!(
            fitter.fit(&[1, 2, 3], KB),
            Err(FitError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_failure_propagates_without_retry() {
        let fitter = SizeFitter::new(scenario_codec().failing_encode_at(2));
        let result = fitter.fit(&scenario_source(), KB);

        assert!(matches!(result, Err(FitError::Encode(_))));
        assert_eq!(fitter.codec().encode_calls().len(), 3);
    }

    #[test]
    fn test_cancel_before_first_attempt() {
        let fitter = SizeFitter::new(scenario_codec());
        let stop = StopAfter::new(0, StopReason::Cancelled);
        let result = fitter.fit_with_stop(&scenario_source(), KB, &stop);

        assert!(matches!(result, Err(FitError::Cancelled(StopReason::Cancelled))));
        assert!(fitter.codec().encode_calls().is_empty());
    }

    #[test]
    fn test_cancel_between_attempts() {
        let fitter = SizeFitter::new(scenario_codec());
        let stop = StopAfter::new(3, StopReason::Cancelled);
        let result = fitter.fit_with_stop(&scenario_source(), KB, &stop);

        assert!(matches!(result, Err(FitError::Cancelled(_))));
        assert_eq!(fitter.codec().encode_calls().len(), 3);
    }

    #[test]
    fn test_timeout_reason_is_kept() {
        let fitter = SizeFitter::new(scenario_codec());
        let stop = StopAfter::new(1, StopReason::TimedOut);
        let result = fitter.fit_with_stop(&scenario_source(), KB, &stop);

        assert!(matches!(result, Err(FitError::Cancelled(StopReason::TimedOut))));
        assert_eq!(fitter.codec().encode_calls().len(), 1);
    }

    #[test]
    fn test_unstoppable_runs_to_completion() {
        let fitter = SizeFitter::new(scenario_codec());
        let result = fitter
            .fit_with_stop(&scenario_source(), KB, &Unstoppable)
            .unwrap();
        assert_eq!(result.iterations(), 14);
    }

    #[test]
    fn test_custom_schedule() {
        let config = FitConfig {
            initial_quality: 0.8,
            quality_step: 0.2,
            quality_floor: 0.4,
            scale_step: 0.25,
            scale_floor: 0.5,
            unattainable: UnattainablePolicy::BestEffort,
        };
        let fitter = SizeFitter::new(scenario_codec()).with_config(config);
        let result = fitter.fit(&scenario_source(), 1).unwrap();

        let qualities: Vec<f64> = result.attempts.iter().map(|a| a.quality).collect();
        assert_eq!(qualities, vec![0.8, 0.6, 0.4, 0.4, 0.4]);
        let widths: Vec<u32> = result.attempts.iter().map(|a| a.width).collect();
        assert_eq!(widths, vec![100, 100, 100, 75, 50]);
    }

    // ------------------------------------------------------------------
    // With the image-crate codec
    // ------------------------------------------------------------------

    fn noisy_surface(width: u32, height: u32) -> PixelSurface {
        let mut state = 0x2545_F491u32;
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            for _ in 0..3 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                pixels.push((state >> 24) as u8);
            }
            pixels.push(255);
        }
        PixelSurface::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_raster_fit_generous_target() {
        let jpeg = encode_surface(&noisy_surface(64, 64), ImageFormat::Jpeg, 0.95).unwrap();
        let result = fit(&jpeg, 10_000 * KB).unwrap();

        assert!(result.met_target);
        assert_eq!(result.iterations(), 1);
        assert_eq!(result.candidate.format, ImageFormat::Jpeg);
        assert_eq!(&result.candidate.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_raster_fit_impossible_target() {
        let jpeg = encode_surface(&noisy_surface(64, 64), ImageFormat::Jpeg, 0.95).unwrap();
        let result = fit(&jpeg, 1).unwrap();

        assert!(!result.met_target);
        assert!(result.dimensions_reduced);
        assert_eq!(result.iterations(), 14);
        assert!(result.sharpness_score >= 0.0);

        let decoded = RasterCodec.decode(&result.candidate.bytes).unwrap();
        assert_eq!(
            decoded.surface.dimensions(),
            (result.candidate.width, result.candidate.height)
        );
    }

    #[test]
    fn test_raster_png_skips_quality_axis() {
        let png = encode_surface(&noisy_surface(40, 40), ImageFormat::Png, 0.9).unwrap();
        let result = fit(&png, 1).unwrap();

        assert_eq!(result.candidate.format, ImageFormat::Png);
        // One full-size attempt, then each of the five scale steps
        assert_eq!(result.iterations(), 6);
        let sizes: Vec<u32> = result.attempts.iter().map(|a| a.width).collect();
        assert_eq!(sizes, vec![40, 36, 32, 28, 24, 20]);
    }
}
