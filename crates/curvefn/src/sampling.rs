//! Curve sampling
//!
//! Turns a compiled expression into points: a fixed grid, an adaptively
//! refined polyline, continuous segments split at discontinuities, or a
//! lookup table for GPU-style consumers.
//!
//! # Example
//!
//! ```rust
//! use curvefn::prelude::*;
//!
//! let f = compile("x^2");
//! let options = SampleOptions {
//!     x_min: -1.0,
//!     x_max: 1.0,
//!     resolution: 4,
//!     ..Default::default()
//! };
//! let set = f.sample(&options).unwrap();
//! assert_eq!(set.len(), 5);
//! assert_eq!(set.points[0].y, 1.0);
//! ```

use crate::CompiledExpression;
use std::f64::consts::PI;
use thiserror::Error;

/// Largest number of grid samples a single request may produce
pub const MAX_SAMPLES: usize = 1 << 24;

/// Largest number of extra points inserted between two neighbouring samples
pub const MAX_SUBDIVISIONS: usize = 4096;

/// Window ends closer than this to a grid point are not sampled again
const PI_GRID_EPSILON: f64 = 0.001;

/// Result type for sampling operations
pub type SamplingResult<T> = std::result::Result<T, SamplingError>;

/// Invalid sampling options
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("Resolution must be at least 1")]
    ZeroResolution,

    #[error("Invalid sampling window [{x_min}, {x_max}]")]
    InvalidWindow { x_min: f64, x_max: f64 },

    #[error("Invalid clamp range [{min}, {max}]")]
    InvalidClamp { min: f64, max: f64 },

    #[error("{name} must be finite and positive (got {value})")]
    InvalidLength { name: &'static str, value: f64 },

    #[error("Lookup table needs at least 2 samples (got {0})")]
    LutTooSmall(usize),

    #[error("More than {max} samples requested")]
    TooManySamples { max: usize },
}

/// Replaces evaluations close to `x = 0` with a large finite value
///
/// Used where `1/x`-style spikes must stay renderable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearZeroGuard {
    /// Guard applies when `|x| < threshold`
    pub threshold: f64,
    /// Value substituted, carrying the sign of `x` (`+` at zero)
    pub magnitude: f64,
}

impl Default for NearZeroGuard {
    fn default() -> Self {
        Self {
            threshold: 0.01,
            magnitude: 100.0,
        }
    }
}

impl NearZeroGuard {
    fn apply(&self, x: f64) -> Option<f64> {
        if x.abs() < self.threshold {
            Some(if x < 0.0 { -self.magnitude } else { self.magnitude })
        } else {
            None
        }
    }
}

/// Placement of the base samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleGrid {
    /// `resolution + 1` evenly spaced points from `x_min` to `x_max`
    #[default]
    Uniform,
    /// Every multiple of `π / resolution` in the window, plus the window ends
    PiAligned,
}

/// Options for grid sampling
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOptions {
    pub x_min: f64,
    pub x_max: f64,
    /// Number of intervals (uniform) or subdivisions of π (pi-aligned)
    pub resolution: usize,
    pub grid: SampleGrid,
    /// Clamp finite results into `[min, max]`
    pub clamp: Option<(f64, f64)>,
    pub near_zero: Option<NearZeroGuard>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            resolution: 100,
            grid: SampleGrid::Uniform,
            clamp: None,
            near_zero: None,
        }
    }
}

impl SampleOptions {
    /// Uniform grid over `[x_min, x_max]`
    pub fn new(x_min: f64, x_max: f64, resolution: usize) -> Self {
        Self {
            x_min,
            x_max,
            resolution,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> SamplingResult<()> {
        if self.resolution == 0 {
            return Err(SamplingError::ZeroResolution);
        }
        if !self.x_min.is_finite() || !self.x_max.is_finite() || self.x_min >= self.x_max {
            return Err(SamplingError::InvalidWindow {
                x_min: self.x_min,
                x_max: self.x_max,
            });
        }
        validate_clamp(self.clamp)
    }

    /// The x values of the base grid
    pub fn grid_xs(&self) -> SamplingResult<Vec<f64>> {
        self.validate()?;
        match self.grid {
            SampleGrid::Uniform => self.uniform_xs(),
            SampleGrid::PiAligned => self.pi_aligned_xs(),
        }
    }

    fn uniform_xs(&self) -> SamplingResult<Vec<f64>> {
        if self.resolution >= MAX_SAMPLES {
            return Err(SamplingError::TooManySamples { max: MAX_SAMPLES });
        }

        let intervals = self.resolution as f64;
        let width = self.x_max - self.x_min;
        // Wide windows overflow `x_max - x_min`; scale the ends first
        let step = if width.is_finite() {
            width / intervals
        } else {
            self.x_max / intervals - self.x_min / intervals
        };
        Ok((0..=self.resolution)
            .map(|i| {
                if i == self.resolution {
                    self.x_max
                } else {
                    self.x_min + i as f64 * step
                }
            })
            .collect())
    }

    fn pi_aligned_xs(&self) -> SamplingResult<Vec<f64>> {
        if self.x_max - self.x_min < PI_GRID_EPSILON {
            return Err(SamplingError::InvalidWindow {
                x_min: self.x_min,
                x_max: self.x_max,
            });
        }

        let step = PI / self.resolution as f64;
        let first = (self.x_min / step).ceil();
        let last = (self.x_max / step).floor();
        let count = last - first + 1.0;

        if count > MAX_SAMPLES as f64 {
            return Err(SamplingError::TooManySamples { max: MAX_SAMPLES });
        }

        let mut xs = Vec::with_capacity(count.max(0.0) as usize + 2);
        if count >= 1.0 {
            for k in 0..count as usize {
                let x = (first + k as f64) * step;
                if x >= self.x_min && x <= self.x_max {
                    xs.push(x);
                }
            }
        }

        if xs.first().map_or(true, |&x| x > self.x_min + PI_GRID_EPSILON) {
            xs.insert(0, self.x_min);
        }
        if xs.last().map_or(true, |&x| x < self.x_max - PI_GRID_EPSILON) {
            xs.push(self.x_max);
        }

        Ok(xs)
    }
}

fn validate_clamp(clamp: Option<(f64, f64)>) -> SamplingResult<()> {
    match clamp {
        Some((min, max)) if min.is_nan() || max.is_nan() || min > max => {
            Err(SamplingError::InvalidClamp { min, max })
        }
        _ => Ok(()),
    }
}

fn validate_length(name: &'static str, value: f64) -> SamplingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SamplingError::InvalidLength { name, value })
    }
}

/// Counters collected while sampling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Samples taken, including guarded ones
    pub evaluations: usize,
    /// Samples that came out NaN or infinite, or too large for a LUT entry
    pub invalid: usize,
    /// Samples changed by the clamp
    pub clamped: usize,
    /// Samples replaced by the near-zero guard
    pub guarded: usize,
}

/// A single sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    /// `y` is finite
    pub valid: bool,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            valid: y.is_finite(),
        }
    }

    fn distance(&self, other: &SamplePoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Result of [`sample`] and [`sample_adaptive`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub points: Vec<SamplePoint>,
    pub stats: SamplingStats,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with a finite `y`
    pub fn valid_points(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter().filter(|p| p.valid)
    }

    /// `(x, y)` pairs of every point
    pub fn coords(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y))
    }
}

/// A maximal run of valid samples drawable as one polyline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSegment {
    pub points: Vec<SamplePoint>,
}

impl CurveSegment {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y))
    }
}

/// Result of [`segment`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentSet {
    pub segments: Vec<CurveSegment>,
    pub stats: SamplingStats,
}

impl SegmentSet {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurveSegment> {
        self.segments.iter()
    }

    /// Points across all segments
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(CurveSegment::len).sum()
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a CurveSegment;
    type IntoIter = std::slice::Iter<'a, CurveSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Options for [`segment`]
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOptions {
    /// Base grid
    pub sample: SampleOptions,
    /// Gaps longer than this are subdivided
    pub max_segment_length: f64,
    /// Jumps longer than this start a new segment
    pub max_draw_length: f64,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            sample: SampleOptions {
                grid: SampleGrid::PiAligned,
                ..Default::default()
            },
            max_segment_length: 1.0,
            max_draw_length: 10.0,
        }
    }
}

/// Options for [`build_lut`]
#[derive(Debug, Clone, PartialEq)]
pub struct LutOptions {
    /// Number of entries
    pub size: usize,
    /// Width of the covered window, centred on zero
    pub range: f64,
    pub clamp: Option<(f64, f64)>,
    pub near_zero: Option<NearZeroGuard>,
}

impl Default for LutOptions {
    fn default() -> Self {
        Self {
            size: 8192,
            range: 30.0,
            clamp: Some((-50.0, 50.0)),
            near_zero: Some(NearZeroGuard::default()),
        }
    }
}

/// Precomputed samples over `[-range/2, range/2]`
#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    values: Vec<f32>,
    range: f64,
    stats: SamplingStats,
}

impl Lut {
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a table has at least 2 entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn stats(&self) -> SamplingStats {
        self.stats
    }

    /// The x value sampled for entry `index`
    pub fn x_at(&self, index: usize) -> f64 {
        let t = index as f64 / (self.values.len() - 1) as f64;
        (t - 0.5) * self.range
    }

    /// Read back with linear filtering and clamp-to-edge addressing
    pub fn lookup(&self, x: f64) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }

        let last = self.values.len() - 1;
        let pos = ((x / self.range + 0.5) * last as f64).clamp(0.0, last as f64);
        let i0 = pos.floor() as usize;
        let i1 = (i0 + 1).min(last);
        let frac = (pos - i0 as f64) as f32;

        let a = self.values[i0];
        let b = self.values[i1];
        a + (b - a) * frac
    }
}

/// Evaluates one sample at a time under a guard and clamp
struct Sampler<'a> {
    expr: &'a CompiledExpression,
    clamp: Option<(f64, f64)>,
    near_zero: Option<NearZeroGuard>,
    stats: SamplingStats,
}

impl<'a> Sampler<'a> {
    fn new(
        expr: &'a CompiledExpression,
        clamp: Option<(f64, f64)>,
        near_zero: Option<NearZeroGuard>,
    ) -> Self {
        Self {
            expr,
            clamp,
            near_zero,
            stats: SamplingStats::default(),
        }
    }

    fn eval(&mut self, x: f64) -> f64 {
        self.stats.evaluations += 1;

        let y = match self.near_zero.and_then(|guard| guard.apply(x)) {
            Some(y) => {
                self.stats.guarded += 1;
                y
            }
            None => self.expr.evaluate(x),
        };

        let y = match self.clamp {
            Some((min, max)) if y.is_finite() => {
                let clamped = y.clamp(min, max);
                if clamped != y {
                    self.stats.clamped += 1;
                }
                clamped
            }
            _ => y,
        };

        if !y.is_finite() {
            self.stats.invalid += 1;
        }
        y
    }

    fn point(&mut self, x: f64) -> SamplePoint {
        SamplePoint::new(x, self.eval(x))
    }
}

/// Evenly spaced x values strictly between `a` and `b`
fn subdivision_xs(a: &SamplePoint, b: &SamplePoint, max_length: f64) -> impl Iterator<Item = f64> {
    let subdivisions = ((a.distance(b) / max_length).ceil() as usize).min(MAX_SUBDIVISIONS);
    let (x0, x1) = (a.x, b.x);
    (1..subdivisions).map(move |j| {
        let t = j as f64 / subdivisions as f64;
        x0 + (x1 - x0) * t
    })
}

/// Sample `expr` on the grid described by `options`
pub fn sample(expr: &CompiledExpression, options: &SampleOptions) -> SamplingResult<SampleSet> {
    let xs = options.grid_xs()?;
    let mut sampler = Sampler::new(expr, options.clamp, options.near_zero);
    let points: Vec<SamplePoint> = xs.into_iter().map(|x| sampler.point(x)).collect();

    tracing::debug!(
        source = expr.source(),
        points = points.len(),
        invalid = sampler.stats.invalid,
        clamped = sampler.stats.clamped,
        guarded = sampler.stats.guarded,
        "sampled curve"
    );

    Ok(SampleSet {
        points,
        stats: sampler.stats,
    })
}

/// Sample, drop invalid points and refine long gaps
///
/// Between neighbouring kept points further apart than `max_segment_length`
/// (euclidean in `(x, y)`), `ceil(d / max_segment_length) - 1` evenly spaced
/// extra samples are inserted; invalid ones are dropped.
pub fn sample_adaptive(
    expr: &CompiledExpression,
    options: &SampleOptions,
    max_segment_length: f64,
) -> SamplingResult<SampleSet> {
    validate_length("max_segment_length", max_segment_length)?;
    let xs = options.grid_xs()?;
    let mut sampler = Sampler::new(expr, options.clamp, options.near_zero);

    let base: Vec<SamplePoint> = xs
        .into_iter()
        .map(|x| sampler.point(x))
        .filter(|p| p.valid)
        .collect();

    let points = if base.len() > 1 {
        let mut points = Vec::with_capacity(base.len());
        points.push(base[0]);

        for pair in base.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.distance(b) > max_segment_length {
                for x in subdivision_xs(a, b, max_segment_length) {
                    let p = sampler.point(x);
                    if p.valid {
                        points.push(p);
                    }
                }
            }
            points.push(*b);
        }
        points
    } else {
        base
    };

    tracing::debug!(
        source = expr.source(),
        points = points.len(),
        evaluations = sampler.stats.evaluations,
        invalid = sampler.stats.invalid,
        "adaptively sampled curve"
    );

    Ok(SampleSet {
        points,
        stats: sampler.stats,
    })
}

/// Split `expr` into continuous segments
///
/// An invalid sample ends the current segment. A jump longer than
/// `max_draw_length` starts a new segment at the current point. A gap longer
/// than `max_segment_length` is subdivided; an invalid sub-sample ends the
/// current segment. Segments with fewer than 2 points are dropped.
pub fn segment(expr: &CompiledExpression, options: &SegmentOptions) -> SamplingResult<SegmentSet> {
    validate_length("max_segment_length", options.max_segment_length)?;
    validate_length("max_draw_length", options.max_draw_length)?;
    let xs = options.sample.grid_xs()?;
    let mut sampler = Sampler::new(expr, options.sample.clamp, options.sample.near_zero);

    let mut segments = Vec::new();
    let mut current: Vec<SamplePoint> = Vec::new();

    for x in xs {
        let point = sampler.point(x);

        if !point.valid {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            continue;
        }

        let last = match current.last() {
            Some(last) => *last,
            None => {
                current.push(point);
                continue;
            }
        };

        let distance = last.distance(&point);
        if distance > options.max_draw_length {
            segments.push(std::mem::take(&mut current));
            current.push(point);
            continue;
        }

        if distance > options.max_segment_length {
            for sub_x in subdivision_xs(&last, &point, options.max_segment_length) {
                let sub = sampler.point(sub_x);
                if sub.valid {
                    current.push(sub);
                } else {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    break;
                }
            }
        }

        current.push(point);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    let total = segments.len();
    let segments: Vec<CurveSegment> = segments
        .into_iter()
        .filter(|points| points.len() >= 2)
        .map(|points| CurveSegment { points })
        .collect();

    tracing::debug!(
        source = expr.source(),
        segments = segments.len(),
        dropped = total - segments.len(),
        invalid = sampler.stats.invalid,
        "segmented curve"
    );

    Ok(SegmentSet {
        segments,
        stats: sampler.stats,
    })
}

/// Precompute `expr` into a lookup table
///
/// Non-finite samples are stored as `0.0`.
pub fn build_lut(expr: &CompiledExpression, options: &LutOptions) -> SamplingResult<Lut> {
    if options.size < 2 {
        return Err(SamplingError::LutTooSmall(options.size));
    }
    if options.size > MAX_SAMPLES {
        return Err(SamplingError::TooManySamples { max: MAX_SAMPLES });
    }
    validate_length("range", options.range)?;
    validate_clamp(options.clamp)?;

    let mut sampler = Sampler::new(expr, options.clamp, options.near_zero);
    let last = (options.size - 1) as f64;

    let values: Vec<f32> = (0..options.size)
        .map(|i| {
            let t = i as f64 / last;
            let y = sampler.eval((t - 0.5) * options.range);
            let value = y as f32;
            if value.is_finite() {
                value
            } else {
                // Finite in f64 but out of f32 range
                if y.is_finite() {
                    sampler.stats.invalid += 1;
                }
                0.0
            }
        })
        .collect();

    tracing::debug!(
        source = expr.source(),
        size = values.len(),
        range = options.range,
        invalid = sampler.stats.invalid,
        guarded = sampler.stats.guarded,
        "built lookup table"
    );

    Ok(Lut {
        values,
        range: options.range,
        stats: sampler.stats,
    })
}

/// Extension trait adding the sampling helpers to [`CompiledExpression`]
pub trait ExpressionSamplingExt {
    /// See [`sample`]
    fn sample(&self, options: &SampleOptions) -> SamplingResult<SampleSet>;

    /// See [`sample_adaptive`]
    fn sample_adaptive(
        &self,
        options: &SampleOptions,
        max_segment_length: f64,
    ) -> SamplingResult<SampleSet>;

    /// See [`segment`]
    fn segment(&self, options: &SegmentOptions) -> SamplingResult<SegmentSet>;

    /// See [`build_lut`]
    fn build_lut(&self, options: &LutOptions) -> SamplingResult<Lut>;
}

impl ExpressionSamplingExt for CompiledExpression {
    fn sample(&self, options: &SampleOptions) -> SamplingResult<SampleSet> {
        sample(self, options)
    }

    fn sample_adaptive(
        &self,
        options: &SampleOptions,
        max_segment_length: f64,
    ) -> SamplingResult<SampleSet> {
        sample_adaptive(self, options, max_segment_length)
    }

    fn segment(&self, options: &SegmentOptions) -> SamplingResult<SegmentSet> {
        segment(self, options)
    }

    fn build_lut(&self, options: &LutOptions) -> SamplingResult<Lut> {
        build_lut(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use pretty_assertions::assert_eq;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_uniform_grid() {
        let xs = SampleOptions::new(-1.0, 1.0, 4).grid_xs().unwrap();
        assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_uniform_grid_wide_window() {
        let xs = SampleOptions::new(-1e308, 1e308, 4).grid_xs().unwrap();
        assert_eq!(xs.len(), 5);
        assert_eq!(xs[0], -1e308);
        assert_eq!(xs[2], 0.0);
        assert_eq!(xs[4], 1e308);
        assert!(xs.iter().all(|x| x.is_finite()));
        assert!(xs.windows(2).all(|pair| pair[0] < pair[1]));

        let set = sample(&compile("x"), &SampleOptions::new(-f64::MAX, f64::MAX, 2)).unwrap();
        assert_eq!(set.stats.invalid, 0);
        assert_eq!(set.points[1].x, 0.0);
    }

    #[test]
    fn test_pi_aligned_grid() {
        let options = SampleOptions {
            x_min: 0.0,
            x_max: PI,
            resolution: 2,
            grid: SampleGrid::PiAligned,
            ..Default::default()
        };
        let xs = options.grid_xs().unwrap();
        assert_eq!(xs.len(), 3);
        assert_approx(xs[1], PI / 2.0);

        // Window ends off the grid are sampled too
        let options = SampleOptions {
            x_min: 0.5,
            x_max: 2.0,
            ..options
        };
        let xs = options.grid_xs().unwrap();
        assert_eq!(xs.len(), 3);
        assert_eq!(xs[0], 0.5);
        assert_approx(xs[1], PI / 2.0);
        assert_eq!(xs[2], 2.0);

        // No grid point inside the window at all
        let options = SampleOptions {
            x_min: 0.1,
            x_max: 0.2,
            resolution: 1,
            ..options
        };
        assert_eq!(options.grid_xs().unwrap(), vec![0.1, 0.2]);

        // Narrower than the grid tolerance
        let options = SampleOptions {
            x_min: 0.1,
            x_max: 0.1005,
            ..options
        };
        assert!(matches!(
            options.grid_xs(),
            Err(SamplingError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_invalid_options() {
        let f = compile("x");
        assert_eq!(
            sample(&f, &SampleOptions::new(0.0, 1.0, 0)),
            Err(SamplingError::ZeroResolution)
        );
        assert!(matches!(
            sample(&f, &SampleOptions::new(1.0, 0.0, 10)),
            Err(SamplingError::InvalidWindow { .. })
        ));
        assert!(matches!(
            sample(&f, &SampleOptions::new(f64::NEG_INFINITY, 0.0, 10)),
            Err(SamplingError::InvalidWindow { .. })
        ));
        assert!(matches!(
            sample_adaptive(&f, &SampleOptions::default(), 0.0),
            Err(SamplingError::InvalidLength { name: "max_segment_length", .. })
        ));
        let clamp = SampleOptions {
            clamp: Some((1.0, -1.0)),
            ..Default::default()
        };
        assert!(matches!(
            sample(&f, &clamp),
            Err(SamplingError::InvalidClamp { .. })
        ));
        assert_eq!(
            sample(&f, &SampleOptions::new(0.0, 1.0, MAX_SAMPLES)),
            Err(SamplingError::TooManySamples { max: MAX_SAMPLES })
        );
    }

    #[test]
    fn test_sample_marks_invalid() {
        let set = sample(&compile("ln(x)"), &SampleOptions::new(-1.0, 1.0, 2)).unwrap();
        assert_eq!(set.len(), 3);
        assert!(!set.points[0].valid);
        assert!(!set.points[1].valid);
        assert!(set.points[2].valid);
        assert_eq!(set.stats.invalid, 2);
        assert_eq!(set.valid_points().count(), 1);
    }

    #[test]
    fn test_sample_clamp() {
        let options = SampleOptions {
            clamp: Some((-2.0, 2.0)),
            ..SampleOptions::new(-3.0, 3.0, 6)
        };
        let set = sample(&compile("x"), &options).unwrap();
        let ys: Vec<f64> = set.points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![-2.0, -2.0, -1.0, 0.0, 1.0, 2.0, 2.0]);
        assert_eq!(set.stats.clamped, 2);

        // Clamp leaves non-finite values alone
        let options = SampleOptions {
            clamp: Some((-2.0, 2.0)),
            ..SampleOptions::new(-1.0, 1.0, 2)
        };
        let set = sample(&compile("1/x"), &options).unwrap();
        assert_eq!(set.points[1].y, f64::INFINITY);
        assert!(!set.points[1].valid);
    }

    #[test]
    fn test_sample_near_zero_guard() {
        let options = SampleOptions {
            near_zero: Some(NearZeroGuard::default()),
            ..SampleOptions::new(-1.0, 1.0, 2)
        };
        let set = sample(&compile("1/x"), &options).unwrap();
        assert_eq!(set.points[1].y, 100.0);
        assert_eq!(set.stats.guarded, 1);
        assert_eq!(set.stats.invalid, 0);

        let guard = NearZeroGuard::default();
        assert_eq!(guard.apply(-0.005), Some(-100.0));
        assert_eq!(guard.apply(0.0), Some(100.0));
        assert_eq!(guard.apply(0.5), None);
    }

    #[test]
    fn test_sample_adaptive_inserts_points() {
        // Two samples 10 apart vertically: ceil(sqrt(1 + 100) / 1) - 1 = 10 extra
        let f = compile("10x");
        let set = sample_adaptive(&f, &SampleOptions::new(0.0, 1.0, 1), 1.0).unwrap();
        assert_eq!(set.len(), 12);
        assert_eq!(set.points[0].x, 0.0);
        assert_eq!(set.points[11].x, 1.0);
        for pair in set.points.windows(2) {
            assert!(pair[0].distance(&pair[1]) <= 1.0 + 1e-9);
        }

        // Flat function needs nothing extra
        let set = sample_adaptive(&compile("1"), &SampleOptions::new(0.0, 1.0, 4), 1.0).unwrap();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_sample_adaptive_drops_invalid() {
        let set = sample_adaptive(&compile("ln(x)"), &SampleOptions::new(-1.0, 1.0, 4), 100.0).unwrap();
        assert!(set.points.iter().all(|p| p.valid && p.x > 0.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sample_adaptive_drops_invalid_subsamples() {
        // Undefined on (0.5, 1.5); the gap 0 -> 2 is refined at 0.4, 0.8, 1.2, 1.6
        let f = compile("sqrt(abs(x-1)-0.5)");
        let set = sample_adaptive(&f, &SampleOptions::new(0.0, 4.0, 2), 0.45).unwrap();
        assert!(set.points.iter().all(|p| p.valid));
        assert_eq!(set.stats.invalid, 2);

        let xs: Vec<f64> = set.points.iter().map(|p| p.x).collect();
        assert_eq!(xs.len(), 9);
        assert_approx(xs[1], 0.4);
        assert_approx(xs[2], 1.6);
        assert_eq!(xs[3], 2.0);
        assert_eq!(xs[8], 4.0);
    }

    #[test]
    fn test_segment_invalid_subsample_splits() {
        // Grid points 0, 2 and 4 are all defined, but the refinement between
        // 0 and 2 runs into the undefined region (0.5, 1.5)
        let options = SegmentOptions {
            sample: SampleOptions::new(0.0, 4.0, 2),
            max_segment_length: 0.45,
            max_draw_length: 10.0,
        };
        let set = segment(&compile("sqrt(abs(x-1)-0.5)"), &options).unwrap();
        assert_eq!(set.len(), 2);

        let first: Vec<f64> = set.segments[0].points.iter().map(|p| p.x).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], 0.0);
        assert_approx(first[1], 0.4);

        // The grid point after the break starts the next segment
        let second = &set.segments[1].points;
        assert_eq!(second[0].x, 2.0);
        assert_eq!(second.last().map(|p| p.x), Some(4.0));
        assert_eq!(second.len(), 6);
        assert!(set.iter().all(|s| s.points.iter().all(|p| p.valid)));
    }

    #[test]
    fn test_segment_reciprocal() {
        let options = SegmentOptions {
            sample: SampleOptions::new(-5.0, 5.0, 100),
            ..Default::default()
        };
        let set = segment(&compile("1/x"), &options).unwrap();
        assert!(set.len() >= 2);
        for segment in &set {
            assert!(segment.len() >= 2);
            let negative = segment.points[0].x < 0.0;
            assert!(segment.points.iter().all(|p| (p.x < 0.0) == negative));
        }
    }

    #[test]
    fn test_segment_tangent() {
        let options = SegmentOptions {
            sample: SampleOptions {
                x_min: -5.0,
                x_max: 5.0,
                grid: SampleGrid::PiAligned,
                ..Default::default()
            },
            ..Default::default()
        };
        let set = segment(&compile("tan(x)"), &options).unwrap();
        assert!(set.len() >= 3);

        // No segment crosses an asymptote
        for segment in &set {
            let branch = |x: f64| ((x + PI / 2.0) / PI).floor() as i64;
            let first = branch(segment.points[0].x);
            assert!(segment.points.iter().all(|p| branch(p.x) == first));
            assert!(segment.points.iter().all(|p| p.valid));
        }
    }

    #[test]
    fn test_segment_continuous() {
        let set = segment(&compile("sin(x)"), &SegmentOptions::default()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.point_count() > 600);
    }

    #[test]
    fn test_segment_drops_single_points() {
        // Only x = 1 is defined and it is isolated
        let options = SegmentOptions {
            sample: SampleOptions::new(-1.0, 1.0, 2),
            ..Default::default()
        };
        let set = segment(&compile("ln(x)"), &options).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_lut_defaults() {
        let lut = build_lut(&compile("1/x"), &LutOptions::default()).unwrap();
        assert_eq!(lut.len(), 8192);
        assert_eq!(lut.x_at(0), -15.0);
        assert_eq!(lut.x_at(8191), 15.0);
        assert!(lut.values().iter().all(|v| v.is_finite() && v.abs() <= 100.0));
        assert!(lut.stats().guarded > 0);
    }

    #[test]
    fn test_lut_lookup() {
        let options = LutOptions {
            size: 5,
            range: 4.0,
            clamp: None,
            near_zero: None,
        };
        let lut = build_lut(&compile("x"), &options).unwrap();
        assert_eq!(lut.values(), &[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(lut.lookup(0.5), 0.5);
        assert_eq!(lut.lookup(-1.0), -1.0);
        // Clamp-to-edge
        assert_eq!(lut.lookup(10.0), 2.0);
        assert_eq!(lut.lookup(-10.0), -2.0);
        assert!(lut.lookup(f64::NAN).is_nan());
    }

    #[test]
    fn test_lut_non_finite_stored_as_zero() {
        let options = LutOptions {
            size: 3,
            range: 2.0,
            clamp: None,
            near_zero: None,
        };
        let lut = build_lut(&compile("ln(x)"), &options).unwrap();
        assert_eq!(lut.values(), &[0.0, 0.0, 0.0]);
        assert_eq!(lut.stats().invalid, 2);
    }

    #[test]
    fn test_lut_counts_f32_overflow_as_invalid() {
        let options = LutOptions {
            size: 2,
            range: 2.0,
            clamp: None,
            near_zero: None,
        };
        let lut = build_lut(&compile("10^39"), &options).unwrap();
        assert_eq!(lut.values(), &[0.0, 0.0]);
        assert_eq!(lut.stats().invalid, 2);
    }

    #[test]
    fn test_lut_invalid_options() {
        let f = compile("x");
        let small = LutOptions {
            size: 1,
            ..Default::default()
        };
        assert_eq!(build_lut(&f, &small), Err(SamplingError::LutTooSmall(1)));

        let range = LutOptions {
            range: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            build_lut(&f, &range),
            Err(SamplingError::InvalidLength { name: "range", .. })
        ));
    }

    #[test]
    fn test_extension_trait() {
        let f = compile("x²");
        let set = f.sample(&SampleOptions::new(0.0, 2.0, 2)).unwrap();
        let ys: Vec<f64> = set.points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 1.0, 4.0]);
        assert!(f.build_lut(&LutOptions::default()).is_ok());
    }
}
