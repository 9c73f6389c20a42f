//! Arc-length sampler turning dense pointer motion into spaced edit points

use crate::config::validate_length;
use quill_core::{Result, Vec3};

/// Emits a point each time the accumulated travel reaches the threshold.
///
/// The accumulator restarts at zero on every emission; distance past the
/// threshold is not carried into the next sample.
#[derive(Debug, Clone)]
pub struct Sampler {
    last: Vec3,
    travelled: f64,
    threshold: f64,
}

impl Sampler {
    pub fn new(threshold: f64) -> Result<Self> {
        validate_length(threshold)?;
        Ok(Self {
            last: Vec3::ZERO,
            travelled: 0.0,
            threshold,
        })
    }

    /// Start a new stroke at `anchor`
    pub fn reset(&mut self, anchor: Vec3) {
        self.last = anchor;
        self.travelled = 0.0;
    }

    /// Feed the next projected pointer position. Returns it if it becomes an edit point.
    pub fn on_drag_point(&mut self, projected: Vec3) -> Option<Vec3> {
        self.travelled += projected.distance_to(&self.last);
        self.last = projected;
        if self.travelled >= self.threshold {
            self.travelled = 0.0;
            Some(projected)
        } else {
            None
        }
    }

    /// Most recent projected position
    pub fn last_point(&self) -> Vec3 {
        self.last
    }

    /// Distance accumulated since the last emission
    pub fn travelled(&self) -> f64 {
        self.travelled
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Change the spacing. Takes effect on the next drag point, even mid-stroke.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        validate_length(threshold)?;
        self.threshold = threshold;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emits_every_threshold() {
        let mut sampler = Sampler::new(1.0).unwrap();
        sampler.reset(Vec3::ZERO);

        // 0.25 steps along x: every fourth point crosses the threshold
        let mut emitted = Vec::new();
        for i in 1..=12 {
            let p = Vec3::new(i as f64 * 0.25, 0.0, 0.0);
            if let Some(e) = sampler.on_drag_point(p) {
                emitted.push(e);
            }
        }
        assert_eq!(
            emitted,
            vec![
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_equality_triggers() {
        let mut sampler = Sampler::new(0.5).unwrap();
        sampler.reset(Vec3::ZERO);
        assert_eq!(sampler.on_drag_point(Vec3::new(0.0, 0.5, 0.0)), Some(Vec3::new(0.0, 0.5, 0.0)));
    }

    #[test]
    fn test_no_carry_over() {
        let mut sampler = Sampler::new(1.0).unwrap();
        sampler.reset(Vec3::ZERO);
        assert!(sampler.on_drag_point(Vec3::new(1.5, 0.0, 0.0)).is_some());
        // Only 0.75 travelled since the emission, the 0.5 overshoot is dropped
        assert!(sampler.on_drag_point(Vec3::new(2.25, 0.0, 0.0)).is_none());
        assert_eq!(sampler.travelled(), 0.75);
    }

    #[test]
    fn test_accumulates_along_path_not_chord() {
        let mut sampler = Sampler::new(1.0).unwrap();
        sampler.reset(Vec3::ZERO);
        assert!(sampler.on_drag_point(Vec3::new(0.5, 0.0, 0.0)).is_none());
        // Back to the start: chord is 0, path is 1
        assert_eq!(sampler.on_drag_point(Vec3::ZERO), Some(Vec3::ZERO));
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut sampler = Sampler::new(1.0).unwrap();
        sampler.reset(Vec3::ZERO);
        sampler.on_drag_point(Vec3::new(0.75, 0.0, 0.0));
        sampler.reset(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(sampler.travelled(), 0.0);
        assert_eq!(sampler.last_point(), Vec3::new(10.0, 0.0, 0.0));
        assert!(sampler.on_drag_point(Vec3::new(10.5, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_threshold_change_mid_stroke() {
        let mut sampler = Sampler::new(1.0).unwrap();
        sampler.reset(Vec3::ZERO);
        assert!(sampler.on_drag_point(Vec3::new(0.5, 0.0, 0.0)).is_none());
        sampler.set_threshold(0.75).unwrap();
        assert!(sampler.on_drag_point(Vec3::new(0.75, 0.0, 0.0)).is_some());
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(Sampler::new(0.0).is_err());
        let mut sampler = Sampler::new(1.0).unwrap();
        assert!(sampler.set_threshold(f64::NAN).is_err());
        assert_eq!(sampler.threshold(), 1.0);
    }
}
