//! Resumable per-frame effects
//!
//! Long running visual transitions are small state objects advanced once per
//! tick. They finish on their own once a convergence threshold is reached and
//! can be cancelled by simply dropping them (see [`EffectSlot`]).

use crate::lerp;

/// A transition advanced by the host once per tick
pub trait Effect {
    /// Advance by `dt` seconds
    fn advance(&mut self, dt: f32);
    /// Whether further calls to [`Effect::advance`] still change anything
    fn is_active(&self) -> bool;
}

/// Holds at most one running effect; starting a new one discards the old one
#[derive(Debug, Clone)]
pub struct EffectSlot<E> {
    current: Option<E>,
}

impl<E> Default for EffectSlot<E> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<E: Effect> EffectSlot<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is running
    pub fn start(&mut self, effect: E) {
        self.current = Some(effect);
    }

    pub fn cancel(&mut self) -> Option<E> {
        self.current.take()
    }

    pub fn get(&self) -> Option<&E> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(|e| e.is_active())
    }

    /// Advance the running effect. Returns it once, on the tick it finishes.
    pub fn poll(&mut self, dt: f32) -> Option<E> {
        let effect = self.current.as_mut()?;
        effect.advance(dt);
        if effect.is_active() {
            None
        } else {
            self.current.take()
        }
    }
}

/// Exponential approach of a value toward a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub value: f32,
    pub target: f32,
    /// Time constant: each tick blends by `dt / time`
    pub time: f32,
    /// Finished once within this distance of the target
    pub threshold: f32,
}

impl Approach {
    pub fn new(value: f32, target: f32, time: f32, threshold: f32) -> Self {
        Self {
            value,
            target,
            time,
            threshold,
        }
    }

    fn factor(&self, dt: f32) -> f32 {
        if self.time <= 0.0 { 1.0 } else { dt / self.time }
    }
}

impl Effect for Approach {
    fn advance(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.value = lerp(self.value, self.target, self.factor(dt));
        if !self.is_active() {
            self.value = self.target;
        }
    }

    fn is_active(&self) -> bool {
        (self.value - self.target).abs() > self.threshold
    }
}

/// Scale-in animation for freshly spawned objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowIn {
    inner: Approach,
}

impl GrowIn {
    pub fn new(target_scale: f32, grow_time: f32) -> Self {
        Self {
            inner: Approach::new(0.0, target_scale, grow_time, 0.001),
        }
    }

    pub fn scale(&self) -> f32 {
        self.inner.value
    }
}

impl Effect for GrowIn {
    fn advance(&mut self, dt: f32) {
        self.inner.advance(dt);
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}

/// Screen fade: alpha eases toward a target and counts as done within 0.1 of it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    inner: Approach,
}

impl Fade {
    /// Fade from transparent to opaque
    pub fn out(time: f32) -> Self {
        Self {
            inner: Approach::new(0.0, 1.0, time, 0.1),
        }
    }

    /// Fade from opaque to transparent
    pub fn into_view(time: f32) -> Self {
        Self {
            inner: Approach::new(1.0, 0.0, time, 0.1),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.inner.value
    }
}

impl Effect for Fade {
    fn advance(&mut self, dt: f32) {
        self.inner.advance(dt);
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}

/// Linear volume fade to silence; the source is stopped and its volume restored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeFade {
    pub start_volume: f32,
    pub volume: f32,
    pub fade_time: f32,
}

impl VolumeFade {
    pub fn new(start_volume: f32, fade_time: f32) -> Self {
        Self {
            start_volume,
            volume: start_volume,
            fade_time,
        }
    }
}

impl Effect for VolumeFade {
    fn advance(&mut self, dt: f32) {
        if self.fade_time <= 0.0 {
            self.volume = 0.0;
            return;
        }
        self.volume = (self.volume - self.start_volume * dt / self.fade_time).max(0.0);
    }

    fn is_active(&self) -> bool {
        self.volume > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_snaps_on_convergence() {
        let mut a = Approach::new(0.0, 10.0, 0.5, 0.1);
        let mut ticks = 0;
        while a.is_active() {
            a.advance(0.02);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert_eq!(a.value, 10.0);
    }

    #[test]
    fn test_slot_restart_discards_progress() {
        let mut slot = EffectSlot::new();
        slot.start(Fade::out(0.5));
        slot.poll(0.1);
        let alpha = slot.get().unwrap().alpha();
        assert!(alpha > 0.0);
        slot.start(Fade::out(0.5));
        assert_eq!(slot.get().unwrap().alpha(), 0.0);
    }

    #[test]
    fn test_slot_reports_completion_once() {
        let mut slot = EffectSlot::new();
        slot.start(Fade::out(0.1));
        let mut finished = 0;
        for _ in 0..100 {
            if slot.poll(0.02).is_some() {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert!(!slot.is_active());
    }

    #[test]
    fn test_volume_fade_is_linear() {
        let mut fade = VolumeFade::new(0.8, 1.0);
        fade.advance(0.5);
        assert!((fade.volume - 0.4).abs() < 1e-6);
        fade.advance(0.6);
        assert_eq!(fade.volume, 0.0);
        assert!(!fade.is_active());
    }

    #[test]
    fn test_zero_time_fade_finishes_immediately() {
        let mut fade = Fade::out(0.0);
        fade.advance(0.016);
        assert!(!fade.is_active());
        assert_eq!(fade.alpha(), 1.0);
    }
}
