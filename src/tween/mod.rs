//! Explicit tween job list
//!
//! Each job interpolates a value from `from` to `to` over a fixed duration using
//! an [`Easing`] curve. Jobs are keyed by their target: starting a job for a key
//! that already has one replaces it in place under a fresh [`TweenHandle`].
//! Nothing runs on its own; the owner calls [`TweenEngine::advance`] once per
//! frame and receives every interpolated value through a callback.

mod easing;

pub use easing::Easing;

use glam::Vec3;

/// Values that can be linearly interpolated by a tween.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::lerp(self, to, t)
    }
}

/// Identifies one started job. Handles are never reused within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

/// One interpolated value pushed out of [`TweenEngine::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenUpdate<K, V> {
    pub handle: TweenHandle,
    pub key: K,
    pub value: V,
    /// Set on the last update of a job; `value` is then exactly the job's target.
    pub finished: bool,
}

#[derive(Debug, Clone)]
struct TweenJob<K, V> {
    handle: TweenHandle,
    key: K,
    from: V,
    to: V,
    duration_ms: f64,
    easing: Easing,
    start_ms: f64,
}

impl<K: Copy, V: Lerp> TweenJob<K, V> {
    fn sample(&self, now_ms: f64) -> TweenUpdate<K, V> {
        let elapsed = (now_ms - self.start_ms).max(0.0);
        let progress = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        let finished = progress >= 1.0;
        let value = if finished {
            self.to
        } else {
            Lerp::lerp(self.from, self.to, self.easing.apply(progress as f32))
        };
        TweenUpdate {
            handle: self.handle,
            key: self.key,
            value,
            finished,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TweenEngine<K, V> {
    jobs: Vec<TweenJob<K, V>>,
    next_handle: u64,
}

impl<K, V> Default for TweenEngine<K, V> {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            next_handle: 1,
        }
    }
}

impl<K: Copy + PartialEq, V: Lerp> TweenEngine<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a job for `key`, replacing any job already running for it.
    pub fn start(
        &mut self,
        key: K,
        from: V,
        to: V,
        duration_ms: f64,
        easing: Easing,
        start_ms: f64,
    ) -> TweenHandle {
        let handle = TweenHandle(self.next_handle);
        self.next_handle += 1;
        let job = TweenJob {
            handle,
            key,
            from,
            to,
            duration_ms,
            easing,
            start_ms,
        };
        match self.jobs.iter_mut().find(|existing| existing.key == key) {
            Some(existing) => *existing = job,
            None => self.jobs.push(job),
        }
        handle
    }

    /// Drop the job for `key` without a final update.
    pub fn cancel(&mut self, key: K) -> Option<TweenHandle> {
        let index = self.jobs.iter().position(|job| job.key == key)?;
        Some(self.jobs.remove(index).handle)
    }

    pub fn handle_for(&self, key: K) -> Option<TweenHandle> {
        self.jobs
            .iter()
            .find(|job| job.key == key)
            .map(|job| job.handle)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Sample every job at `now_ms`, push the values to `on_update` and retire
    /// the jobs whose duration has elapsed.
    pub fn advance<F>(&mut self, now_ms: f64, mut on_update: F)
    where
        F: FnMut(TweenUpdate<K, V>),
    {
        self.jobs.retain(|job| {
            let update = job.sample(now_ms);
            on_update(update);
            !update.finished
        });
    }
}
