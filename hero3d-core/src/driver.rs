//! Frame timing and the per-frame callback driver.
//!
//! A [`FrameDriver`] is whatever calls into the scene once per display
//! refresh: a terminal loop, a browser animation frame, or a test.
//! [`FrameLoop`] is the plain in-process implementation.

/// Timing for one frame, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInfo {
    /// Time since the rendering session began
    pub elapsed: f32,
    /// Time since the previous frame, never negative
    pub delta: f32,
}

/// Turns a stream of timestamps into [`FrameInfo`]s.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    /// First and most recent timestamp seen by `tick`
    stamps: Option<(f64, f64)>,
    elapsed: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at timestamp `now` (seconds, any origin).
    ///
    /// The first call starts the clock and reports a zero delta. A timestamp
    /// earlier than the previous one is treated as no time passing.
    pub fn tick(&mut self, now: f64) -> FrameInfo {
        let (start, previous) = self.stamps.unwrap_or((now, now));
        let now = now.max(previous);
        self.stamps = Some((start, now));
        self.elapsed = (now - start) as f32;
        FrameInfo {
            elapsed: self.elapsed,
            delta: (now - previous) as f32,
        }
    }

    /// Advance by a fixed step without a timestamp source
    pub fn advance(&mut self, delta: f32) -> FrameInfo {
        let delta = delta.max(0.0);
        self.elapsed += delta;
        FrameInfo {
            elapsed: self.elapsed,
            delta,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Callback invoked once per frame with mutable access to the driven state
pub type FrameCallback<S> = Box<dyn FnMut(&FrameInfo, &mut S)>;

/// The two capabilities a scene needs from its rendering driver.
pub trait FrameDriver<S> {
    /// Register `callback` to run on every frame until the driver is torn down
    fn on_each_frame(&mut self, callback: FrameCallback<S>);

    /// Whether frames are currently being dispatched
    fn is_ready(&self) -> bool;
}

/// Single-threaded driver that dispatches frames on demand.
///
/// Nothing is dispatched until [`FrameLoop::mount`]. [`FrameLoop::unmount`]
/// stops dispatch and drops every registered callback.
pub struct FrameLoop<S> {
    clock: Clock,
    callbacks: Vec<FrameCallback<S>>,
    mounted: bool,
}

impl<S> FrameLoop<S> {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            callbacks: Vec::new(),
            mounted: false,
        }
    }

    pub fn mount(&mut self) {
        self.mounted = true;
        log::debug!("frame loop mounted with {} callbacks", self.callbacks.len());
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.callbacks.clear();
        self.clock = Clock::new();
        log::debug!("frame loop unmounted");
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Dispatch a frame stamped at `now` seconds
    pub fn tick(&mut self, now: f64, state: &mut S) -> Option<FrameInfo> {
        if !self.mounted {
            return None;
        }
        let frame = self.clock.tick(now);
        self.dispatch(&frame, state);
        Some(frame)
    }

    /// Dispatch a frame `delta` seconds after the previous one
    pub fn step(&mut self, delta: f32, state: &mut S) -> Option<FrameInfo> {
        if !self.mounted {
            return None;
        }
        let frame = self.clock.advance(delta);
        self.dispatch(&frame, state);
        Some(frame)
    }

    fn dispatch(&mut self, frame: &FrameInfo, state: &mut S) {
        for callback in &mut self.callbacks {
            callback(frame, state);
        }
    }
}

impl<S> Default for FrameLoop<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FrameDriver<S> for FrameLoop<S> {
    fn on_each_frame(&mut self, callback: FrameCallback<S>) {
        self.callbacks.push(callback);
    }

    fn is_ready(&self) -> bool {
        self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_first_tick_has_zero_delta() {
        let mut clock = Clock::new();
        let first = clock.tick(100.0);
        assert_eq!(first, FrameInfo { elapsed: 0.0, delta: 0.0 });

        let second = clock.tick(100.5);
        assert!((second.elapsed - 0.5).abs() < 1e-6);
        assert!((second.delta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clock_ignores_time_going_backwards() {
        let mut clock = Clock::new();
        clock.tick(1.0);
        clock.tick(2.0);
        let frame = clock.tick(1.5);
        assert_eq!(frame.delta, 0.0);
        assert!((frame.elapsed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        clock.advance(0.25);
        let frame = clock.advance(0.25);
        assert_eq!(frame, FrameInfo { elapsed: 0.5, delta: 0.25 });
        assert_eq!(clock.advance(-1.0).delta, 0.0);
    }

    #[test]
    fn test_frame_loop_dispatches_only_while_mounted() {
        let mut frames: FrameLoop<Vec<FrameInfo>> = FrameLoop::new();
        frames.on_each_frame(Box::new(|frame: &FrameInfo, seen: &mut Vec<FrameInfo>| {
            seen.push(*frame)
        }));
        let mut seen = Vec::new();

        assert!(!frames.is_ready());
        assert!(frames.step(0.1, &mut seen).is_none());
        assert!(seen.is_empty());

        frames.mount();
        assert!(frames.is_ready());
        frames.step(0.1, &mut seen);
        frames.step(0.1, &mut seen);
        assert_eq!(seen.len(), 2);

        frames.unmount();
        assert_eq!(frames.callback_count(), 0);
        assert!(frames.step(0.1, &mut seen).is_none());
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let mut frames: FrameLoop<Vec<u8>> = FrameLoop::new();
        frames.on_each_frame(Box::new(|_: &FrameInfo, order: &mut Vec<u8>| order.push(1)));
        frames.on_each_frame(Box::new(|_: &FrameInfo, order: &mut Vec<u8>| order.push(2)));
        frames.mount();

        let mut order = Vec::new();
        frames.tick(0.0, &mut order);
        assert_eq!(order, vec![1, 2]);
    }
}
