// TransferView -- Smooth crop-to-fit image transitions built with Rust and GTK4
//
// Copyright (c) 2024-2025 Martin van der Werff <github (at) newinnovations.nl>
//
// This file is part of TransferView.
//
// TransferView is free software: you can redistribute it and/or modify it under the terms of
// the GNU Affero General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR
// IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND
// FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR ANY
// DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR
// BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
// STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Bridge between an external frame ticker and the transition geometry.

use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use glib::{ffi::g_source_remove, result_from_gboolean, BoolError, ControlFlow, SourceId};
use log::warn;

use crate::transfer::{easing::Easing, geometry::TransformState};

/// Interval between ticks of the glib driver, roughly one frame at 60Hz
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// External time source.
///
/// After `start` the driver reports linear progress in [0, 1] to its owner,
/// in increasing order, ending with exactly 1.0. After `stop` it reports
/// nothing further.
pub trait TimeDriver {
    fn start(&mut self, duration: Duration);
    fn stop(&mut self);
}

/// Safer alternative to SourceId::remove()
pub fn remove_source_id(id: &SourceId) -> Result<(), BoolError> {
    unsafe { result_from_gboolean!(g_source_remove(id.as_raw()), "Failed to remove source") }
}

/// Ticks from a glib timeout on the main context.
pub struct GlibTimeDriver {
    on_tick: Rc<dyn Fn(f64)>,
    timeout_id: Rc<RefCell<Option<SourceId>>>,
}

impl GlibTimeDriver {
    pub fn new(on_tick: impl Fn(f64) + 'static) -> Self {
        Self {
            on_tick: Rc::new(on_tick),
            timeout_id: Default::default(),
        }
    }
}

impl TimeDriver for GlibTimeDriver {
    fn start(&mut self, duration: Duration) {
        self.stop();
        let started = Instant::now();
        let on_tick = self.on_tick.clone();
        let timeout_id = self.timeout_id.clone();
        let id = glib::timeout_add_local(FRAME_INTERVAL, move || {
            let fraction = if duration.is_zero() {
                1.0
            } else {
                (started.elapsed().as_secs_f64() / duration.as_secs_f64()).min(1.0)
            };
            if fraction >= 1.0 {
                // returning Break removes the source
                timeout_id.replace(None);
                on_tick(1.0);
                ControlFlow::Break
            } else {
                on_tick(fraction);
                ControlFlow::Continue
            }
        });
        self.timeout_id.replace(Some(id));
    }

    fn stop(&mut self) {
        if let Some(id) = self.timeout_id.replace(None) {
            if let Err(e) = remove_source_id(&id) {
                warn!("remove_source_id: {e}");
            }
        }
    }
}

impl Drop for GlibTimeDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTick {
    /// No segment running; the tick was dropped
    Ignored,
    /// Geometry advanced, redraw needed
    Frame,
    /// Geometry reached its end point, redraw needed and the segment is over
    Last,
}

/// Owns the time driver for one view and applies its ticks to the geometry.
pub struct FrameAdapter {
    driver: Box<dyn TimeDriver>,
    duration: Duration,
    easing: Easing,
    running: bool,
}

impl FrameAdapter {
    pub fn new(driver: Box<dyn TimeDriver>, duration: Duration, easing: Easing) -> Self {
        Self {
            driver,
            duration,
            easing,
            running: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
        self.driver.start(self.duration);
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.driver.stop();
        }
    }

    /// Apply linear progress `fraction` to `transform`.
    pub fn on_tick(&mut self, transform: &mut TransformState, fraction: f64) -> FrameTick {
        if !self.running {
            return FrameTick::Ignored;
        }
        if fraction >= 1.0 {
            transform.advance(1.0);
            self.running = false;
            FrameTick::Last
        } else {
            transform.advance(self.easing.evaluate(fraction));
            FrameTick::Frame
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        rect::SizeD,
        transfer::geometry::{Direction, SourceInfo},
    };

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum DriverCall {
        Start(Duration),
        Stop,
    }

    /// Records calls instead of ticking; tests deliver ticks by hand.
    #[derive(Default, Clone)]
    pub(crate) struct ManualDriver {
        pub(crate) calls: Rc<RefCell<Vec<DriverCall>>>,
    }

    impl TimeDriver for ManualDriver {
        fn start(&mut self, duration: Duration) {
            self.calls.borrow_mut().push(DriverCall::Start(duration));
        }

        fn stop(&mut self) {
            self.calls.borrow_mut().push(DriverCall::Stop);
        }
    }

    fn transform() -> TransformState {
        let mut transform = TransformState::initialize(
            SizeD::new(1200.0, 800.0),
            SizeD::new(640.0, 960.0),
            &SourceInfo::new(300.0, 200.0, 20.0, 40.0),
            false,
        )
        .unwrap();
        transform.begin(Direction::CropToFit, (0, 255));
        transform
    }

    #[test]
    fn test_ticks_ignored_until_started() {
        let driver = ManualDriver::default();
        let mut adapter = FrameAdapter::new(
            Box::new(driver.clone()),
            Duration::from_millis(300),
            Easing::default(),
        );
        let mut transform = transform();
        let before = transform.current();
        assert_eq!(adapter.on_tick(&mut transform, 0.5), FrameTick::Ignored);
        assert_eq!(transform.current(), before);
        assert!(driver.calls.borrow().is_empty());
    }

    #[test]
    fn test_eased_alpha() {
        let driver = ManualDriver::default();
        let mut adapter = FrameAdapter::new(
            Box::new(driver.clone()),
            Duration::from_millis(300),
            Easing::AccelerateDecelerate,
        );
        let mut transform = transform();
        adapter.start();
        assert_eq!(
            *driver.calls.borrow(),
            vec![DriverCall::Start(Duration::from_millis(300))]
        );

        for t in [0.1, 0.25, 0.5, 0.8] {
            assert_eq!(adapter.on_tick(&mut transform, t), FrameTick::Frame);
            let expected = (255.0 * Easing::AccelerateDecelerate.evaluate(t)).round() as u8;
            assert_eq!(transform.current().alpha, expected);
        }
    }

    #[test]
    fn test_last_tick_reaches_end() {
        let mut adapter = FrameAdapter::new(
            Box::new(ManualDriver::default()),
            Duration::from_millis(300),
            Easing::default(),
        );
        let mut transform = transform();
        adapter.start();
        assert_eq!(adapter.on_tick(&mut transform, 1.0), FrameTick::Last);
        assert!(!adapter.is_running());
        assert_eq!(transform.current().rect, transform.end_rect());
        assert_eq!(transform.current().scale, transform.end_scale());
        assert_eq!(transform.current().alpha, 255);

        // late ticks are dropped
        assert_eq!(adapter.on_tick(&mut transform, 1.0), FrameTick::Ignored);
    }

    #[test]
    fn test_stop_freezes() {
        let driver = ManualDriver::default();
        let mut adapter = FrameAdapter::new(
            Box::new(driver.clone()),
            Duration::from_millis(300),
            Easing::Linear,
        );
        let mut transform = transform();
        adapter.start();
        adapter.on_tick(&mut transform, 0.4);
        let frozen = transform.current();
        adapter.stop();
        assert_eq!(adapter.on_tick(&mut transform, 0.6), FrameTick::Ignored);
        assert_eq!(transform.current(), frozen);
        assert_eq!(driver.calls.borrow().last(), Some(&DriverCall::Stop));

        // stopping twice does not reach the driver again
        adapter.stop();
        assert_eq!(driver.calls.borrow().len(), 2);
    }

    fn recording_driver() -> (GlibTimeDriver, Rc<RefCell<Vec<f64>>>) {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let sink = ticks.clone();
        let driver = GlibTimeDriver::new(move |fraction| sink.borrow_mut().push(fraction));
        (driver, ticks)
    }

    /// Iterate `context` while `pending` holds, failing instead of hanging.
    fn pump_while(context: &glib::MainContext, pending: impl Fn() -> bool) {
        for _ in 0..10_000 {
            if !pending() {
                return;
            }
            context.iteration(true);
        }
        panic!("main context never settled");
    }

    fn drain(context: &glib::MainContext) {
        while context.iteration(false) {}
    }

    // timeout_add_local attaches to the default main context, which only one
    // thread can own, so all glib driven cases share this test
    #[test]
    fn test_glib_driver() {
        let context = glib::MainContext::default();
        let _owner = context.acquire().unwrap();

        // full run: increasing fractions ending with a single 1.0
        let (mut driver, ticks) = recording_driver();
        driver.start(Duration::from_millis(50));
        pump_while(&context, || ticks.borrow().last() != Some(&1.0));
        let values = ticks.borrow().clone();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(values.iter().filter(|&&v| v == 1.0).count(), 1);
        assert!(driver.timeout_id.borrow().is_none());
        drain(&context);
        assert_eq!(ticks.borrow().len(), values.len());

        // stop after the first tick delivers nothing further
        let (mut driver, ticks) = recording_driver();
        driver.start(Duration::from_millis(500));
        pump_while(&context, || ticks.borrow().is_empty());
        driver.stop();
        assert!(driver.timeout_id.borrow().is_none());
        let delivered = ticks.borrow().len();
        std::thread::sleep(Duration::from_millis(550));
        drain(&context);
        assert_eq!(ticks.borrow().len(), delivered);
        assert!(ticks.borrow().iter().all(|&v| v < 1.0));

        // zero duration completes on the first tick
        let (mut driver, ticks) = recording_driver();
        driver.start(Duration::ZERO);
        pump_while(&context, || ticks.borrow().is_empty());
        drain(&context);
        assert_eq!(*ticks.borrow(), vec![1.0]);
        assert!(driver.timeout_id.borrow().is_none());

        // restarting replaces the running source
        let (mut driver, ticks) = recording_driver();
        driver.start(Duration::from_millis(500));
        driver.start(Duration::from_millis(30));
        pump_while(&context, || ticks.borrow().last() != Some(&1.0));
        drain(&context);
        assert_eq!(ticks.borrow().iter().filter(|&&v| v == 1.0).count(), 1);
        assert!(driver.timeout_id.borrow().is_none());
    }
}
