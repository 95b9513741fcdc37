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

use std::time::Duration;

use log::{debug, info};

use crate::{
    config::{Config, DEFAULT_DURATION_MS},
    error::{TransferError, TransferResult},
    rect::SizeD,
    transfer::{
        driver::{FrameAdapter, FrameTick, TimeDriver},
        easing::Easing,
        geometry::{Direction, FrameSnapshot, SourceInfo, TransformState},
        state::{ApartStage, ChoreographyMode, StateMachine, TransferEvent, TransitionState},
    },
};

/// Result of delivering one tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Redraw,
    /// Final frame of a segment; redraw and notify the host.
    Completed(TransferEvent),
}

/// Crop-to-fit transition engine for a single view.
///
/// The host reports the thumbnail geometry with [`set_source_info`], starts a
/// transition and then calls [`frame`] on every draw. The first draw with a
/// known image and view size initializes the geometry and starts the time
/// driver; each tick from the driver goes to [`tick`].
///
/// After the translate stage of an apart transition completes, its end rect
/// becomes the new source info and the view stays transitioning in. The
/// scale stage is started by the host with
/// `begin_transition_in(Some(ApartStage::Scale))`, or automatically when
/// auto-chaining is enabled.
///
/// [`set_source_info`]: Self::set_source_info
/// [`frame`]: Self::frame
/// [`tick`]: Self::tick
pub struct TransferEngine {
    machine: StateMachine,
    adapter: FrameAdapter,
    source: Option<SourceInfo>,
    transform: Option<TransformState>,
    auto_chain_stages: bool,
}

impl TransferEngine {
    pub fn new(driver: Box<dyn TimeDriver>) -> Self {
        Self::with_config(&Config::default(), driver)
    }

    pub fn with_config(config: &Config, driver: Box<dyn TimeDriver>) -> Self {
        let duration_ms = if config.duration_ms == 0 {
            DEFAULT_DURATION_MS
        } else {
            config.duration_ms
        };
        Self {
            machine: StateMachine::default(),
            adapter: FrameAdapter::new(driver, Duration::from_millis(duration_ms), config.easing),
            source: None,
            transform: None,
            auto_chain_stages: config.auto_chain_stages,
        }
    }

    pub fn set_source_info(&mut self, width: f64, height: f64, location_x: f64, location_y: f64) {
        self.source = Some(SourceInfo::new(width, height, location_x, location_y));
    }

    pub fn source_info(&self) -> Option<SourceInfo> {
        self.source
    }

    /// Start crop→fit. `None` translates and scales together; `Some(stage)`
    /// runs one stage of the apart choreography.
    pub fn begin_transition_in(&mut self, stage: Option<ApartStage>) -> TransferResult<()> {
        self.check_source()?;
        self.machine.begin_in(stage)
    }

    /// Start fit→crop.
    pub fn begin_transition_out(&mut self) -> TransferResult<()> {
        self.check_source()?;
        self.machine.begin_out()
    }

    /// Duration of one segment in milliseconds.
    pub fn duration(&self) -> u64 {
        self.adapter.duration().as_millis() as u64
    }

    pub fn set_duration(&mut self, duration_ms: u64) -> TransferResult<()> {
        if duration_ms == 0 {
            return Err(TransferError::InvalidDuration(duration_ms));
        }
        self.adapter.set_duration(Duration::from_millis(duration_ms));
        Ok(())
    }

    pub fn easing(&self) -> Easing {
        self.adapter.easing()
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.adapter.set_easing(easing);
    }

    pub fn state(&self) -> TransitionState {
        self.machine.state()
    }

    pub fn mode(&self) -> ChoreographyMode {
        self.machine.mode()
    }

    pub fn stage(&self) -> Option<ApartStage> {
        self.machine.stage()
    }

    /// True while a segment is waiting for its first frame or running.
    pub fn is_busy(&self) -> bool {
        self.machine.is_busy()
    }

    /// Geometry of the current transition, `None` while idle.
    pub fn transform(&self) -> Option<&TransformState> {
        self.transform.as_ref()
    }

    /// Frame to draw now, or `None` when the host should draw the plain
    /// image (idle, or still waiting for image and view size).
    pub fn frame(&mut self, image_size: SizeD, view_size: SizeD) -> Option<FrameSnapshot> {
        if self.machine.state() == TransitionState::Idle {
            return None;
        }
        if self.machine.is_pending() {
            self.initialize(image_size, view_size);
        }
        self.transform.as_ref().map(|t| t.current())
    }

    /// Deliver linear progress `fraction` from the time driver.
    pub fn tick(&mut self, fraction: f64) -> TickOutcome {
        let Some(transform) = self.transform.as_mut() else {
            return TickOutcome::Ignored;
        };
        match self.adapter.on_tick(transform, fraction) {
            FrameTick::Ignored => TickOutcome::Ignored,
            FrameTick::Frame => TickOutcome::Redraw,
            FrameTick::Last => match self.finish() {
                Some(event) => TickOutcome::Completed(event),
                None => TickOutcome::Redraw,
            },
        }
    }

    /// Stop the running segment. No completion is delivered and the last
    /// frame stays as it is.
    pub fn cancel(&mut self) {
        if self.machine.is_busy() {
            info!("transition cancelled in state {:?}", self.machine.state());
        }
        self.adapter.stop();
        self.machine.interrupt();
    }

    fn check_source(&self) -> TransferResult<()> {
        if self.source.is_none() {
            Err(TransferError::MissingSourceInfo)
        } else {
            Ok(())
        }
    }

    fn initialize(&mut self, image_size: SizeD, view_size: SizeD) {
        let Some(source) = self.source else {
            return;
        };
        let mut transform = match TransformState::initialize(
            image_size,
            view_size,
            &source,
            self.machine.pins_scale(),
        ) {
            Ok(transform) => transform,
            Err(e) => {
                debug!("initialization deferred: {e}");
                return;
            }
        };

        let (direction, alpha) = match (self.machine.state(), self.machine.stage()) {
            (TransitionState::TransitioningOut, _) => (Direction::FitToCrop, (255, 0)),
            (_, Some(ApartStage::Scale)) => (Direction::CropToFit, (255, 255)),
            _ => (Direction::CropToFit, (0, 255)),
        };
        transform.begin(direction, alpha);
        debug!(
            "initialized: scale {} -> {}, rect {:?} -> {:?}",
            transform.start_scale(),
            transform.end_scale(),
            transform.start_rect(),
            transform.end_rect()
        );
        self.transform = Some(transform);
        self.machine.started();
        self.adapter.start();
    }

    fn finish(&mut self) -> Option<TransferEvent> {
        let event = self.machine.complete()?;
        info!("transition complete: {event:?}");

        if event.stage == Some(ApartStage::Translate) {
            if let Some(transform) = &self.transform {
                self.source = Some(SourceInfo::from_rect(&transform.end_rect()));
            }
            if self.auto_chain_stages {
                if let Err(e) = self.machine.begin_in(Some(ApartStage::Scale)) {
                    debug!("scale stage not chained: {e}");
                }
            }
        }
        if self.machine.state() == TransitionState::Idle {
            self.transform = None;
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::driver::tests::{DriverCall, ManualDriver};

    const EPS: f64 = 1e-9;

    fn image() -> SizeD {
        SizeD::new(1200.0, 800.0)
    }

    fn view() -> SizeD {
        SizeD::new(640.0, 960.0)
    }

    fn engine() -> (TransferEngine, ManualDriver) {
        let driver = ManualDriver::default();
        let mut engine = TransferEngine::new(Box::new(driver.clone()));
        engine.set_source_info(300.0, 200.0, 20.0, 40.0);
        (engine, driver)
    }

    #[test]
    fn test_defaults() {
        let engine = TransferEngine::new(Box::new(ManualDriver::default()));
        assert_eq!(engine.duration(), 300);
        assert_eq!(engine.state(), TransitionState::Idle);
        assert_eq!(engine.mode(), ChoreographyMode::Together);
        assert_eq!(engine.easing(), Easing::AccelerateDecelerate);
        assert!(engine.source_info().is_none());
    }

    #[test]
    fn test_requires_source_info() {
        let mut engine = TransferEngine::new(Box::new(ManualDriver::default()));
        assert!(matches!(
            engine.begin_transition_in(None),
            Err(TransferError::MissingSourceInfo)
        ));
        assert!(matches!(
            engine.begin_transition_out(),
            Err(TransferError::MissingSourceInfo)
        ));
        assert_eq!(engine.state(), TransitionState::Idle);
    }

    #[test]
    fn test_duration() {
        let (mut engine, driver) = engine();
        assert!(matches!(
            engine.set_duration(0),
            Err(TransferError::InvalidDuration(0))
        ));
        engine.set_duration(450).unwrap();
        assert_eq!(engine.duration(), 450);

        engine.begin_transition_in(None).unwrap();
        engine.frame(image(), view());
        assert_eq!(
            *driver.calls.borrow(),
            vec![DriverCall::Start(Duration::from_millis(450))]
        );
    }

    #[test]
    fn test_idle_draws_nothing() {
        let (mut engine, _) = engine();
        assert!(engine.frame(image(), view()).is_none());
        assert!(engine.transform().is_none());
    }

    #[test]
    fn test_deferred_until_ready() {
        let (mut engine, driver) = engine();
        engine.begin_transition_in(None).unwrap();

        assert!(engine.frame(SizeD::default(), view()).is_none());
        assert!(engine.frame(image(), SizeD::default()).is_none());
        assert!(driver.calls.borrow().is_empty());
        assert_eq!(engine.tick(0.5), TickOutcome::Ignored);

        let first = engine.frame(image(), view()).unwrap();
        assert_eq!(first.rect, engine.transform().unwrap().start_rect());
        assert_eq!(first.alpha, 0);
        assert_eq!(driver.calls.borrow().len(), 1);

        // later draws don't restart the driver
        engine.frame(image(), view());
        assert_eq!(driver.calls.borrow().len(), 1);
    }

    #[test]
    fn test_together_in() {
        let (mut engine, _) = engine();
        engine.begin_transition_in(None).unwrap();
        assert_eq!(engine.state(), TransitionState::TransitioningIn);
        engine.frame(image(), view()).unwrap();

        assert_eq!(engine.tick(0.5), TickOutcome::Redraw);
        let mid = engine.frame(image(), view()).unwrap();
        let eased = Easing::AccelerateDecelerate.evaluate(0.5);
        assert_eq!(mid.alpha, (255.0 * eased).round() as u8);

        let outcome = engine.tick(1.0);
        assert_eq!(
            outcome,
            TickOutcome::Completed(TransferEvent {
                state: TransitionState::TransitioningIn,
                mode: ChoreographyMode::Together,
                stage: None,
            })
        );
        assert_eq!(engine.state(), TransitionState::Idle);
        assert!(engine.transform().is_none());
        assert!(engine.frame(image(), view()).is_none());

        // completion fires once
        assert_eq!(engine.tick(1.0), TickOutcome::Ignored);
    }

    #[test]
    fn test_out_stays_at_end() {
        let (mut engine, _) = engine();
        engine.begin_transition_out().unwrap();
        let first = engine.frame(image(), view()).unwrap();
        let transform = engine.transform().unwrap().clone();
        assert_eq!(first.rect, transform.end_rect());
        assert_eq!(first.scale, transform.end_scale());
        assert_eq!(first.alpha, 255);

        assert_eq!(engine.tick(0.3), TickOutcome::Redraw);
        assert!(matches!(engine.tick(1.0), TickOutcome::Completed(_)));
        assert_eq!(engine.state(), TransitionState::TransitioningOut);

        let last = engine.frame(image(), view()).unwrap();
        assert_eq!(last.rect, transform.start_rect());
        assert_eq!(last.scale, transform.start_scale());
        assert_eq!(last.alpha, 0);
    }

    #[test]
    fn test_rejects_while_active() {
        let (mut engine, _) = engine();
        engine.begin_transition_in(None).unwrap();
        assert!(matches!(
            engine.begin_transition_out(),
            Err(TransferError::TransitionActive)
        ));
        engine.frame(image(), view());
        assert!(matches!(
            engine.begin_transition_in(Some(ApartStage::Scale)),
            Err(TransferError::TransitionActive)
        ));
        assert_eq!(engine.mode(), ChoreographyMode::Together);
    }

    #[test]
    fn test_apart_caller_chained() {
        let (mut engine, driver) = engine();
        engine.begin_transition_in(Some(ApartStage::Translate)).unwrap();
        let first = engine.frame(image(), view()).unwrap();
        let pinned = first.scale;

        for t in [0.2, 0.5, 0.7] {
            engine.tick(t);
            assert_eq!(engine.frame(image(), view()).unwrap().scale, pinned);
        }
        let TickOutcome::Completed(event) = engine.tick(1.0) else {
            panic!("translate stage did not complete");
        };
        assert_eq!(event.mode, ChoreographyMode::Apart);
        assert_eq!(event.stage, Some(ApartStage::Translate));
        assert_eq!(engine.state(), TransitionState::TransitioningIn);

        // translation ends on the image footprint at thumbnail scale
        let source = engine.source_info().unwrap();
        assert!((source.width - 300.0).abs() < EPS);
        assert!((source.location_x - 170.0).abs() < EPS);
        assert!((source.location_y - 380.0).abs() < EPS);

        // the view holds the last translate frame until the scale stage starts
        assert_eq!(engine.frame(image(), view()).unwrap().scale, pinned);

        engine.begin_transition_in(Some(ApartStage::Scale)).unwrap();
        let first = engine.frame(image(), view()).unwrap();
        assert_eq!(first.scale, pinned);
        assert_eq!(first.alpha, 255);
        assert_eq!(first.rect, source.rect());
        assert_eq!(driver.calls.borrow().len(), 2);

        engine.tick(0.5);
        assert_eq!(engine.frame(image(), view()).unwrap().alpha, 255);

        let TickOutcome::Completed(event) = engine.tick(1.0) else {
            panic!("scale stage did not complete");
        };
        assert_eq!(event.stage, Some(ApartStage::Scale));
        assert_eq!(event.state, TransitionState::TransitioningIn);
        assert_eq!(engine.state(), TransitionState::Idle);
    }

    #[test]
    fn test_apart_auto_chained() {
        let driver = ManualDriver::default();
        let config = Config {
            auto_chain_stages: true,
            ..Config::default()
        };
        let mut engine = TransferEngine::with_config(&config, Box::new(driver.clone()));
        engine.set_source_info(300.0, 200.0, 20.0, 40.0);

        engine.begin_transition_in(Some(ApartStage::Translate)).unwrap();
        engine.frame(image(), view());
        assert!(matches!(engine.tick(1.0), TickOutcome::Completed(_)));
        assert!(engine.is_busy());
        assert_eq!(engine.stage(), Some(ApartStage::Scale));

        engine.frame(image(), view()).unwrap();
        assert_eq!(driver.calls.borrow().len(), 2);
        let TickOutcome::Completed(event) = engine.tick(1.0) else {
            panic!("scale stage did not complete");
        };
        assert_eq!(event.stage, Some(ApartStage::Scale));
        assert_eq!(engine.state(), TransitionState::Idle);
    }

    #[test]
    fn test_cancel_freezes_without_completion() {
        let (mut engine, driver) = engine();
        engine.begin_transition_in(None).unwrap();
        engine.frame(image(), view());
        engine.tick(0.4);
        let frozen = engine.frame(image(), view()).unwrap();

        engine.cancel();
        assert_eq!(driver.calls.borrow().last(), Some(&DriverCall::Stop));
        assert_eq!(engine.tick(1.0), TickOutcome::Ignored);
        assert_eq!(engine.state(), TransitionState::TransitioningIn);
        assert_eq!(engine.frame(image(), view()).unwrap(), frozen);

        // a new transition may start after cancellation
        engine.begin_transition_out().unwrap();
    }

    #[test]
    fn test_reinitializes_per_transition() {
        let (mut engine, _) = engine();
        engine.begin_transition_out().unwrap();
        engine.frame(image(), view());
        engine.tick(1.0);

        engine.set_source_info(100.0, 100.0, 0.0, 0.0);
        engine.begin_transition_in(None).unwrap();
        let first = engine.frame(image(), view()).unwrap();
        assert_eq!(first.rect, engine.source_info().unwrap().rect());
        assert_eq!(first.scale, 100.0 / 800.0);
    }
}
