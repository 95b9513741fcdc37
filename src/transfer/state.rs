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

//! Transition state machine.
//!
//! ```text
//!   Idle --begin_in--> TransitioningIn --complete--> Idle
//!   Idle --begin_out-> TransitioningOut --complete--> TransitioningOut
//! ```
//!
//! The out state is terminal: after a dismiss animation the view keeps its
//! final geometry instead of snapping back to the cropped presentation.
//!
//! Independent of the visible state, each segment moves through
//! `Quiet -> Pending -> Running -> Quiet`. `Pending` means the segment was
//! requested but geometry could not be initialized yet (no image or no view
//! bounds). Only one segment may be pending or running at a time.

use log::debug;

use crate::error::{TransferError, TransferResult};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TransitionState {
    #[default]
    Idle = 0,
    /// From thumbnail (crop) to full image (fit)
    TransitioningIn = 1,
    /// From full image (fit) back to thumbnail (crop)
    TransitioningOut = 2,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ChoreographyMode {
    /// Translation and scaling interpolate concurrently
    #[default]
    Together = 100,
    /// Translation first, then scaling, as two separate segments
    Apart = 200,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ApartStage {
    #[default]
    Translate = 201,
    Scale = 202,
}

impl From<TransitionState> for i32 {
    fn from(state: TransitionState) -> i32 {
        state as i32
    }
}

impl From<ChoreographyMode> for i32 {
    fn from(mode: ChoreographyMode) -> i32 {
        mode as i32
    }
}

impl From<ApartStage> for i32 {
    fn from(stage: ApartStage) -> i32 {
        stage as i32
    }
}

impl From<i32> for TransitionState {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::TransitioningIn,
            2 => Self::TransitioningOut,
            _ => Self::Idle,
        }
    }
}

impl From<i32> for ChoreographyMode {
    fn from(value: i32) -> Self {
        match value {
            200 => Self::Apart,
            _ => Self::Together,
        }
    }
}

impl From<i32> for ApartStage {
    fn from(value: i32) -> Self {
        match value {
            202 => Self::Scale,
            _ => Self::Translate,
        }
    }
}

/// Delivered exactly once per finished animation segment.
///
/// `state` is the state the segment ran in, before any reset to idle.
/// `stage` is only present for [`ChoreographyMode::Apart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub state: TransitionState,
    pub mode: ChoreographyMode,
    pub stage: Option<ApartStage>,
}

/// Stage code used when the event has no stage
pub const NO_STAGE: i32 = -1;

impl TransferEvent {
    /// Integer codes `(state, mode, stage)` as carried by the view signal.
    pub fn codes(&self) -> (i32, i32, i32) {
        (
            self.state.into(),
            self.mode.into(),
            self.stage.map_or(NO_STAGE, i32::from),
        )
    }

    pub fn from_codes(state: i32, mode: i32, stage: i32) -> Self {
        let mode = ChoreographyMode::from(mode);
        Self {
            state: state.into(),
            mode,
            stage: match mode {
                ChoreographyMode::Apart if stage != NO_STAGE => Some(stage.into()),
                _ => None,
            },
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    #[default]
    Quiet,
    Pending,
    Running,
}

#[derive(Default, Debug)]
pub struct StateMachine {
    state: TransitionState,
    mode: ChoreographyMode,
    stage: ApartStage,
    phase: Phase,
}

impl StateMachine {
    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn mode(&self) -> ChoreographyMode {
        self.mode
    }

    /// Stage of the current or last apart segment.
    pub fn stage(&self) -> Option<ApartStage> {
        match self.mode {
            ChoreographyMode::Together => None,
            ChoreographyMode::Apart => Some(self.stage),
        }
    }

    /// True while a segment is waiting for initialization or running.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Quiet
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// True when per-frame geometry must be initialized with the stage's
    /// scale held constant.
    pub fn pins_scale(&self) -> bool {
        self.mode == ChoreographyMode::Apart && self.stage == ApartStage::Translate
    }

    /// Request a crop-to-fit segment. `None` runs translation and scaling
    /// together, `Some(stage)` runs one stage of the apart choreography.
    pub fn begin_in(&mut self, stage: Option<ApartStage>) -> TransferResult<()> {
        self.guard()?;
        match stage {
            None => self.mode = ChoreographyMode::Together,
            Some(stage) => {
                self.mode = ChoreographyMode::Apart;
                self.stage = stage;
            }
        }
        self.state = TransitionState::TransitioningIn;
        self.phase = Phase::Pending;
        debug!("begin in: mode={:?} stage={:?}", self.mode, self.stage());
        Ok(())
    }

    /// Request a fit-to-crop segment; always runs together.
    pub fn begin_out(&mut self) -> TransferResult<()> {
        self.guard()?;
        self.mode = ChoreographyMode::Together;
        self.state = TransitionState::TransitioningOut;
        self.phase = Phase::Pending;
        debug!("begin out");
        Ok(())
    }

    /// Geometry is initialized and the time driver has been started.
    pub fn started(&mut self) {
        if self.phase == Phase::Pending {
            self.phase = Phase::Running;
        }
    }

    /// Finish the running segment. Returns the completion event, or `None`
    /// if nothing was running.
    pub fn complete(&mut self) -> Option<TransferEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Quiet;
        let event = TransferEvent {
            state: self.state,
            mode: self.mode,
            stage: self.stage(),
        };
        // The translate stage leaves the view transitioning: the scale stage follows.
        if self.state == TransitionState::TransitioningIn && !self.pins_scale() {
            self.state = TransitionState::Idle;
        }
        debug!("complete: {event:?} -> {:?}", self.state);
        Some(event)
    }

    /// Abandon the pending or running segment without completion. The
    /// visible state is left as is.
    pub fn interrupt(&mut self) {
        if self.phase != Phase::Quiet {
            debug!("interrupted in phase {:?}", self.phase);
        }
        self.phase = Phase::Quiet;
    }

    fn guard(&self) -> TransferResult<()> {
        if self.is_busy() {
            Err(TransferError::TransitionActive)
        } else {
            Ok(())
        }
    }
}
