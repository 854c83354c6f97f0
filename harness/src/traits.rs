//! Processor contract driven by the execution engine

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{HarnessError, HarnessResult};
use frames::{Frame, FrameDirection};

/// A stateful pipeline component under test.
///
/// The engine hands each input frame to `process_frame` together with a
/// capturing sink; the processor reacts by pushing zero or more frames in
/// either direction. All emissions for a reaction must happen before the
/// returned future resolves: completion is the acknowledgement the engine
/// waits on before submitting the next frame.
///
/// The harness never loads or inspects processor code; callers construct
/// the instance and lend it to the run for its duration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameProcessor: Send {
    async fn process_frame(
        &mut self,
        frame: Frame,
        direction: FrameDirection,
        sink: &FrameSink,
    ) -> anyhow::Result<()>;
}

/// Capturing sink supplied by the engine for the duration of one run.
#[derive(Clone, Debug)]
pub struct FrameSink {
    tx: mpsc::UnboundedSender<(Frame, FrameDirection)>,
}

impl FrameSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<(Frame, FrameDirection)>) -> Self {
        Self { tx }
    }

    /// Record one emitted frame in the given direction.
    pub fn push(&self, frame: Frame, direction: FrameDirection) -> HarnessResult<()> {
        self.tx.send((frame, direction)).map_err(|_| HarnessError::SinkClosed)
    }
}
