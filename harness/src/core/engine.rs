//! Execution engine: strictly sequential frame delivery with emission capture

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::traits::{FrameProcessor, FrameSink};
use frames::{Frame, FrameDirection};
use serde::Serialize;

/// Bound on how long one reaction may run before the engine gives up
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// One frame captured during execution
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CapturedFrame {
    pub frame: Frame,
    pub direction: FrameDirection,
    /// Index of the input frame whose reaction emitted this frame
    pub input_index: usize,
    /// Emission order across both directions
    pub emission_index: usize,
}

/// Everything a processor emitted during one run, split by direction.
///
/// Owned exclusively by the run that produced it; never mutated after
/// collection finishes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CapturedOutput {
    pub downstream: Vec<CapturedFrame>,
    pub upstream: Vec<CapturedFrame>,
}

impl CapturedOutput {
    /// Downstream frames in emission order, detached from capture metadata.
    pub fn downstream_frames(&self) -> Vec<Frame> {
        self.downstream.iter().map(|captured| captured.frame.clone()).collect()
    }

    /// Upstream frames in emission order, detached from capture metadata.
    pub fn upstream_frames(&self) -> Vec<Frame> {
        self.upstream.iter().map(|captured| captured.frame.clone()).collect()
    }

    pub fn total(&self) -> usize {
        self.downstream.len() + self.upstream.len()
    }

    fn push(&mut self, captured: CapturedFrame) {
        match captured.direction {
            FrameDirection::Downstream => self.downstream.push(captured),
            FrameDirection::Upstream => self.upstream.push(captured),
        }
    }
}

/// Drives one processor instance through an input sequence.
///
/// Delivery is strictly one at a time: the next frame is not submitted
/// until the processor's reaction to the current one has completed.
/// Processors may hold sequencing state that depends on in-order
/// delivery, so pipelined submission would be observably different.
#[derive(Clone, Debug)]
pub struct ExecutionEngine {
    frame_timeout: Duration,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self { frame_timeout: DEFAULT_FRAME_TIMEOUT }
    }

    /// Engine with a caller-tuned per-frame timeout.
    pub fn with_timeout(frame_timeout: Duration) -> Self {
        Self { frame_timeout }
    }

    /// Feed `input_frames` to `processor` in order, capturing every frame
    /// it emits.
    ///
    /// Delivery of [`Frame::End`] is terminal: remaining output is drained
    /// and no further input is submitted. A reaction that outlives the
    /// per-frame timeout aborts the run with `ProcessorTimeout`; the input
    /// frames themselves are never mutated.
    pub async fn run(
        &self,
        processor: &mut dyn FrameProcessor,
        input_frames: &[Frame],
    ) -> HarnessResult<CapturedOutput> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = FrameSink::new(tx);
        let mut captured = CapturedOutput::default();
        let mut emission_index = 0;

        for (index, frame) in input_frames.iter().enumerate() {
            debug!("Submitting frame {} ({}) downstream", index, frame.type_tag());
            let reaction = processor.process_frame(frame.clone(), FrameDirection::Downstream, &sink);
            match timeout(self.frame_timeout, reaction).await {
                Ok(Ok(())) => {}
                Ok(Err(source)) => {
                    return Err(HarnessError::ProcessorFailed { index, source });
                }
                Err(_) => {
                    warn!("⏰ Processor did not acknowledge frame {} within {:?}", index, self.frame_timeout);
                    return Err(HarnessError::ProcessorTimeout {
                        index,
                        timeout_ms: self.frame_timeout.as_millis() as u64,
                    });
                }
            }

            drain(&mut rx, &mut captured, index, &mut emission_index);

            if frame.is_end() {
                debug!("End marker delivered at index {}, no further input", index);
                break;
            }
        }

        debug!(
            "Run complete: {} downstream / {} upstream frames captured",
            captured.downstream.len(),
            captured.upstream.len()
        );
        Ok(captured)
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn drain(
    rx: &mut mpsc::UnboundedReceiver<(Frame, FrameDirection)>,
    captured: &mut CapturedOutput,
    input_index: usize,
    emission_index: &mut usize,
) {
    while let Ok((frame, direction)) = rx.try_recv() {
        captured.push(CapturedFrame {
            frame,
            direction,
            input_index,
            emission_index: *emission_index,
        });
        *emission_index += 1;
    }
}
