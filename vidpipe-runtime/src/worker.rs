use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use vidpipe_common::{Frame, FrameQueue, RuntimeConfig, Stage};

/// Pushes a deep copy of `frame` to each of the first `k-1` queues and the
/// original to the last, so every branch owns an independent frame (spec
/// §4.3, "Fan-out semantics"). A closed downstream queue drops that one
/// copy instead of panicking — shutdown is already underway once a queue
/// refuses a push.
fn fan_out(frame: Frame, queues: &[Arc<FrameQueue>]) {
    let Some((last, rest)) = queues.split_last() else {
        return;
    };
    for queue in rest {
        if queue.push(frame.copy()).is_err() {
            tracing::trace!("fan-out push dropped: downstream queue closed");
        }
    }
    if last.push(frame).is_err() {
        tracing::trace!("fan-out push dropped: downstream queue closed");
    }
}

/// Drives one execution node until `running` is cleared (spec §4.4).
///
/// Sources call the stage with no input on every tick; everything else
/// pulls from its input queue with a cooperative poll-and-retry so the
/// stop flag stays responsive even while the queue sits empty.
pub(crate) fn worker_loop(
    name: String,
    mut stage: Box<dyn Stage>,
    input_queue: Option<Arc<FrameQueue>>,
    output_queues: Vec<Arc<FrameQueue>>,
    is_source: bool,
    is_sink: bool,
    running: Arc<AtomicBool>,
    config: RuntimeConfig,
) {
    let span = tracing::debug_span!("worker", stage = %name);
    let _guard = span.enter();

    while running.load(Ordering::Acquire) {
        let output = if is_source {
            match stage.process(None) {
                Some(frame) => frame,
                None => {
                    thread::sleep(config.pace());
                    continue;
                }
            }
        } else {
            let queue = input_queue
                .as_ref()
                .expect("graph builder guarantees non-sources have an input queue");
            let input = match queue.try_pop() {
                Some(frame) => frame,
                None => {
                    thread::sleep(config.poll_backoff());
                    continue;
                }
            };
            match stage.process(Some(input)) {
                Some(frame) => frame,
                None => {
                    thread::sleep(config.stage_yield());
                    continue;
                }
            }
        };

        if !output_queues.is_empty() {
            fan_out(output, &output_queues);
        }
        // Otherwise `output` is a terminal sink's pass-through or a frame
        // with no downstream edge; it is simply dropped here.

        thread::sleep(if is_source || is_sink {
            config.pace()
        } else {
            config.stage_yield()
        });
    }
}
