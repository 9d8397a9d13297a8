use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use vidpipe_common::{FrameQueue, RuntimeConfig};
use vidpipe_graph::{ExecutionNode, Graph};

use crate::error::{describe_panic, RuntimeError};
use crate::worker::worker_loop;

/// One spawned worker thread plus the cooperative flag that stops it.
struct Handle {
    name: String,
    flag: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// Drives every node of a built [`Graph`] on its own OS thread (spec §4.4,
/// §5: "parallel threads, one per execution node").
///
/// `stop` is safe to call any number of times — it only ever clears flags
/// and closes queues, both idempotent operations. `destroy` joins every
/// worker and drains pending queue contents; it is likewise safe to call
/// more than once; the second call finds nothing left to do.
pub struct Runtime {
    handles: Mutex<Option<Vec<Handle>>>,
    queues: Vec<Arc<FrameQueue>>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("queues", &self.queues.len())
            .finish()
    }
}

impl Runtime {
    /// Spawns one worker per node in `graph` and starts them running (spec
    /// §6: `runtime.execute(graph)`).
    pub fn execute(graph: Graph, config: RuntimeConfig) -> Self {
        let span = tracing::debug_span!("runtime_execute", nodes = graph.len());
        let _guard = span.enter();

        let mut queues = Vec::new();
        let mut handles = Vec::new();

        for (id, node) in graph.nodes.into_iter().enumerate() {
            let ExecutionNode {
                name,
                factory,
                input_queue,
                output_queues,
                is_source,
                is_sink,
            } = node;

            if let Some(queue) = &input_queue {
                queues.push(queue.clone());
            }

            let flag = Arc::new(AtomicBool::new(true));
            let stage = factory.create();
            let thread_name = format!("vidpipe-{name}-{id}");
            let worker_flag = flag.clone();
            let worker_name = name.clone();

            let thread = std::thread::Builder::new()
                .name(thread_name)
                .spawn(move || {
                    worker_loop(
                        worker_name,
                        stage,
                        input_queue,
                        output_queues,
                        is_source,
                        is_sink,
                        worker_flag,
                        config,
                    )
                })
                .expect("spawning a worker thread should not fail under normal OS limits");

            handles.push(Handle {
                name,
                flag,
                thread,
            });
        }

        tracing::debug!(workers = handles.len(), "runtime started");

        Self {
            handles: Mutex::new(Some(handles)),
            queues,
        }
    }

    /// Clears every node's running flag and unblocks any worker parked on a
    /// full queue (spec §7, "Queue full at shutdown"). Idempotent.
    pub fn stop(&self) {
        let guard = self.handles.lock().expect("runtime handle lock poisoned");
        if let Some(handles) = guard.as_ref() {
            for handle in handles {
                handle.flag.store(false, Ordering::Release);
            }
        }
        for queue in &self.queues {
            queue.close();
        }
    }

    /// Stops the runtime if it is not already stopped, joins every worker,
    /// and drains pending queue contents. Returns one [`RuntimeError`] per
    /// worker that panicked; a stage panic is never recovered at the core
    /// level (spec §7).
    pub fn destroy(&self) -> Vec<RuntimeError> {
        self.stop();

        let handles = {
            let mut guard = self.handles.lock().expect("runtime handle lock poisoned");
            guard.take()
        };

        let mut errors = Vec::new();
        if let Some(handles) = handles {
            for handle in handles {
                if let Err(payload) = handle.thread.join() {
                    let reason = describe_panic(payload);
                    tracing::error!(stage = %handle.name, %reason, "worker panicked");
                    errors.push(RuntimeError::WorkerPanicked {
                        name: handle.name,
                        reason,
                    });
                }
            }
        }

        for queue in &self.queues {
            queue.drain_on_shutdown();
        }

        errors
    }
}
