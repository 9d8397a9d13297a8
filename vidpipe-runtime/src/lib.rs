//! Drives a built dataflow graph with one worker thread per execution node,
//! using cooperative polling for backpressure-aware shutdown (spec §4.4,
//! §5).

mod error;
mod runtime;
mod worker;

pub use error::RuntimeError;
pub use runtime::Runtime;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use vidpipe_common::{Frame, RuntimeConfig, StageRegistry};
    use vidpipe_graph::build_graph;
    use vidpipe_lexer::lex;
    use vidpipe_parser::parse;

    use super::*;

    fn fast_config() -> RuntimeConfig {
        RuntimeConfig {
            default_queue_capacity: 1,
            default_buffered_capacity: 10,
            pace_millis: 2,
            yield_millis: 0,
            poll_millis: 0,
        }
    }

    fn build_and_run(source: &str, registry: &StageRegistry, config: RuntimeConfig) -> Runtime {
        let tree = parse(lex(source)).expect("fixture source must parse");
        let graph = build_graph(&tree, registry).expect("fixture graph must build");
        Runtime::execute(graph, config)
    }

    #[test]
    fn fifo_timestamps_are_strictly_increasing_at_the_sink() {
        let observed: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
        let observed_for_sink = observed.clone();
        let counter = Arc::new(AtomicU64::new(0));

        let mut registry = StageRegistry::new();
        registry.register_fn("src", true, false, move || {
            let counter = counter.clone();
            move |_: Option<Frame>| {
                let mut frame = Frame::new(1, 1, 1);
                frame.timestamp = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Some(frame)
            }
        });
        registry.register_fn("id", false, false, || |input: Option<Frame>| input);
        registry.register_fn("sink", false, true, move || {
            let observed = observed_for_sink.clone();
            move |input: Option<Frame>| {
                if let Some(frame) = &input {
                    observed.lock().unwrap().push(frame.timestamp);
                }
                input
            }
        });

        let runtime = build_and_run("src -> id -> sink", &registry, fast_config());
        std::thread::sleep(Duration::from_millis(80));
        runtime.destroy();

        let timestamps = observed.lock().unwrap();
        assert!(timestamps.len() >= 2, "expected several frames to arrive");
        assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn shutdown_completes_promptly_on_an_acyclic_pipeline() {
        let mut registry = StageRegistry::new();
        registry.register_fn("src", true, false, || |_: Option<Frame>| Some(Frame::new(1, 1, 1)));
        registry.register_fn("sink", false, true, || |input: Option<Frame>| input);

        let runtime = build_and_run("src -> sink", &registry, fast_config());
        std::thread::sleep(Duration::from_millis(20));

        let start = Instant::now();
        let errors = runtime.destroy();
        assert!(errors.is_empty());
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn fan_out_branches_each_see_every_frame() {
        let branch_a = Arc::new(AtomicU64::new(0));
        let branch_b = Arc::new(AtomicU64::new(0));
        let counter_a = branch_a.clone();
        let counter_b = branch_b.clone();

        let mut registry = StageRegistry::new();
        registry.register_fn("src", true, false, || |_: Option<Frame>| Some(Frame::new(1, 1, 1)));
        registry.register_fn("a", false, true, move || {
            let counter_a = counter_a.clone();
            move |input: Option<Frame>| {
                if input.is_some() {
                    counter_a.fetch_add(1, Ordering::SeqCst);
                }
                None
            }
        });
        registry.register_fn("b", false, true, move || {
            let counter_b = counter_b.clone();
            move |input: Option<Frame>| {
                if input.is_some() {
                    counter_b.fetch_add(1, Ordering::SeqCst);
                }
                None
            }
        });

        let runtime = build_and_run("src -> a &> b", &registry, fast_config());
        std::thread::sleep(Duration::from_millis(80));
        runtime.destroy();

        let a = branch_a.load(Ordering::SeqCst);
        let b = branch_b.load(Ordering::SeqCst);
        assert!(a > 0 && b > 0);
        assert!(a.abs_diff(b) <= 1);
    }

    #[test]
    fn buffered_edge_bounds_peak_in_flight_frames_under_a_slow_consumer() {
        let in_flight = Arc::new(AtomicU64::new(0));
        let peak = Arc::new(AtomicU64::new(0));
        let producer_count = in_flight.clone();
        let consumer_count = in_flight.clone();
        let peak_tracker = peak.clone();

        let mut registry = StageRegistry::new();
        registry.register_fn("src", true, false, move || {
            let in_flight = producer_count.clone();
            let peak = peak_tracker.clone();
            move |_: Option<Frame>| {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                Some(Frame::new(1, 1, 1))
            }
        });
        registry.register_fn("slow", false, true, move || {
            let in_flight = consumer_count.clone();
            move |input: Option<Frame>| {
                std::thread::sleep(Duration::from_millis(10));
                if input.is_some() {
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
                None
            }
        });

        let config = RuntimeConfig {
            default_queue_capacity: 1,
            ..fast_config()
        };
        let runtime = build_and_run("src [1]-> slow", &registry, config);
        std::thread::sleep(Duration::from_millis(100));
        runtime.destroy();

        // One frame may sit in the producer's hand and one in the
        // consumer's, on top of the bounded queue itself.
        assert!(peak.load(Ordering::SeqCst) <= 1 /* capacity */ + 2);
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut registry = StageRegistry::new();
        registry.register_fn("src", true, false, || |_: Option<Frame>| Some(Frame::new(1, 1, 1)));
        registry.register_fn("sink", false, true, || |input: Option<Frame>| input);

        let runtime = build_and_run("src -> sink", &registry, fast_config());
        std::thread::sleep(Duration::from_millis(10));
        let first = runtime.destroy();
        let second = runtime.destroy();
        assert!(first.is_empty());
        assert!(second.is_empty());
    }
}
