use std::collections::HashMap;
use std::sync::Arc;

use crate::Frame;

/// A single stage's per-run state and transform, constructed fresh for each
/// execution node (spec §9, "Process-wide state in source stages"): instead
/// of static storage inside a stage function, each graph node owns a boxed
/// `Stage` instance, so re-running a pipeline never carries residue from a
/// previous run.
///
/// Implementers must not mutate `input` unless they also return it as
/// `output` (pass-through identity), must allocate a fresh frame when
/// transforming shape or channel count, and must treat any parameters
/// captured at construction time as read-only (spec §6).
pub trait Stage: Send {
    /// Sources ignore `input` (always `None`) and synthesize frames. Sinks
    /// consume `input` for side effects and return `None` or the input
    /// itself as a pass-through. Everything else transforms `input` into
    /// `output`.
    fn process(&mut self, input: Option<Frame>) -> Option<Frame>;
}

/// Builds fresh [`Stage`] instances and records the source/sink flags the
/// graph builder and runtime use to decide how a node is driven (spec §3,
/// "Stage descriptor").
pub trait StageFactory: Send + Sync {
    /// Instantiates a new stage, with its own private state.
    fn create(&self) -> Box<dyn Stage>;

    /// True if this stage ignores its input and synthesizes frames.
    fn is_source(&self) -> bool {
        false
    }

    /// True if this stage consumes frames and produces none (or a
    /// pass-through only).
    fn is_sink(&self) -> bool {
        false
    }
}

struct FnStage<F>(F);

impl<F> Stage for FnStage<F>
where
    F: FnMut(Option<Frame>) -> Option<Frame> + Send,
{
    fn process(&mut self, input: Option<Frame>) -> Option<Frame> {
        (self.0)(input)
    }
}

struct FnStageFactory<F> {
    make: F,
    is_source: bool,
    is_sink: bool,
}

impl<F, S> StageFactory for FnStageFactory<F>
where
    F: Fn() -> S + Send + Sync,
    S: FnMut(Option<Frame>) -> Option<Frame> + Send + 'static,
{
    fn create(&self) -> Box<dyn Stage> {
        Box::new(FnStage((self.make)()))
    }

    fn is_source(&self) -> bool {
        self.is_source
    }

    fn is_sink(&self) -> bool {
        self.is_sink
    }
}

/// The core's only extension point: a read-only, name-keyed table of stage
/// factories, populated before a pipeline starts and never mutated while
/// workers are running (spec §5, "Shared mutable state").
#[derive(Default, Clone)]
pub struct StageRegistry {
    entries: HashMap<String, Arc<dyn StageFactory>>,
}

impl StageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a stage under `name`, built from a factory trait object.
    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn StageFactory>) {
        self.entries.insert(name.into(), factory);
    }

    /// Registers a stage whose state is produced by calling `make()` once
    /// per execution node. Convenience wrapper around [`StageRegistry::
    /// register`] for the common case of a closure-backed stage.
    pub fn register_fn<F, S>(&mut self, name: impl Into<String>, is_source: bool, is_sink: bool, make: F)
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: FnMut(Option<Frame>) -> Option<Frame> + Send + 'static,
    {
        self.register(
            name,
            Arc::new(FnStageFactory {
                make,
                is_source,
                is_sink,
            }),
        );
    }

    /// Looks up a stage factory by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn StageFactory>> {
        self.entries.get(name).cloned()
    }

    /// True if a stage is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_fn_roundtrips_source() {
        let mut registry = StageRegistry::new();
        let mut counter = 0u64;
        registry.register_fn("const", true, false, move || {
            let mut n = counter;
            counter += 1;
            move |_input: Option<Frame>| {
                n += 1;
                let mut frame = Frame::new(1, 1, 1);
                frame.timestamp = n;
                Some(frame)
            }
        });

        let factory = registry.get("const").expect("registered");
        assert!(factory.is_source());
        assert!(!factory.is_sink());

        let mut stage = factory.create();
        let first = stage.process(None).unwrap();
        let second = stage.process(None).unwrap();
        assert_eq!(first.timestamp, 1);
        assert_eq!(second.timestamp, 2);
    }

    #[test]
    fn each_instance_has_independent_state() {
        let mut registry = StageRegistry::new();
        registry.register_fn("counter", true, false, || {
            let mut n = 0u64;
            move |_: Option<Frame>| {
                n += 1;
                let mut frame = Frame::new(1, 1, 1);
                frame.timestamp = n;
                Some(frame)
            }
        });
        let factory = registry.get("counter").unwrap();
        let mut a = factory.create();
        let mut b = factory.create();
        assert_eq!(a.process(None).unwrap().timestamp, 1);
        assert_eq!(a.process(None).unwrap().timestamp, 2);
        assert_eq!(b.process(None).unwrap().timestamp, 1);
    }

    #[test]
    fn unknown_name_is_none() {
        let registry = StageRegistry::new();
        assert!(registry.get("missing").is_none());
        assert!(!registry.contains("missing"));
    }
}
