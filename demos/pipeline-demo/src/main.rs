//! Registers a handful of toy stages and runs a short VidPipe program
//! through the full `lex -> parse -> build_graph -> execute` surface, the
//! way an embedding application is expected to (spec §6).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vidpipe::{compile_and_run, Frame, RuntimeConfig, StageRegistry};

fn main() {
    tracing_subscriber::fmt::init();

    let source = "counter -> tag_b &> tag_c -> collect";
    println!("Program: {source}");

    let registry = build_registry();
    let runtime = compile_and_run(source, &registry, RuntimeConfig::default())
        .expect("demo program should compile against the demo registry");

    std::thread::sleep(Duration::from_millis(300));
    let errors = runtime.destroy();
    for error in &errors {
        eprintln!("worker error: {error}");
    }

    println!("stopped cleanly: {}", errors.is_empty());
}

/// `counter` emits an incrementing frame every tick; `tag_b`/`tag_c` stamp
/// their branch into the frame's metadata; `collect` prints what arrives.
fn build_registry() -> StageRegistry {
    let mut registry = StageRegistry::new();

    registry.register_fn("counter", true, false, || {
        let mut n = 0u64;
        move |_: Option<Frame>| {
            n += 1;
            if n > 8 {
                return None;
            }
            let mut frame = Frame::new(1, 1, 1);
            frame.timestamp = n;
            Some(frame)
        }
    });

    registry.register_fn("tag_b", false, false, || tag_stage(b"b"));
    registry.register_fn("tag_c", false, false, || tag_stage(b"c"));

    let printed = Arc::new(Mutex::new(Vec::<String>::new()));
    registry.register_fn("collect", false, true, move || {
        let printed = printed.clone();
        move |input: Option<Frame>| {
            if let Some(frame) = &input {
                let tag = frame
                    .metadata
                    .as_deref()
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                    .unwrap_or_default();
                let mut log = printed.lock().unwrap();
                log.push(format!("frame {} tagged {tag}", frame.timestamp));
                println!("{}", log.last().unwrap());
            }
            input
        }
    });

    registry
}

fn tag_stage(tag: &'static [u8]) -> impl FnMut(Option<Frame>) -> Option<Frame> {
    let seen = Arc::new(AtomicU64::new(0));
    move |input: Option<Frame>| {
        seen.fetch_add(1, Ordering::Relaxed);
        input.map(|mut frame| {
            frame.metadata = Some(tag.to_vec());
            frame
        })
    }
}
