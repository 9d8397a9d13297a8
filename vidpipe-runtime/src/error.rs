/// Runtime-boundary failures (spec §7, "Stage panic/exception").
///
/// A panicking stage is never recovered mid-run; it only surfaces here once
/// [`crate::Runtime::destroy`] joins the worker thread that carried it.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("worker for stage {name:?} panicked: {reason}")]
    WorkerPanicked { name: String, reason: String },
}

pub(crate) fn describe_panic(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
