//! Destroy-hook execution for container shutdown.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::types::TypeDescriptor;

/// Runs a destroy hook, turning a panic inside the hook into an error so the
/// remaining hooks still run.
pub(crate) fn run_destroy_hook(
    descriptor: &TypeDescriptor,
    hook: &str,
    instance: &(dyn Any + Send + Sync),
) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| descriptor.run_destroy(hook, instance))) {
        Ok(result) => result,
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}
