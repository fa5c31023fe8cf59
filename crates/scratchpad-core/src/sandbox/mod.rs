//! Evaluation scope for one script
//!
//! Every execution gets a new engine context holding exactly these globals:
//! - `input`: the input lines as an array
//! - `readline()`: next unread input line, `""` once exhausted
//! - `fs.readFileSync()` and `process.stdin`: the whole trimmed input
//! - `console.log/info/debug/warn/error`: writes into a [`CaptureBuffer`]
//!
//! The engine itself offers no module loader, file system or network.

mod console;
mod format;
mod input;

pub use console::{CaptureBuffer, Level};
pub use format::{format_args, format_value};
pub use input::{InputLines, LineCursor};

use boa_engine::property::Attribute;
use boa_engine::{Context, JsError, JsResult, js_string};

use crate::RunnerConfig;

/// Bindings injected into a fresh context
#[derive(Debug, Clone)]
pub struct Scope {
    input: InputLines,
    cursor: LineCursor,
    capture: CaptureBuffer,
}

impl Scope {
    #[must_use]
    pub fn new(input: InputLines, capture: CaptureBuffer) -> Self {
        let cursor = input.cursor();
        Self {
            input,
            cursor,
            capture,
        }
    }

    #[must_use]
    pub const fn input(&self) -> &InputLines {
        &self.input
    }

    #[must_use]
    pub const fn cursor(&self) -> &LineCursor {
        &self.cursor
    }

    #[must_use]
    pub const fn capture(&self) -> &CaptureBuffer {
        &self.capture
    }

    /// Register every binding as a writable, configurable global of `context`
    ///
    /// The script may reassign or shadow them; the executor's copies are
    /// unaffected.
    pub fn install(&self, context: &mut Context) -> JsResult<()> {
        let attribute = Attribute::WRITABLE | Attribute::CONFIGURABLE;

        let input = input::input_array(&self.input, context);
        context.register_global_property(js_string!("input"), input, attribute)?;

        context.register_global_callable(
            js_string!("readline"),
            0,
            input::readline_function(self.cursor.clone()),
        )?;

        let fs = input::fs_stub(&self.input, context);
        context.register_global_property(js_string!("fs"), fs, attribute)?;

        let process = input::process_stub(&self.input, context);
        context.register_global_property(js_string!("process"), process, attribute)?;

        let console = console::console_object(&self.capture, context);
        context.register_global_property(js_string!("console"), console, attribute)?;

        tracing::debug!(input_lines = self.input.len(), "scope installed");
        Ok(())
    }
}

/// Apply the configured engine bounds to `context`
///
/// A `None` bound is lifted entirely rather than left at the engine's own
/// default.
pub fn apply_limits(config: &RunnerConfig, context: &mut Context) {
    let mut limits = context.runtime_limits();

    limits.set_loop_iteration_limit(config.loop_iteration_limit.unwrap_or(u64::MAX));
    limits.set_recursion_limit(config.recursion_limit.unwrap_or(usize::MAX));
    limits.set_stack_size_limit(config.stack_size_limit.unwrap_or(usize::MAX));

    context.set_runtime_limits(limits);
}

/// Human-readable message for a failure raised by the script
///
/// Error objects yield their `message`; any other thrown value yields its
/// string conversion.
pub fn describe_error(err: &JsError, context: &mut Context) -> String {
    if let Some(native) = err.as_native() {
        return native.message().to_string();
    }

    match err.try_native(context) {
        Ok(native) => native.message().to_string(),
        Err(_) => {
            let thrown = err.to_opaque(context);
            format::string_conversion(&thrown, context)
        }
    }
}
