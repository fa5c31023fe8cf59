use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use boa_engine::{Context, Source};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::preprocess;
use crate::sandbox::{self, CaptureBuffer, InputLines, Scope};
use crate::{ExecutionResult, RunnerConfig};

/// Runs scripts in a fresh engine context per call
///
/// Nothing is shared between calls: each run builds its own scope, capture
/// buffer and line cursor. A script failure of any kind comes back as a
/// failed [`ExecutionResult`], never as a Rust error or panic.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: RunnerConfig,
}

impl Executor {
    #[must_use]
    pub const fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Preprocess (unless disabled) and execute `source` against `raw_input`
    #[tracing::instrument(skip_all, fields(code_len = source.len()))]
    pub fn run(&self, source: &str, raw_input: &str) -> ExecutionResult {
        if self.config.preprocess {
            let rewrite = preprocess::rewrite(source);
            for removal in &rewrite.removed {
                tracing::debug!(idiom = ?removal.idiom, line = removal.line, "idiom removed");
            }
            self.execute(&rewrite.code, raw_input)
        } else {
            self.execute(source, raw_input)
        }
    }

    /// Execute already-preprocessed `code` against `raw_input`
    ///
    /// The engine runs on a dedicated thread with a large stack, joined
    /// before returning. Calls made through native callbacks such as
    /// `Array.prototype.forEach` recurse on that stack.
    pub fn execute(&self, code: &str, raw_input: &str) -> ExecutionResult {
        let span = tracing::Span::current();

        let joined = thread::scope(|scope| {
            thread::Builder::new()
                .name("scratchpad-engine".to_string())
                .stack_size(ENGINE_STACK_SIZE)
                .spawn_scoped(scope, || span.in_scope(|| self.execute_here(code, raw_input)))
                .map(|handle| handle.join())
        });

        match joined {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => {
                let message = panic_message(payload.as_ref());
                ExecutionResult::failed(&[], format!("internal engine error: {message}"), Duration::ZERO)
            }
            Err(err) => {
                tracing::error!(%err, "failed to spawn engine thread");
                ExecutionResult::failed(&[], format!("could not start engine: {err}"), Duration::ZERO)
            }
        }
    }

    fn execute_here(&self, code: &str, raw_input: &str) -> ExecutionResult {
        let capture = CaptureBuffer::new();
        let start = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.evaluate(code, raw_input, &capture)
        }));

        let elapsed = start.elapsed();
        let lines = capture.lines();

        let result = match outcome {
            Ok(Ok(())) => {
                ExecutionResult::succeeded(&lines, elapsed, &self.config.empty_output_placeholder)
            }
            Ok(Err(message)) => ExecutionResult::failed(&lines, message, elapsed),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(%message, "script engine panicked");
                ExecutionResult::failed(&lines, format!("internal engine error: {message}"), elapsed)
            }
        };

        tracing::info!(
            success = result.success,
            elapsed_ms = result.elapsed_millis,
            lines = lines.len(),
            "execution finished"
        );

        result
    }

    fn evaluate(&self, code: &str, raw_input: &str, capture: &CaptureBuffer) -> Result<(), String> {
        let mut context = Context::default();
        sandbox::apply_limits(&self.config, &mut context);

        let scope = Scope::new(InputLines::parse(raw_input), capture.clone());
        scope
            .install(&mut context)
            .map_err(|err| sandbox::describe_error(&err, &mut context))?;

        context
            .eval(Source::from_bytes(&function_body(code)))
            .map_err(|err| {
                let message = sandbox::describe_error(&err, &mut context);
                if err.as_native().is_some_and(boa_engine::JsNativeError::is_syntax) {
                    unshift_first_line(&message)
                } else {
                    message
                }
            })?;

        // Promise callbacks queued by the script still belong to this run.
        context.run_jobs();

        tracing::debug!(lines_read = scope.cursor().consumed(), "script completed");
        Ok(())
    }
}

const ENGINE_STACK_SIZE: usize = 256 * 1024 * 1024;

// The script runs as a function body so a top-level `return` ends it early.
// The prologue shares the first line, keeping every line number intact.
const PROLOGUE: &str = "(function () {";
const EPILOGUE: &str = "\n})();";

fn function_body(code: &str) -> String {
    let mut body = String::with_capacity(PROLOGUE.len() + code.len() + EPILOGUE.len());
    body.push_str(PROLOGUE);
    body.push_str(code);
    body.push_str(EPILOGUE);
    body
}

static FIRST_LINE_POSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bat line 1, col (\d+)").expect("position pattern is valid"));

/// Report first-line columns relative to the user's code
fn unshift_first_line(message: &str) -> String {
    FIRST_LINE_POSITION
        .replace_all(message, |caps: &Captures<'_>| {
            let col = caps[1]
                .parse::<usize>()
                .map_or(1, |col| col.saturating_sub(PROLOGUE.len()).max(1));
            format!("at line 1, col {col}")
        })
        .into_owned()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
