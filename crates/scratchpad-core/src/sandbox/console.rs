//! Output capture for `console.*`

use std::cell::RefCell;
use std::rc::Rc;

use boa_engine::object::ObjectInitializer;
use boa_engine::{Context, JsObject, JsValue, NativeFunction, js_string};
use boa_gc::{Finalize, Trace};

use super::format::format_args;

/// Severity of a captured console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Warn,
    Error,
}

impl Level {
    const fn tag(self) -> Option<&'static str> {
        match self {
            Self::Log => None,
            Self::Warn => Some("[WARN]"),
            Self::Error => Some("[ERROR]"),
        }
    }
}

/// Ordered console lines of one execution
///
/// Clones share the same buffer, so the executor keeps one handle while the
/// console functions inside the engine hold others.
#[derive(Debug, Clone, Default, Trace, Finalize)]
pub struct CaptureBuffer {
    #[unsafe_ignore_trace]
    lines: Rc<RefCell<Vec<String>>>,
}

impl CaptureBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one formatted line, prefixed with the level's tag
    pub fn push(&self, level: Level, body: &str) {
        let line = match level.tag() {
            Some(tag) => format!("{tag} {body}"),
            None => body.to_string(),
        };
        self.lines.borrow_mut().push(line);
    }

    /// Snapshot of everything captured so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

fn entry(level: Level, buffer: CaptureBuffer) -> NativeFunction {
    NativeFunction::from_copy_closure_with_captures(
        move |_this, args, buffer: &CaptureBuffer, context| {
            let body = format_args(args, context);
            buffer.push(level, &body);
            Ok(JsValue::undefined())
        },
        buffer,
    )
}

/// Build the `console` object writing into `buffer`
pub(super) fn console_object(buffer: &CaptureBuffer, context: &mut Context) -> JsObject {
    ObjectInitializer::new(context)
        .function(entry(Level::Log, buffer.clone()), js_string!("log"), 0)
        .function(entry(Level::Log, buffer.clone()), js_string!("info"), 0)
        .function(entry(Level::Log, buffer.clone()), js_string!("debug"), 0)
        .function(entry(Level::Warn, buffer.clone()), js_string!("warn"), 0)
        .function(entry(Level::Error, buffer.clone()), js_string!("error"), 0)
        .build()
}
