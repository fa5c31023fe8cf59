//! Input bindings: the `input` lines, the `readline()` cursor and the
//! `fs`/`process` stand-ins

use std::cell::Cell;
use std::rc::Rc;

use boa_engine::object::ObjectInitializer;
use boa_engine::object::builtins::JsArray;
use boa_engine::property::Attribute;
use boa_engine::{Context, JsObject, JsString, JsValue, NativeFunction, js_string};
use boa_gc::{Finalize, Trace};

/// Raw input text trimmed and split into lines, fixed for one execution
#[derive(Debug, Clone, Trace, Finalize)]
pub struct InputLines {
    #[unsafe_ignore_trace]
    data: Rc<str>,
    #[unsafe_ignore_trace]
    lines: Rc<[String]>,
}

impl InputLines {
    /// Trim `raw` and split it on `\n`. Blank input has no lines.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let data = raw.trim();
        let lines: Vec<String> = if data.is_empty() {
            Vec::new()
        } else {
            data.split('\n').map(str::to_string).collect()
        };

        Self {
            data: Rc::from(data),
            lines: Rc::from(lines),
        }
    }

    /// The trimmed input text
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A fresh cursor positioned at the first line
    #[must_use]
    pub fn cursor(&self) -> LineCursor {
        LineCursor {
            lines: Rc::clone(&self.lines),
            next: Rc::new(Cell::new(0)),
        }
    }
}

/// Sequential reader over [`InputLines`]
///
/// Returns each line once, in order, then the empty string forever.
#[derive(Debug, Clone, Trace, Finalize)]
pub struct LineCursor {
    #[unsafe_ignore_trace]
    lines: Rc<[String]>,
    #[unsafe_ignore_trace]
    next: Rc<Cell<usize>>,
}

impl LineCursor {
    pub fn next_line(&self) -> &str {
        let index = self.next.get();
        match self.lines.get(index) {
            Some(line) => {
                self.next.set(index + 1);
                line
            }
            None => "",
        }
    }

    /// Number of lines handed out so far
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.next.get()
    }
}

/// `input`: a script-owned copy of the lines as a JS array
pub(super) fn input_array(input: &InputLines, context: &mut Context) -> JsArray {
    JsArray::from_iter(
        input
            .lines()
            .iter()
            .map(|line| JsValue::from(JsString::from(line.as_str()))),
        context,
    )
}

/// `readline()`: zero-argument line reader backed by `cursor`
pub(super) fn readline_function(cursor: LineCursor) -> NativeFunction {
    NativeFunction::from_copy_closure_with_captures(
        |_this, _args, cursor: &LineCursor, _context| {
            Ok(JsValue::from(JsString::from(cursor.next_line())))
        },
        cursor,
    )
}

/// `fs`: only `readFileSync`, which returns the whole trimmed input
pub(super) fn fs_stub(input: &InputLines, context: &mut Context) -> JsObject {
    let read_file_sync = NativeFunction::from_copy_closure_with_captures(
        |_this, _args, input: &InputLines, _context| Ok(JsValue::from(JsString::from(input.data()))),
        input.clone(),
    );

    ObjectInitializer::new(context)
        .function(read_file_sync, js_string!("readFileSync"), 0)
        .build()
}

/// `process`: only `stdin`, holding the whole trimmed input
pub(super) fn process_stub(input: &InputLines, context: &mut Context) -> JsObject {
    ObjectInitializer::new(context)
        .property(
            js_string!("stdin"),
            JsString::from(input.data()),
            Attribute::all(),
        )
        .build()
}
