//! Rewrites stdin-acquisition idioms out of a script
//!
//! The sandbox has no file system and no process stdin, so the usual
//! competitive-programming preludes (`require('fs')`, `fs.readFileSync(0)`,
//! `readline.createInterface(..)`) would fail before any user logic runs.
//! Each recognized statement is replaced by a comment marker; the scope
//! already provides `input` and `readline()` in their place.
//!
//! Matching is textual and anchored to whole statements. An idiom used as a
//! sub-expression (`foo(require('fs'))`) is left untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A recognized stdin-acquisition statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Idiom {
    /// `const fs = require('fs');`
    FsRequire,
    /// `const input = fs.readFileSync(0, 'utf8')...;`
    FsReadInput,
    /// `const readline = require('readline');`
    ReadlineRequire,
    /// `const rl = readline.createInterface(...);`
    ReadlineInterface,
    /// `const input = require('fs').readFileSync('/dev/stdin')...;`
    InlineFsReadInput,
}

impl Idiom {
    /// Every idiom, in the order the rules are applied
    pub const ALL: [Self; 5] = [
        Self::FsRequire,
        Self::FsReadInput,
        Self::ReadlineRequire,
        Self::ReadlineInterface,
        Self::InlineFsReadInput,
    ];

    /// Comment written in place of the removed statement
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::FsRequire => "// [removed] fs require",
            Self::FsReadInput => "// [removed] fs.readFileSync - input is provided",
            Self::ReadlineRequire => "// [removed] readline require",
            Self::ReadlineInterface => "// [removed] readline interface",
            Self::InlineFsReadInput => "// [removed] inline fs.readFileSync - input is provided",
        }
    }

    // Whitespace runs never cross a line break. Call arguments may span lines,
    // and a read tail continues onto lines that start with `.`; the newlines
    // they contain are kept after the marker.
    const fn pattern(self) -> &'static str {
        match self {
            Self::FsRequire => concat!(
                r#"(?mR)^(?P<indent>[ \t]*)(?:const|let|var)[ \t]+fs[ \t]*=[ \t]*"#,
                r#"require[ \t]*\([ \t]*['"]fs['"][ \t]*\)[ \t]*;?[ \t]*$"#,
            ),
            Self::FsReadInput => concat!(
                r#"(?mR)^(?P<indent>[ \t]*)(?:const|let|var)[ \t]+input[ \t]*=[ \t]*"#,
                r#"fs\.readFileSync[ \t]*\([^)]*\)"#,
                r#"[^;\r\n]*(?:\r?\n[ \t]*\.[^;\r\n]*)*;?[ \t]*$"#,
            ),
            Self::ReadlineRequire => concat!(
                r#"(?mR)^(?P<indent>[ \t]*)(?:const|let|var)[ \t]+readline[ \t]*=[ \t]*"#,
                r#"require[ \t]*\([ \t]*['"]readline['"][ \t]*\)[ \t]*;?[ \t]*$"#,
            ),
            Self::ReadlineInterface => concat!(
                r#"(?mR)^(?P<indent>[ \t]*)(?:const|let|var)[ \t]+rl[ \t]*=[ \t]*"#,
                r#"readline\.createInterface[ \t]*\([^)]*\)[ \t]*;?[ \t]*$"#,
            ),
            Self::InlineFsReadInput => concat!(
                r#"(?mR)^(?P<indent>[ \t]*)(?:const|let|var)[ \t]+input[ \t]*=[ \t]*"#,
                r#"require[ \t]*\([ \t]*['"]fs['"][ \t]*\)[ \t]*\.readFileSync[ \t]*\([^)]*\)"#,
                r#"[^;\r\n]*(?:\r?\n[ \t]*\.[^;\r\n]*)*;?[ \t]*$"#,
            ),
        }
    }
}

/// One removed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub idiom: Idiom,
    /// 1-based line where the statement started
    pub line: usize,
}

/// Output of [`rewrite`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub code: String,
    /// Removed statements ordered by line
    pub removed: Vec<Removal>,
}

impl Rewrite {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty()
    }
}

struct Rule {
    idiom: Idiom,
    pattern: Regex,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    Idiom::ALL
        .iter()
        .map(|&idiom| Rule {
            idiom,
            pattern: Regex::new(idiom.pattern()).expect("idiom patterns are valid"),
        })
        .collect()
});

impl Rule {
    fn apply(&self, source: &str, removed: &mut Vec<Removal>) -> String {
        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            let indent = caps.name("indent").map_or("", |m| m.as_str());

            out.push_str(&source[last..whole.start()]);
            out.push_str(indent);
            out.push_str(self.idiom.marker());
            out.extend(whole.as_str().chars().filter(|c| matches!(c, '\r' | '\n')));

            removed.push(Removal {
                idiom: self.idiom,
                line: line_of(source, whole.start()),
            });
            last = whole.end();
        }

        out.push_str(&source[last..]);
        out
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Rewrite every recognized idiom and report what was removed
///
/// Lines that are not part of a recognized statement pass through byte for
/// byte, and the total line count never changes.
#[must_use]
pub fn rewrite(source: &str) -> Rewrite {
    let mut removed = Vec::new();
    let mut code = source.to_string();

    for rule in RULES.iter() {
        if rule.pattern.is_match(&code) {
            code = rule.apply(&code, &mut removed);
        }
    }

    removed.sort_by_key(|r| r.line);

    if !removed.is_empty() {
        tracing::debug!(count = removed.len(), "removed stdin idioms");
    }

    Rewrite { code, removed }
}

/// Rewrite every recognized idiom, returning only the code
#[must_use]
pub fn preprocess(source: &str) -> String {
    rewrite(source).code
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_fs_prelude_and_keeps_logic() {
        let source = "const fs = require('fs');\n\
                      const input = fs.readFileSync(0,'utf8').trim().split('\\n');\n\
                      console.log(input[0]);";
        let rewrite = rewrite(source);

        assert_eq!(
            rewrite.code,
            "// [removed] fs require\n\
             // [removed] fs.readFileSync - input is provided\n\
             console.log(input[0]);"
        );
        assert_eq!(
            rewrite.removed,
            vec![
                Removal { idiom: Idiom::FsRequire, line: 1 },
                Removal { idiom: Idiom::FsReadInput, line: 2 },
            ]
        );
    }

    #[test]
    fn accepts_let_var_double_quotes_and_no_semicolon() {
        let source = "var fs = require(\"fs\")\nlet input = fs.readFileSync('/dev/stdin').toString().split(' ')";
        assert_eq!(
            preprocess(source),
            "// [removed] fs require\n// [removed] fs.readFileSync - input is provided"
        );
    }

    #[test]
    fn removes_readline_prelude() {
        let source = "const readline = require('readline');\n\
                      const rl = readline.createInterface({ input: process.stdin });\n\
                      const n = Number(readline());";
        assert_eq!(
            preprocess(source),
            "// [removed] readline require\n\
             // [removed] readline interface\n\
             const n = Number(readline());"
        );
    }

    #[test]
    fn multi_line_interface_keeps_line_count() {
        let source = "const rl = readline.createInterface({\n  input: process.stdin,\n  output: process.stdout,\n});\nrun();";
        let code = preprocess(source);

        assert_eq!(code, "// [removed] readline interface\n\n\n\nrun();");
        assert_eq!(code.lines().count(), source.lines().count());
    }

    #[test]
    fn removes_inline_read() {
        let source = "const input = require('fs').readFileSync('/dev/stdin', 'utf8').trim().split('\\n');";
        let rewrite = rewrite(source);
        assert_eq!(rewrite.code, Idiom::InlineFsReadInput.marker());
        assert_eq!(rewrite.removed[0].idiom, Idiom::InlineFsReadInput);
    }

    #[test]
    fn keeps_indentation_and_crlf() {
        let source = "  const fs = require('fs');\r\nconsole.log(1);\r\n";
        assert_eq!(preprocess(source), "  // [removed] fs require\r\nconsole.log(1);\r\n");
    }

    #[test]
    fn reports_line_numbers_in_order() {
        let source = "let x = 1;\nconst readline = require('readline');\n\nconst fs = require('fs');";
        let lines: Vec<usize> = rewrite(source).removed.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn sub_expressions_are_left_alone() {
        let source = "const data = parse(require('fs').readFileSync(0));\n\
                      const fs = require('fs'), path = require('path');\n\
                      if (ok) { const fs = require('fs'); }";
        let rewrite = rewrite(source);
        assert!(rewrite.is_unchanged());
        assert_eq!(rewrite.code, source);
    }

    #[test]
    fn read_without_semicolon_does_not_swallow_next_line() {
        let source = "const input = fs.readFileSync(0).toString()\nconsole.log(input)";
        assert_eq!(
            preprocess(source),
            "// [removed] fs.readFileSync - input is provided\nconsole.log(input)"
        );
    }

    #[test]
    fn read_chain_continues_onto_dotted_lines() {
        let source = "const fs = require('fs');\n\
                      const input = fs.readFileSync('/dev/stdin', 'utf8')\n  .trim()\n  .split('\\n');\n\
                      console.log(input[0]);";
        let rewrite = rewrite(source);

        assert_eq!(
            rewrite.code,
            "// [removed] fs require\n\
             // [removed] fs.readFileSync - input is provided\n\n\n\
             console.log(input[0]);"
        );
        assert_eq!(rewrite.code.lines().count(), source.lines().count());
        assert_eq!(rewrite.removed[1], Removal { idiom: Idiom::FsReadInput, line: 2 });
    }

    #[test]
    fn inline_read_chain_with_crlf() {
        let source = "let input = require('fs').readFileSync(0)\r\n\t.toString()\r\n\t.split(' ')\r\nsolve(input);";
        assert_eq!(
            preprocess(source),
            "// [removed] inline fs.readFileSync - input is provided\r\n\r\n\r\nsolve(input);"
        );
    }

    #[test]
    fn terminated_read_does_not_take_next_dotted_line() {
        let source = "const input = fs.readFileSync(0);\n.5 + 1;";
        assert_eq!(
            preprocess(source),
            "// [removed] fs.readFileSync - input is provided\n.5 + 1;"
        );
    }

    #[test]
    fn pass_through_without_idioms() {
        let source = "function solve(a, b) {\n\treturn a + b;\n}\nconsole.log(solve(1, 2));\n";
        assert_eq!(preprocess(source), source);
    }

    #[test]
    fn rewriting_twice_is_rewriting_once() {
        let source = "const fs = require('fs');\nconst input = require('fs').readFileSync(0);\n\
                      const readline = require('readline');\nconst rl = readline.createInterface({\n});\n\
                      console.log(input);";
        let once = preprocess(source);
        assert_eq!(preprocess(&once), once);
    }

    #[test]
    fn empty_source_is_empty() {
        assert_eq!(preprocess(""), "");
    }
}
