//! Regex-based structure detection.
//!
//! This is a heuristic, not a parser. Braces are counted per line without
//! regard to strings or comments, and a declaration is assumed to open at
//! most one block on the line it is declared.

use regex::Regex;
use std::sync::LazyLock;

use crate::semantic::{CodeStructure, StructureDetector};

/// A declaration pattern: the label it produces and the identifiers it must
/// not treat as names.
struct DeclarationPattern {
    kind: &'static str,
    regex: Regex,
    reserved: &'static [&'static str],
}

impl DeclarationPattern {
    fn new(kind: &'static str, pattern: &str, reserved: &'static [&'static str]) -> Self {
        Self {
            kind,
            regex: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid {kind} pattern: {e}")),
            reserved,
        }
    }

    fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.regex.captures(line)?;
        let name = caps.iter().skip(1).flatten().next()?.as_str();
        (!self.reserved.contains(&name)).then_some(name)
    }
}

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "return", "function", "else", "do",
];

/// Declaration patterns in priority order; the first match wins.
static PATTERNS: LazyLock<Vec<DeclarationPattern>> = LazyLock::new(|| {
    vec![
        DeclarationPattern::new(
            "function",
            r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?(?:function(?:\s*\*\s*|\s+)|(?:const|let|var)\s+)([A-Za-z_$][\w$]*)",
            &["enum"],
        ),
        DeclarationPattern::new(
            "class",
            r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)",
            &[],
        ),
        DeclarationPattern::new(
            "method",
            r"^\s*(?:(?:public|private|protected|static|async|get|set|override|readonly)\s+)*([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*(?::\s*[^{]+)?\{",
            CONTROL_KEYWORDS,
        ),
        DeclarationPattern::new(
            "import",
            r#"^\s*import\s+(?:[^'"]*\s+from\s+)?['"]([^'"]+)['"]"#,
            &[],
        ),
        DeclarationPattern::new(
            "export",
            r"^\s*export\s+(?:default\s+([A-Za-z_$][\w$]*)|(\{)|(\*))",
            &[],
        ),
        DeclarationPattern::new(
            "interface",
            r"^\s*(?:export\s+)?(?:declare\s+)?interface\s+([A-Za-z_$][\w$]*)",
            &[],
        ),
        DeclarationPattern::new(
            "type",
            r"^\s*(?:export\s+)?(?:declare\s+)?type\s+([A-Za-z_$][\w$]*)",
            &[],
        ),
        DeclarationPattern::new(
            "enum",
            r"^\s*(?:export\s+)?(?:declare\s+)?(?:const\s+)?enum\s+([A-Za-z_$][\w$]*)",
            &[],
        ),
    ]
});

/// A block that is open at the current line.
struct Frame {
    name: Option<String>,
    start_line: usize,
}

/// Default [`StructureDetector`]: a single top-to-bottom scan matching
/// declaration lines against a fixed pattern table while tracking brace
/// depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexStructureDetector;

impl RegexStructureDetector {
    /// Creates new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `kind:name` for the first pattern matching the line.
    #[must_use]
    pub fn declaration(line: &str) -> Option<String> {
        PATTERNS.iter().find_map(|pattern| {
            pattern.capture(line).map(|name| {
                let name = match name {
                    "{" => "named",
                    "*" => "all",
                    other => other,
                };
                format!("{}:{name}", pattern.kind)
            })
        })
    }
}

impl StructureDetector for RegexStructureDetector {
    fn detect(&self, text: &str) -> Vec<CodeStructure> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut found = Vec::new();
        let mut last_line = 0;

        for (idx, line) in text.split('\n').enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let opens = line.matches('{').count();
            let closes = line.matches('}').count();
            let declaration = Self::declaration(line);

            // Closing braces leading the line end blocks before anything opens.
            let leading_closes = line
                .trim_start()
                .chars()
                .take_while(|c| *c == '}' || c.is_whitespace())
                .filter(|c| *c == '}')
                .count()
                .min(closes);
            close_frames(&mut stack, &mut found, leading_closes, line_no);
            let (opens, closes) = balance(opens, closes - leading_closes);

            match declaration {
                Some(name) if opens > 0 => {
                    stack.push(Frame {
                        name: Some(name),
                        start_line: line_no,
                    });
                    open_anonymous(&mut stack, opens - 1, line_no);
                }
                Some(name) => found.push(CodeStructure::new(name, line_no, line_no)),
                None => open_anonymous(&mut stack, opens, line_no),
            }
            close_frames(&mut stack, &mut found, closes, line_no);
        }

        close_frames(&mut stack, &mut found, usize::MAX, last_line);
        found
    }
}

/// Cancels braces opened and closed on the same line.
const fn balance(opens: usize, closes: usize) -> (usize, usize) {
    if opens >= closes {
        (opens - closes, 0)
    } else {
        (0, closes - opens)
    }
}

fn open_anonymous(stack: &mut Vec<Frame>, count: usize, line_no: usize) {
    stack.extend((0..count).map(|_| Frame {
        name: None,
        start_line: line_no,
    }));
}

fn close_frames(
    stack: &mut Vec<Frame>,
    found: &mut Vec<CodeStructure>,
    count: usize,
    line_no: usize,
) {
    for _ in 0..count {
        let Some(frame) = stack.pop() else {
            return;
        };
        if let Some(name) = frame.name {
            found.push(CodeStructure::new(name, frame.start_line, line_no));
        }
    }
}
