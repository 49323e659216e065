//! Stylesheet structure extraction

use serde::{Deserialize, Serialize};

use crate::error::InspectError;
use crate::Result;

/// Structural summary of one stylesheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesheetSummary {
    /// Selectors of every style rule, in source order, including rules
    /// nested inside `@media`/`@supports` blocks.
    pub selectors: Vec<String>,
    /// Distinct color values used in color and background properties.
    pub colors: Vec<String>,
    pub rule_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

/// Analyze a stylesheet. Fails with [`InspectError::Syntax`] on unbalanced
/// blocks or unterminated comments/strings.
pub fn analyze(source: &str) -> Result<StylesheetSummary> {
    let rules = parse(source)?;

    let selectors = rules.iter().map(|rule| rule.selector.clone()).collect();
    let mut colors: Vec<String> = Vec::new();
    for rule in &rules {
        for declaration in &rule.declarations {
            for color in colors_in(&declaration.property, &declaration.value) {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }
    }

    Ok(StylesheetSummary {
        selectors,
        colors,
        rule_count: rules.len(),
    })
}

/// Every `(selector, value)` pair for a given property name.
pub fn properties(source: &str, property: &str) -> Result<Vec<(String, String)>> {
    let rules = parse(source)?;
    let wanted = property.to_ascii_lowercase();

    Ok(rules
        .into_iter()
        .flat_map(|rule| {
            let selector = rule.selector;
            rule.declarations
                .into_iter()
                .filter(|declaration| declaration.property == wanted)
                .map(move |declaration| (selector.clone(), declaration.value))
                .collect::<Vec<_>>()
        })
        .collect())
}

/// Parse into flat style rules, descending into grouping at-rules.
pub fn parse(source: &str) -> Result<Vec<StyleRule>> {
    let stripped = strip_comments(source)?;
    let mut parser = Parser {
        chars: stripped.chars().collect(),
        pos: 0,
        line: 1,
    };
    let rules = parser.parse_rules()?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(InspectError::syntax(parser.line, "Unexpected closing brace"));
    }
    Ok(rules)
}

fn strip_comments(source: &str) -> Result<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    let mut line = 1;

    while pos < chars.len() {
        if chars[pos] == '\n' {
            line += 1;
        }
        if chars[pos] == '/' && pos + 1 < chars.len() && chars[pos + 1] == '*' {
            let start_line = line;
            pos += 2;
            loop {
                if pos + 1 >= chars.len() {
                    return Err(InspectError::syntax(start_line, "Unterminated comment"));
                }
                if chars[pos] == '\n' {
                    line += 1;
                    out.push('\n');
                }
                if chars[pos] == '*' && chars[pos + 1] == '/' {
                    pos += 2;
                    break;
                }
                pos += 1;
            }
            continue;
        }
        out.push(chars[pos]);
        pos += 1;
    }

    Ok(out)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    /// Parse rules until a closing brace, or end of input at the top level.
    /// A stray closing brace is left for the caller, which knows whether it
    /// closes a grouping at-rule or is an error.
    fn parse_rules(&mut self) -> Result<Vec<StyleRule>> {
        let mut rules = Vec::new();

        loop {
            self.skip_whitespace();
            if self.pos >= self.chars.len() || self.peek() == Some('}') {
                return Ok(rules);
            }

            let prelude_line = self.line;
            let prelude = self.read_prelude()?;

            match self.peek() {
                Some(';') => {
                    // At-statement such as @import or @charset.
                    self.advance();
                }
                Some('{') => {
                    self.advance();
                    if prelude.starts_with('@') {
                        if is_grouping_at_rule(&prelude) {
                            let mut nested = self.parse_rules()?;
                            self.expect_close(prelude_line)?;
                            rules.append(&mut nested);
                        } else {
                            self.skip_block(prelude_line)?;
                        }
                    } else {
                        let declarations = self.read_declarations()?;
                        self.expect_close(prelude_line)?;
                        rules.push(StyleRule {
                            selector: prelude,
                            declarations,
                        });
                    }
                }
                Some('}') => {
                    return Err(InspectError::syntax(
                        prelude_line,
                        "Unexpected closing brace",
                    ));
                }
                None => {
                    if prelude.is_empty() {
                        return Ok(rules);
                    }
                    return Err(InspectError::syntax(prelude_line, "Unclosed block"));
                }
                _ => unreachable!("read_prelude stops at ';', braces, or end"),
            }
        }
    }

    /// Read up to the next top-level `{`, `;`, or end of input.
    fn read_prelude(&mut self) -> Result<String> {
        let mut prelude = String::new();
        while let Some(c) = self.peek() {
            match c {
                '{' | ';' => break,
                '}' => break,
                '"' | '\'' => prelude.push_str(&self.read_string()?),
                _ => {
                    prelude.push(c);
                    self.advance();
                }
            }
        }
        Ok(prelude.trim().to_string())
    }

    fn read_declarations(&mut self) -> Result<Vec<Declaration>> {
        let mut declarations = Vec::new();
        let mut buffer = String::new();
        let start_line = self.line;

        loop {
            match self.peek() {
                None => return Err(InspectError::syntax(start_line, "Unclosed block")),
                Some('}') => break,
                Some(';') => {
                    self.advance();
                    if let Some(declaration) = split_declaration(&buffer) {
                        declarations.push(declaration);
                    }
                    buffer.clear();
                }
                Some('"') | Some('\'') => {
                    let string = self.read_string()?;
                    buffer.push_str(&string);
                }
                Some(c) => {
                    buffer.push(c);
                    self.advance();
                }
            }
        }

        if let Some(declaration) = split_declaration(&buffer) {
            declarations.push(declaration);
        }
        Ok(declarations)
    }

    fn read_string(&mut self) -> Result<String> {
        let quote = self.peek().unwrap_or('"');
        let start_line = self.line;
        let mut out = String::new();
        out.push(quote);
        self.advance();

        while let Some(c) = self.peek() {
            if c == '\n' {
                return Err(InspectError::syntax(start_line, "Unterminated string"));
            }
            out.push(c);
            self.advance();
            if c == quote {
                return Ok(out);
            }
        }
        Err(InspectError::syntax(start_line, "Unterminated string"))
    }

    /// Skip a balanced block whose opening brace was already consumed.
    fn skip_block(&mut self, open_line: usize) -> Result<()> {
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => {
                    self.read_string()?;
                    continue;
                }
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
        Err(InspectError::syntax(open_line, "Unclosed block"))
    }

    fn expect_close(&mut self, open_line: usize) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.advance();
            Ok(())
        } else {
            Err(InspectError::syntax(open_line, "Unclosed block"))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.peek() == Some('\n') {
            self.line += 1;
        }
        self.pos += 1;
    }
}

fn is_grouping_at_rule(prelude: &str) -> bool {
    let name = prelude
        .trim_start_matches('@')
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(name.as_str(), "media" | "supports" | "layer" | "scope")
}

fn split_declaration(buffer: &str) -> Option<Declaration> {
    let (property, value) = buffer.split_once(':')?;
    let property = property.trim().to_ascii_lowercase();
    let value = value.trim().to_string();
    if property.is_empty() || value.is_empty() {
        return None;
    }
    Some(Declaration { property, value })
}

const NAMED_COLORS: &[&str] = &[
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "brown",
    "gray", "grey", "cyan", "magenta", "silver", "maroon", "navy", "teal", "olive", "lime",
    "aqua", "fuchsia", "coral", "gold", "indigo", "ivory", "khaki", "lavender", "salmon", "tan",
    "turquoise", "violet", "beige", "azure", "crimson", "chocolate", "tomato", "orchid", "plum",
    "transparent",
];

/// Colors referenced by a declaration, when the property is color-bearing.
fn colors_in(property: &str, value: &str) -> Vec<String> {
    let mut colors = Vec::new();
    if !(property.contains("color") || property.starts_with("background")) {
        return colors;
    }

    let chars: Vec<char> = value.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];

        // Hex colors
        if c == '#' {
            let start = pos;
            pos += 1;
            while pos < chars.len() && chars[pos].is_ascii_hexdigit() {
                pos += 1;
            }
            let len = pos - start - 1;
            if matches!(len, 3 | 4 | 6 | 8) {
                colors.push(chars[start..pos].iter().collect());
            }
            continue;
        }

        // Functional and named colors
        if c.is_ascii_alphabetic() {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '-') {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let lowered = word.to_ascii_lowercase();

            if matches!(lowered.as_str(), "rgb" | "rgba" | "hsl" | "hsla")
                && chars.get(pos) == Some(&'(')
            {
                let fn_start = start;
                while pos < chars.len() && chars[pos] != ')' {
                    pos += 1;
                }
                if pos < chars.len() {
                    pos += 1;
                }
                colors.push(chars[fn_start..pos].iter().collect());
                continue;
            }

            if NAMED_COLORS.contains(&lowered.as_str()) {
                colors.push(lowered);
            }
            continue;
        }

        pos += 1;
    }

    colors
}
