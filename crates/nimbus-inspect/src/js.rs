//! Script structure extraction
//!
//! A light tokenizer plus pattern scans: enough to report module type,
//! dependency lists, and declared names. Regex literals and other grammar
//! corners are out of scope.

use serde::{Deserialize, Serialize};

use crate::error::InspectError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Es6,
    CommonJs,
    None,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Es6 => "es6",
            ModuleType::CommonJs => "commonjs",
            ModuleType::None => "none",
        }
    }
}

impl std::fmt::Display for ModuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural summary of one script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSummary {
    pub module_type: ModuleType,
    /// Sources of ES module imports (and re-exports).
    pub imports: Vec<String>,
    /// Arguments of `require(...)` calls.
    pub requires: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub variables: Vec<String>,
}

/// Analyze a script. Fails with [`InspectError::Syntax`] on unterminated
/// strings or comments and unbalanced braces.
pub fn analyze(source: &str) -> Result<ScriptSummary> {
    let tokens = tokenize(source)?;

    let module_type = detect_module_type(&tokens);
    let (imports, requires) = collect_dependencies(&tokens);
    let (functions, classes, variables) = collect_declarations(&tokens);

    Ok(ScriptSummary {
        module_type,
        imports,
        requires,
        functions,
        classes,
        variables,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Punct(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    #[allow(dead_code)]
    line: usize,
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0;
    let mut line = 1;
    let mut open_braces: Vec<usize> = Vec::new();

    while pos < chars.len() {
        let c = chars[pos];

        if c == '\n' {
            line += 1;
            pos += 1;
            continue;
        }
        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        // Comments
        if c == '/' && pos + 1 < chars.len() {
            match chars[pos + 1] {
                '/' => {
                    while pos < chars.len() && chars[pos] != '\n' {
                        pos += 1;
                    }
                    continue;
                }
                '*' => {
                    let start_line = line;
                    pos += 2;
                    loop {
                        if pos + 1 >= chars.len() {
                            return Err(InspectError::syntax(start_line, "Unterminated comment"));
                        }
                        if chars[pos] == '\n' {
                            line += 1;
                        }
                        if chars[pos] == '*' && chars[pos + 1] == '/' {
                            pos += 2;
                            break;
                        }
                        pos += 1;
                    }
                    continue;
                }
                _ => {}
            }
        }

        // String literals; backtick templates may span lines
        if c == '\'' || c == '"' || c == '`' {
            let quote = c;
            let start_line = line;
            let mut value = String::new();
            pos += 1;
            loop {
                if pos >= chars.len() {
                    return Err(InspectError::syntax(start_line, "Unterminated string"));
                }
                let sc = chars[pos];
                if sc == '\\' && pos + 1 < chars.len() {
                    value.push(chars[pos + 1]);
                    pos += 2;
                    continue;
                }
                if sc == '\n' {
                    if quote != '`' {
                        return Err(InspectError::syntax(start_line, "Unterminated string"));
                    }
                    line += 1;
                }
                if sc == quote {
                    pos += 1;
                    break;
                }
                value.push(sc);
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Str(value),
                line: start_line,
            });
            continue;
        }

        // Identifiers and keywords
        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = pos;
            while pos < chars.len()
                && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_' || chars[pos] == '$')
            {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(chars[start..pos].iter().collect()),
                line,
            });
            continue;
        }

        if c == '{' {
            open_braces.push(line);
        }
        if c == '}' && open_braces.pop().is_none() {
            return Err(InspectError::syntax(line, "Unexpected closing brace"));
        }

        tokens.push(Token {
            kind: TokenKind::Punct(c),
            line,
        });
        pos += 1;
    }

    if let Some(open_line) = open_braces.pop() {
        return Err(InspectError::syntax(open_line, "Unbalanced braces"));
    }

    Ok(tokens)
}

fn ident(token: &Token) -> Option<&str> {
    match &token.kind {
        TokenKind::Ident(name) => Some(name),
        _ => None,
    }
}

fn punct(token: &Token) -> Option<char> {
    match token.kind {
        TokenKind::Punct(c) => Some(c),
        _ => None,
    }
}

fn detect_module_type(tokens: &[Token]) -> ModuleType {
    let mut has_commonjs = false;

    for (i, token) in tokens.iter().enumerate() {
        match ident(token) {
            Some("import") | Some("export") => return ModuleType::Es6,
            Some("require") => {
                if matches!(tokens.get(i + 1).and_then(punct), Some('(')) {
                    has_commonjs = true;
                }
            }
            Some("module") => {
                if matches!(tokens.get(i + 1).and_then(punct), Some('.'))
                    && tokens.get(i + 2).and_then(ident) == Some("exports")
                {
                    has_commonjs = true;
                }
            }
            Some("exports") => {
                if matches!(tokens.get(i + 1).and_then(punct), Some('.')) {
                    has_commonjs = true;
                }
            }
            _ => {}
        }
    }

    if has_commonjs {
        ModuleType::CommonJs
    } else {
        ModuleType::None
    }
}

fn collect_dependencies(tokens: &[Token]) -> (Vec<String>, Vec<String>) {
    let mut imports = Vec::new();
    let mut requires = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match ident(token) {
            Some("import") | Some("export") => {
                // `import "x"` side-effect form
                if let Some(TokenKind::Str(source)) = tokens.get(i + 1).map(|t| &t.kind) {
                    imports.push(source.clone());
                    continue;
                }
                // `import ... from "x"` / `export ... from "x"`: scan ahead
                // to the end of the statement for the source string
                for j in (i + 1)..tokens.len() {
                    if matches!(punct(&tokens[j]), Some(';')) {
                        break;
                    }
                    if ident(&tokens[j]) == Some("from") {
                        if let Some(TokenKind::Str(source)) = tokens.get(j + 1).map(|t| &t.kind) {
                            imports.push(source.clone());
                        }
                        break;
                    }
                }
            }
            Some("require") => {
                // require("x") with at most a couple of tokens of slack
                for j in (i + 1)..tokens.len().min(i + 5) {
                    if let TokenKind::Str(source) = &tokens[j].kind {
                        if !source.is_empty() {
                            requires.push(source.clone());
                        }
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    (imports, requires)
}

fn collect_declarations(tokens: &[Token]) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut functions = Vec::new();
    let mut classes = Vec::new();
    let mut variables = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match ident(token) {
            Some("function") => {
                if let Some(name) = tokens.get(i + 1).and_then(ident) {
                    functions.push(name.to_string());
                }
            }
            Some("class") => {
                if let Some(name) = tokens.get(i + 1).and_then(ident) {
                    classes.push(name.to_string());
                }
            }
            Some("const") | Some("let") | Some("var") => {
                let Some(name) = tokens.get(i + 1).and_then(ident) else {
                    continue;
                };
                // `for (const x of ...)` style bindings are loop variables
                if matches!(tokens.get(i.wrapping_sub(1)).and_then(punct), Some('(')) {
                    continue;
                }
                if initializer_is_function(&tokens[i + 2..]) {
                    functions.push(name.to_string());
                } else {
                    variables.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    (functions, classes, variables)
}

/// Whether a declaration initializer is a function or arrow expression.
/// Bounded scan up to the statement end.
fn initializer_is_function(rest: &[Token]) -> bool {
    for (i, token) in rest.iter().take(40).enumerate() {
        if matches!(punct(token), Some(';')) || matches!(punct(token), Some('{')) {
            return false;
        }
        if ident(token) == Some("function") {
            return true;
        }
        if matches!(punct(token), Some('='))
            && matches!(rest.get(i + 1).and_then(punct), Some('>'))
        {
            return true;
        }
    }
    false
}
