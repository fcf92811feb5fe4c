use miette::{NamedSource, SourceSpan};

use super::{ModuleRecord, Requirement};
use crate::error::ManifestParseError;

/// Directives that carry no information for the dependency graph
const IGNORED_DIRECTIVES: &[&str] = &[
    "toolchain",
    "godebug",
    "replace",
    "exclude",
    "retract",
    "tool",
    "ignore",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Module,
    Go,
    Require,
    Ignored,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "module" => Some(Self::Module),
            "go" => Some(Self::Go),
            "require" => Some(Self::Require),
            k if IGNORED_DIRECTIVES.contains(&k) => Some(Self::Ignored),
            _ => None,
        }
    }
}

/// The parts of a `go.mod` file the dependency graph is built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModManifest {
    pub module: Option<String>,
    pub go_version: Option<String>,
    pub requires: Vec<Requirement>,
}

struct Line<'a> {
    tokens: Vec<String>,
    comment: Option<&'a str>,
    span: SourceSpan,
}

impl GoModManifest {
    /// Parse the contents of a `go.mod` file
    ///
    /// A manifest without a `module` directive is not an error here; the
    /// graph builder decides what to do with it.
    pub fn parse(file_name: &str, content: &str) -> Result<Self, ManifestParseError> {
        let mut manifest = Self::default();
        let mut open_block: Option<(Directive, SourceSpan)> = None;
        let mut offset = 0;

        for raw_line in content.split_inclusive('\n') {
            let text = raw_line.trim_end_matches(['\n', '\r']);
            let span = SourceSpan::new(offset.into(), text.len());
            offset += raw_line.len();

            let line = Self::split_line(text, span)
                .map_err(|message| Self::error(file_name, content, message, span))?;

            if let Some((directive, _)) = open_block {
                match line.tokens.as_slice() {
                    [] => {}
                    [close] if close == ")" => open_block = None,
                    tokens => manifest
                        .apply(directive, tokens, line.comment)
                        .map_err(|message| Self::error(file_name, content, message, span))?,
                }
                continue;
            }

            let Some((keyword, args)) = line.tokens.split_first() else {
                continue;
            };

            let directive = Directive::from_keyword(keyword).ok_or_else(|| {
                Self::error(
                    file_name,
                    content,
                    format!("unknown directive: {keyword}"),
                    line.span,
                )
            })?;

            match args {
                [open] if open == "(" => {
                    open_block = Some((directive, line.span));
                    continue;
                }
                [open, close] if open == "(" && close == ")" => continue,
                _ => {}
            }

            manifest
                .apply(directive, args, line.comment)
                .map_err(|message| Self::error(file_name, content, message, line.span))?;
        }

        if let Some((_, span)) = open_block {
            return Err(Self::error(
                file_name,
                content,
                "unterminated block, missing ')'".to_string(),
                span,
            ));
        }

        Ok(manifest)
    }

    fn apply(
        &mut self,
        directive: Directive,
        args: &[String],
        comment: Option<&str>,
    ) -> Result<(), String> {
        match (directive, args) {
            (Directive::Module, [path]) => self.module = Some(path.clone()),
            (Directive::Module, _) => return Err("usage: module module/path".to_string()),
            (Directive::Go, [version]) => self.go_version = Some(version.clone()),
            (Directive::Go, _) => return Err("usage: go 1.23".to_string()),
            (Directive::Require, [path, version]) => {
                let mut requirement = Requirement::new(path.clone(), version.clone());
                if comment.is_some_and(is_indirect_marker) {
                    requirement = requirement.indirect();
                }
                self.requires.push(requirement);
            }
            (Directive::Require, _) => {
                return Err("usage: require module/path v1.2.3".to_string());
            }
            (Directive::Ignored, _) => {}
        }
        Ok(())
    }

    /// Split a line into tokens and its trailing `//` comment
    fn split_line(text: &str, span: SourceSpan) -> Result<Line<'_>, String> {
        let mut tokens = Vec::new();
        let mut comment = None;
        let mut chars = text.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            if text[start..].starts_with("//") {
                comment = Some(text[start + 2..].trim());
                break;
            }

            if c == '(' || c == ')' {
                chars.next();
                tokens.push(c.to_string());
                continue;
            }

            if c == '"' || c == '`' {
                chars.next();
                let mut token = String::new();
                let mut closed = false;
                while let Some((_, inner)) = chars.next() {
                    match inner {
                        '\\' if c == '"' => {
                            if let Some((_, escaped)) = chars.next() {
                                token.push(escaped);
                            }
                        }
                        q if q == c => {
                            closed = true;
                            break;
                        }
                        other => token.push(other),
                    }
                }
                if !closed {
                    return Err("unterminated quoted string".to_string());
                }
                tokens.push(token);
                continue;
            }

            let mut token = String::new();
            while let Some(&(idx, inner)) = chars.peek() {
                if inner.is_whitespace()
                    || inner == '('
                    || inner == ')'
                    || text[idx..].starts_with("//")
                {
                    break;
                }
                token.push(inner);
                chars.next();
            }
            tokens.push(token);
        }

        Ok(Line {
            tokens,
            comment,
            span,
        })
    }

    fn error(file_name: &str, content: &str, message: String, span: SourceSpan) -> ManifestParseError {
        ManifestParseError {
            file: file_name.to_string(),
            message,
            source_code: NamedSource::new(file_name, content.to_string()),
            span: Some(span),
        }
    }

    /// Combine the manifest with the project's release information
    pub fn into_record(self, latest_version: Option<String>, origin: impl Into<String>) -> ModuleRecord {
        ModuleRecord {
            name: self.module,
            toolchain_version: self.go_version,
            latest_version,
            requirements: self.requires,
            origin: origin.into(),
        }
    }
}

fn is_indirect_marker(comment: &str) -> bool {
    comment == "indirect" || comment.starts_with("indirect;")
}
