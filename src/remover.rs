//! Statement removal over a whole file.
//!
//! Text is handled as lines split on `\n`. A trailing `\r` stays attached to
//! its line, so joining the kept lines with `\n` preserves CRLF files.
//!
//! A call that starts its line (after indentation) is removed as a whole
//! statement, including any following lines its argument list spans. A call
//! that shares its line with other code is cut out of the line, together with
//! a directly following `;`.

use crate::classifier::{CallSite, LineClassifier};

/// Output of [`remove_all`]: the rewritten text and the calls removed from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub text: String,
    pub removed: usize,
    /// Calls that were removed, by line in the input text
    pub calls: Vec<MatchSpan>,
    /// Calls left in place because their arguments run past the end of a
    /// line they share with other code
    pub skipped: Vec<MatchSpan>,
}

impl Removal {
    pub fn changed(&self) -> bool {
        self.removed > 0
    }
}

/// One call site found in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    /// 1-based line number
    pub line: usize,
    /// The call as written, up to its closing parenthesis when that is on the same line
    pub text: String,
}

/// Running parenthesis balance that skips string literals.
#[derive(Debug, Default)]
struct ParenBalance {
    depth: usize,
    quote: Option<char>,
    escaped: bool,
}

impl ParenBalance {
    /// Feed a chunk of text. Returns the byte offset just past the `)` that
    /// brings the balance back to zero, if that happens within the chunk.
    fn feed(&mut self, text: &str) -> Option<usize> {
        for (idx, c) in text.char_indices() {
            if let Some(quote) = self.quote {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == quote {
                    self.quote = None;
                }
                continue;
            }

            match c {
                '"' | '\'' | '`' => self.quote = Some(c),
                '(' => self.depth += 1,
                ')' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return Some(idx + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Quoted strings end at a line break; template literals do not.
    fn end_line(&mut self) {
        if matches!(self.quote, Some('"') | Some('\'')) && !self.escaped {
            self.quote = None;
        }
        self.escaped = false;
    }
}

/// Remove every call site from `text`.
///
/// Never fails. An argument list that is still open at end of file takes the
/// rest of the file with it.
pub fn remove_all(text: &str, classifier: &LineClassifier) -> Removal {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());
    let mut calls = Vec::new();
    let mut skipped = Vec::new();
    // Code left over on the closing line of a removed statement, standing in for lines[i]
    let mut pending: Option<String> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = pending.take().unwrap_or_else(|| lines[i].to_string());

        if !classifier.classify(&line) {
            kept.push(line);
            i += 1;
            continue;
        }

        if classifier.is_whole_statement(&line) {
            let span = statement_span(&line, &lines[i + 1..], classifier);
            calls.push(MatchSpan {
                line: i + 1,
                text: span.call,
            });
            i += span.consumed;
            match span.tail {
                Some(tail) => pending = Some(tail),
                None => i += 1,
            }
            continue;
        }

        let (stripped, removed_here, left) = strip_embedded(&line, classifier);
        if removed_here.is_empty() || !stripped.trim().is_empty() {
            kept.push(stripped);
        }
        calls.extend(removed_here.into_iter().map(|text| MatchSpan { line: i + 1, text }));
        skipped.extend(left.map(|text| MatchSpan { line: i + 1, text }));
        i += 1;
    }

    Removal {
        text: kept.join("\n"),
        removed: calls.len(),
        calls,
        skipped,
    }
}

/// List every call site in `text`
pub fn find_matches(text: &str, classifier: &LineClassifier) -> Vec<MatchSpan> {
    let mut spans = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        let (body, _) = split_eol(line);
        for site in classifier.sites(body) {
            spans.push(MatchSpan {
                line: idx + 1,
                text: call_text(body, site),
            });
        }
    }

    spans
}

/// Extent of a whole statement
struct StatementSpan {
    /// The call as written on its first line
    call: String,
    /// Following lines swallowed by the argument list
    consumed: usize,
    /// Code after the call on its closing line, re-indented like the first line
    tail: Option<String>,
}

/// Follow the whole statement opening `first` through `following` lines
/// until its parentheses balance.
fn statement_span(first: &str, following: &[&str], classifier: &LineClassifier) -> StatementSpan {
    let (body, eol) = split_eol(first);
    let indent = &body[..body.len() - body.trim_start().len()];
    let Some(site) = classifier.find(body) else {
        return StatementSpan {
            call: String::new(),
            consumed: 0,
            tail: None,
        };
    };
    let call = call_text(body, site);

    let mut balance = ParenBalance::default();
    if let Some(close) = balance.feed(&body[site.open..]) {
        return StatementSpan {
            call,
            consumed: 0,
            tail: leftover(indent, &body[site.open + close..], eol),
        };
    }

    for (idx, line) in following.iter().enumerate() {
        balance.end_line();
        let (body, eol) = split_eol(line);
        if let Some(close) = balance.feed(body) {
            return StatementSpan {
                call,
                consumed: idx + 1,
                tail: leftover(indent, &body[close..], eol),
            };
        }
    }

    StatementSpan {
        call,
        consumed: following.len(),
        tail: None,
    }
}

/// Code remaining after a statement's closing parenthesis, if any
fn leftover(indent: &str, rest: &str, eol: &str) -> Option<String> {
    let rest = skip_separator(rest);
    if is_blank_tail(rest) {
        None
    } else {
        Some(format!("{}{}{}", indent, rest.trim(), eol))
    }
}

/// Cut closed call sites out of a line. Returns the new line, the calls
/// removed, and the call that stopped the search because its arguments run
/// past the end of the line.
fn strip_embedded(
    line: &str,
    classifier: &LineClassifier,
) -> (String, Vec<String>, Option<String>) {
    let (body, eol) = split_eol(line);
    let mut body = body.to_string();
    let mut removed = Vec::new();
    let mut left = None;

    while let Some(site) = classifier.find(&body) {
        let Some(end) = call_end(&body, site) else {
            left = Some(body[site.start..].to_string());
            break;
        };
        removed.push(body[site.start..end].to_string());
        let head = &body[..site.start];
        let tail = skip_separator(&body[end..]);

        body = if tail.is_empty() {
            head.trim_end().to_string()
        } else {
            format!("{}{}", head, tail)
        };
    }

    (format!("{}{}", body, eol), removed, left)
}

fn call_text(line: &str, site: CallSite) -> String {
    let end = call_end(line, site).unwrap_or(line.len());
    line[site.start..end].to_string()
}

/// Byte offset just past the closing parenthesis of the call, if on this line
fn call_end(line: &str, site: CallSite) -> Option<usize> {
    ParenBalance::default()
        .feed(&line[site.open..])
        .map(|close| site.open + close)
}

/// Drop a `;` (and the whitespace around it) following a call. Text without
/// a separator is returned untouched.
fn skip_separator(rest: &str) -> &str {
    match rest.trim_start().strip_prefix(';') {
        Some(after) => after.trim_start(),
        None => rest,
    }
}

fn is_blank_tail(rest: &str) -> bool {
    let rest = rest.trim();
    rest.is_empty() || rest.starts_with("//")
}

fn split_eol(line: &str) -> (&str, &str) {
    match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    }
}
