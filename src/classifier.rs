//! Line classification: recognizing the target call inside a single line.

use anyhow::{Context, Result};
use regex::Regex;

/// Location of one call site within a line (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Offset of the first character of the marker
    pub start: usize,
    /// Offset of the opening parenthesis of the argument list
    pub open: usize,
}

/// Matches `<marker>(` with optional whitespace before the parenthesis.
///
/// The marker only matches as a complete identifier path: `myconsole.log(`,
/// `foo.console.log(` and `console.logger(` are not call sites for a
/// `console.log` marker, and neither is `console.error(`.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    marker: String,
    pattern: Regex,
}

impl LineClassifier {
    pub fn new(marker: &str) -> Result<Self> {
        let marker = marker.trim();
        if marker.is_empty() {
            anyhow::bail!("Marker must not be empty");
        }

        // No lookbehind in `regex`, so the boundary character is consumed
        // outside the `call` group.
        let source = format!(r"(?:^|[^\w$.])(?P<call>{}\s*\()", regex::escape(marker));
        let pattern = Regex::new(&source)
            .with_context(|| format!("Failed to build call pattern for marker '{}'", marker))?;

        Ok(LineClassifier {
            marker: marker.to_string(),
            pattern,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// True if the line contains at least one call site
    pub fn classify(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// First call site in the line
    pub fn find(&self, line: &str) -> Option<CallSite> {
        self.sites(line).next()
    }

    /// Every call site in the line, left to right
    pub fn sites<'a>(&'a self, line: &'a str) -> impl Iterator<Item = CallSite> + 'a {
        self.pattern.captures_iter(line).filter_map(|caps| {
            let call = caps.name("call")?;
            Some(CallSite {
                start: call.start(),
                open: call.end() - 1,
            })
        })
    }

    /// True if the first call site begins the line once leading whitespace is trimmed
    pub fn is_whole_statement(&self, line: &str) -> bool {
        let indent = line.len() - line.trim_start().len();
        self.find(line).is_some_and(|site| site.start == indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console_log() -> LineClassifier {
        LineClassifier::new("console.log").unwrap()
    }

    #[test]
    fn test_classify_plain_call() {
        let classifier = console_log();
        assert!(classifier.classify("console.log('hi');"));
        assert!(classifier.classify("    console.log(value)"));
    }

    #[test]
    fn test_classify_whitespace_before_paren() {
        let classifier = console_log();
        assert!(classifier.classify("console.log  ('spaced');"));
        assert!(classifier.classify("console.log\t(x)"));
    }

    #[test]
    fn test_classify_ignores_error_variant() {
        let classifier = console_log();
        assert!(!classifier.classify("console.error('failed', err);"));
        assert!(!classifier.classify("  console.error("));
    }

    #[test]
    fn test_classify_ignores_similar_identifiers() {
        let classifier = console_log();
        assert!(!classifier.classify("myconsole.log(x);"));
        assert!(!classifier.classify("this.console.log(x);"));
        assert!(!classifier.classify("$console.log(x);"));
        assert!(!classifier.classify("console.logger(x);"));
        assert!(!classifier.classify("console_log(x);"));
    }

    #[test]
    fn test_classify_requires_paren() {
        let classifier = console_log();
        assert!(!classifier.classify("const log = console.log;"));
        assert!(!classifier.classify("// console.log is noisy"));
    }

    #[test]
    fn test_classify_empty_line() {
        assert!(!console_log().classify(""));
    }

    #[test]
    fn test_classify_embedded() {
        let classifier = console_log();
        assert!(classifier.classify("if (x) { console.log(1); go(); }"));
        assert!(classifier.classify("fn(console.log(1))"));
    }

    #[test]
    fn test_find_offsets() {
        let classifier = console_log();
        let line = "if (x) { console.log (1); }";
        let site = classifier.find(line).unwrap();
        assert_eq!(site.start, 9);
        assert_eq!(&line[site.open..site.open + 1], "(");
    }

    #[test]
    fn test_sites_finds_every_call() {
        let classifier = console_log();
        let line = "console.log(1); console.error(2); console.log(3);";
        let starts: Vec<usize> = classifier.sites(line).map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 34]);
    }

    #[test]
    fn test_is_whole_statement() {
        let classifier = console_log();
        assert!(classifier.is_whole_statement("   console.log('x');"));
        assert!(classifier.is_whole_statement("console.log("));
        assert!(!classifier.is_whole_statement("foo(); console.log('x');"));
        assert!(!classifier.is_whole_statement("console.error('x');"));
    }

    #[test]
    fn test_custom_marker_is_escaped() {
        let classifier = LineClassifier::new("debug.trace").unwrap();
        assert!(classifier.classify("debug.trace(1)"));
        assert!(!classifier.classify("debugXtrace(1)"));
        assert_eq!(classifier.marker(), "debug.trace");
    }

    #[test]
    fn test_empty_marker_rejected() {
        let result = LineClassifier::new("  ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must not be empty"));
    }
}
