//! Method-declaration heuristics for diff content lines.
//!
//! Each matcher recognises one declaration shape. A [`MatcherChain`] tries
//! them in order and the first one yielding an acceptable identifier wins.
//! None of this is a parser: the patterns only need to fingerprint which
//! methods a patch touches, and they must tolerate truncated or malformed
//! lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Identifiers that the declaration patterns can capture from ordinary
/// statements (`if (x)`, `return (y)`, ...). They never name a method.
pub const CONTROL_FLOW_KEYWORDS: [&str; 11] = [
    "if",
    "for",
    "while",
    "switch",
    "catch",
    "try",
    "else",
    "return",
    "new",
    "class",
    "interface",
];

/// Whether `name` is a control-flow keyword rather than a method name.
pub fn is_control_flow_keyword(name: &str) -> bool {
    CONTROL_FLOW_KEYWORDS.contains(&name)
}

/// A single declaration heuristic.
pub trait MethodMatcher: Send + Sync {
    /// Short name used in debug logging
    fn name(&self) -> &'static str;

    /// Identifier declared on `line`, if the line has this matcher's shape.
    fn capture<'a>(&self, line: &'a str) -> Option<&'a str>;
}

/// A matcher backed by a regex whose first group is the identifier.
pub struct RegexMatcher {
    name: &'static str,
    pattern: &'static Lazy<Regex>,
}

impl RegexMatcher {
    /// Matcher named `name` over a lazily compiled `pattern`.
    pub const fn new(name: &'static str, pattern: &'static Lazy<Regex>) -> Self {
        Self { name, pattern }
    }
}

impl MethodMatcher for RegexMatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Modifiers, a return type, then `name(...)`, optionally `throws` and `{`.
static MODIFIED_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:public|private|protected|static|final|synchronized|native|abstract|\s)+[\w<>\[\],\s]+\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*\([^)]*\)\s*(?:throws\s+[\w\s,]+)?\s*\{?",
    )
    .expect("modified declaration pattern")
});

/// Visibility followed directly by a capitalised name: a constructor.
static CONSTRUCTOR_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:public|private|protected)\s+([A-Z][a-zA-Z0-9_]*)\s*\(")
        .expect("constructor declaration pattern")
});

/// Modifiers, a `<T>` type parameter list, a return type, then `name(`.
static GENERIC_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:public|private|protected|static|final|\s)+\s*<[^>]+>\s*\w+\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*\(",
    )
    .expect("generic declaration pattern")
});

/// Ordered list of matchers with first-acceptable-match-wins semantics.
pub struct MatcherChain {
    matchers: Vec<Box<dyn MethodMatcher>>,
}

impl MatcherChain {
    /// Build a chain from matchers in priority order.
    pub fn new(matchers: Vec<Box<dyn MethodMatcher>>) -> Self {
        Self { matchers }
    }

    /// The Java-style declaration heuristics, most specific first.
    pub fn java() -> Self {
        Self::new(vec![
            Box::new(RegexMatcher::new("modified-declaration", &MODIFIED_DECLARATION)),
            Box::new(RegexMatcher::new("constructor", &CONSTRUCTOR_DECLARATION)),
            Box::new(RegexMatcher::new("generic-declaration", &GENERIC_DECLARATION)),
        ])
    }

    /// Number of matchers in the chain
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Whether the chain has no matchers
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// First identifier any matcher captures that is not a control-flow keyword.
    ///
    /// A matcher that captures a keyword does not end the search; the next
    /// matcher still gets a chance at the line.
    pub fn match_method<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.matchers.iter().find_map(|matcher| {
            matcher
                .capture(line)
                .filter(|name| !is_control_flow_keyword(name))
                .inspect(|name| {
                    tracing::trace!("{} matched '{}'", matcher.name(), name);
                })
        })
    }
}

impl Default for MatcherChain {
    fn default() -> Self {
        Self::java()
    }
}
