//! Ant-style path patterns used to claim endpoints for a zone.
//!
//! - `**` matches zero or more whole segments
//! - `*` matches any run of characters inside one segment
//! - `?` matches exactly one character inside one segment
//!
//! Empty segments are ignored on both sides, so `/actuator/` and `/actuator`
//! are the same path.

use core::cmp::Reverse;
use core::fmt;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Glob(Vec<char>),
    AnyDepth,
}

impl Segment {
    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == part,
            Segment::Glob(glob) => {
                let text: Vec<char> = part.chars().collect();
                glob_match(glob, &text)
            }
            Segment::AnyDepth => true,
        }
    }
}

/// Ordering key: a greater value is more specific.
///
/// Fields are compared in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    literal_segments: usize,
    bounded_depth: bool,
    wildcards: Reverse<usize>,
    literal_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason| ConfigurationError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments: Vec<Segment> = Vec::new();
        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            let segment = if part == "**" {
                // `/**/**` is the same as `/**`.
                if segments.last() == Some(&Segment::AnyDepth) {
                    continue;
                }
                Segment::AnyDepth
            } else if part.contains("**") {
                return Err(invalid("'**' must be a whole segment"));
            } else if part.contains(['*', '?']) {
                Segment::Glob(part.chars().collect())
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True for patterns that claim every path (`/**`).
    pub fn is_catch_all(&self) -> bool {
        self.segments.iter().all(|s| *s == Segment::AnyDepth) && !self.segments.is_empty()
    }

    pub fn matches(&self, path: &str) -> bool {
        if !path.starts_with('/') {
            return false;
        }
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }

    pub fn specificity(&self) -> Specificity {
        let mut literal_segments = 0;
        let mut bounded_depth = true;
        let mut wildcards = 0;
        let mut literal_len = 0;

        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    literal_segments += 1;
                    literal_len += lit.len();
                }
                Segment::Glob(glob) => {
                    for c in glob {
                        if *c == '*' || *c == '?' {
                            wildcards += 1;
                        } else {
                            literal_len += c.len_utf8();
                        }
                    }
                }
                Segment::AnyDepth => {
                    bounded_depth = false;
                    wildcards += 1;
                }
            }
        }

        Specificity {
            literal_segments,
            bounded_depth,
            wildcards: Reverse(wildcards),
            literal_len,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Segment-wise match in O(pattern x path): `reachable[j]` holds when the
/// pattern consumed so far matches `path[..j]`.
fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let mut reachable = vec![false; path.len() + 1];
    reachable[0] = true;

    for segment in pattern {
        let mut next = vec![false; path.len() + 1];
        match segment {
            Segment::AnyDepth => {
                let mut seen = false;
                for (j, slot) in next.iter_mut().enumerate() {
                    seen |= reachable[j];
                    *slot = seen;
                }
            }
            _ => {
                for (j, part) in path.iter().enumerate() {
                    if reachable[j] && segment.matches(part) {
                        next[j + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }

    reachable[path.len()]
}

/// Single-segment glob match with backtracking on the last `*`.
fn glob_match(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
