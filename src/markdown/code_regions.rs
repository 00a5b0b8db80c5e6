/*!
 * Code region isolation for Markdown documents.
 *
 * Before a document is handed to the translation service, every fenced
 * code block and inline code span is replaced by a unique anchor token of
 * the form <<CODE_N>>. After translation the anchors are swapped back for
 * the original code. A single shared counter covers both region kinds.
 *
 * Restoration is strict: a missing, duplicated or mutated anchor aborts
 * the document, because accepting it would splice translated prose into a
 * code region or drop code entirely.
 */

use std::collections::HashMap;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex matching an intact anchor token
static ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<CODE_(\d+)>>").expect("Invalid anchor regex")
});

/// Lenient regex catching anchors the translation step has mangled
/// (case changes, inserted spaces, swapped separators)
static LOOSE_ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<<\s*code[\s_\-]*\d+\s*>>").expect("Invalid loose anchor regex")
});

/// Kind of a protected code region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Multi-line fenced block (``` or ~~~)
    Fenced,
    /// Backtick-delimited span inside a line of prose
    Inline,
}

/// A code region lifted out of the document for the duration of a run
#[derive(Debug, Clone)]
pub struct ProtectedRegion {
    /// Sequential anchor id, shared across both region kinds
    pub id: usize,
    /// Fenced block or inline span
    pub kind: RegionKind,
    /// Language tag from the fence info string, if any
    pub language: Option<String>,
    /// Original text including delimiters
    pub text: String,
}

/// Details of a failed restoration
#[derive(Debug, Clone, Default)]
pub struct RestoreFailure {
    /// Anchor ids absent from the translated text
    pub missing: Vec<usize>,
    /// Anchor ids appearing more than once
    pub duplicated: Vec<usize>,
    /// Anchor-like tokens that no longer match any expected anchor
    pub mutated: Vec<String>,
}

impl RestoreFailure {
    fn is_failure(&self) -> bool {
        !self.missing.is_empty() || !self.duplicated.is_empty() || !self.mutated.is_empty()
    }
}

impl fmt::Display for RestoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing anchors: {:?}", self.missing));
        }
        if !self.duplicated.is_empty() {
            parts.push(format!("duplicated anchors: {:?}", self.duplicated));
        }
        if !self.mutated.is_empty() {
            parts.push(format!("mutated anchors: {:?}", self.mutated));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for RestoreFailure {}

/// Extracts and restores protected code regions
pub struct CodeRegionIsolator;

impl CodeRegionIsolator {
    /// Anchor token for a region id
    pub fn anchor(id: usize) -> String {
        format!("<<CODE_{}>>", id)
    }

    /// Replace fenced blocks and inline spans with anchor tokens.
    ///
    /// Fenced blocks are scanned first, in document order; inline spans are
    /// scanned in the remaining text. Bytes outside the replaced spans are
    /// preserved exactly. An unterminated fence consumes the rest of the
    /// document rather than erroring out.
    pub fn extract(raw: &str) -> (String, Vec<ProtectedRegion>) {
        let mut regions = Vec::new();
        let fenced = Self::extract_fenced(raw, &mut regions);
        let clean = Self::extract_inline(&fenced, &mut regions);

        debug!(
            "Isolated {} code regions ({} fenced, {} inline)",
            regions.len(),
            regions.iter().filter(|r| r.kind == RegionKind::Fenced).count(),
            regions.iter().filter(|r| r.kind == RegionKind::Inline).count()
        );

        (clean, regions)
    }

    /// Swap anchors back for the original code.
    ///
    /// Every anchor must appear exactly once and byte-identical. Whitespace
    /// trimmed around an intact anchor is fine; anything that altered the
    /// token itself fails the document.
    pub fn restore(
        translated: &str,
        regions: &[ProtectedRegion],
    ) -> Result<String, RestoreFailure> {
        let mut failure = RestoreFailure::default();
        let by_id: HashMap<usize, &ProtectedRegion> =
            regions.iter().map(|r| (r.id, r)).collect();

        // Count intact anchors per id in a single pass over the translated
        // text, before any substitution touches it.
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for caps in ANCHOR_REGEX.captures_iter(translated) {
            if let Some(id) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        for region in regions {
            match counts.get(&region.id).copied().unwrap_or(0) {
                0 => failure.missing.push(region.id),
                1 => {}
                _ => failure.duplicated.push(region.id),
            }
        }

        // Anchor-shaped tokens that are not an expected intact anchor are
        // mutations (or strays pointing at unknown ids).
        for m in LOOSE_ANCHOR_REGEX.find_iter(translated) {
            let token = m.as_str();
            let intact = ANCHOR_REGEX
                .captures(token)
                .filter(|caps| caps.get(0).map(|w| w.as_str()) == Some(token))
                .and_then(|caps| caps.get(1).and_then(|d| d.as_str().parse::<usize>().ok()))
                .map(|id| by_id.contains_key(&id))
                .unwrap_or(false);
            if !intact {
                failure.mutated.push(token.to_string());
            }
        }

        if failure.is_failure() {
            return Err(failure);
        }

        let restored = ANCHOR_REGEX.replace_all(translated, |caps: &regex::Captures<'_>| {
            let id: usize = caps[1].parse().unwrap_or(usize::MAX);
            by_id
                .get(&id)
                .map(|r| r.text.clone())
                .unwrap_or_else(|| caps[0].to_string())
        });

        Ok(restored.into_owned())
    }

    /// First pass: lift fenced blocks out of the raw text
    fn extract_fenced(raw: &str, regions: &mut Vec<ProtectedRegion>) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut offset = 0usize;
        let mut open: Option<FenceState> = None;

        for line in raw.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);

            match &open {
                None => {
                    if let Some(state) = FenceState::try_open(content, line_start) {
                        open = Some(state);
                    } else {
                        out.push_str(line);
                    }
                }
                Some(state) => {
                    if state.closes(content) {
                        // Region covers the opening fence through the
                        // closing fence, excluding the trailing newline so
                        // the anchor stays on its own line.
                        let end = line_start + content.len();
                        let state = open.take().expect("fence state present");
                        let id = regions.len();
                        out.push_str(&Self::anchor(id));
                        regions.push(ProtectedRegion {
                            id,
                            kind: RegionKind::Fenced,
                            language: state.language.clone(),
                            text: raw[state.start..end].to_string(),
                        });
                        // Keep whatever followed the close fence on the line
                        out.push_str(&line[content.len()..]);
                    }
                }
            }
        }

        // Unterminated fence: the rest of the document is the block
        if let Some(state) = open {
            let id = regions.len();
            out.push_str(&Self::anchor(id));
            regions.push(ProtectedRegion {
                id,
                kind: RegionKind::Fenced,
                language: state.language,
                text: raw[state.start..].to_string(),
            });
        }

        out
    }

    /// Second pass: lift inline backtick spans out of the fenced-clean text
    fn extract_inline(text: &str, regions: &mut Vec<ProtectedRegion>) -> String {
        let mut out = String::with_capacity(text.len());
        let bytes = text.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            if bytes[i] != b'`' {
                // Advance one whole UTF-8 character
                let ch_len = utf8_len(bytes[i]);
                out.push_str(&text[i..i + ch_len]);
                i += ch_len;
                continue;
            }

            let open_len = backtick_run(bytes, i);
            match Self::find_closing_run(bytes, i + open_len, open_len) {
                Some(close_start) => {
                    let end = close_start + open_len;
                    let id = regions.len();
                    out.push_str(&Self::anchor(id));
                    regions.push(ProtectedRegion {
                        id,
                        kind: RegionKind::Inline,
                        language: None,
                        text: text[i..end].to_string(),
                    });
                    i = end;
                }
                None => {
                    // No matching close: leave the run untouched
                    out.push_str(&text[i..i + open_len]);
                    i += open_len;
                }
            }
        }

        out
    }

    /// Find the start of the next backtick run of exactly `len` backticks
    fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
        let mut i = from;
        while i < bytes.len() {
            if bytes[i] == b'`' {
                let run = backtick_run(bytes, i);
                if run == len {
                    return Some(i);
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }
}

/// State of an open fence during the fenced pass
struct FenceState {
    /// Byte offset of the opening fence line
    start: usize,
    /// Fence character (` or ~)
    ch: u8,
    /// Length of the opening run
    len: usize,
    /// Language tag from the info string
    language: Option<String>,
}

impl FenceState {
    /// Parse a line as an opening fence (up to 3 leading spaces allowed)
    fn try_open(content: &str, line_start: usize) -> Option<Self> {
        let trimmed = content.trim_start_matches(' ');
        if content.len() - trimmed.len() > 3 {
            return None;
        }
        let first = *trimmed.as_bytes().first()?;
        if first != b'`' && first != b'~' {
            return None;
        }
        let len = trimmed.bytes().take_while(|&b| b == first).count();
        if len < 3 {
            return None;
        }
        let info = trimmed[len..].trim();
        // A backtick fence cannot carry backticks in its info string
        if first == b'`' && info.contains('`') {
            return None;
        }
        let language = info
            .split_whitespace()
            .next()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty());
        Some(Self {
            start: line_start,
            ch: first,
            len,
            language,
        })
    }

    /// Check whether a line closes this fence
    fn closes(&self, content: &str) -> bool {
        let trimmed = content.trim_start_matches(' ');
        if content.len() - trimmed.len() > 3 {
            return false;
        }
        let run = trimmed.bytes().take_while(|&b| b == self.ch).count();
        run >= self.len && trimmed[run..].trim().is_empty()
    }
}

/// Length in bytes of the UTF-8 character starting with this byte
fn utf8_len(first: u8) -> usize {
    match first {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    }
}

/// Length of the backtick run starting at `i`
fn backtick_run(bytes: &[u8], i: usize) -> usize {
    bytes[i..].iter().take_while(|&&b| b == b'`').count()
}
