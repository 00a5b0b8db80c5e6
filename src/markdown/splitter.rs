/*!
 * Structure-aware splitting of Markdown text into byte-budgeted chunks.
 *
 * Strategies apply in priority order, recursively, to anything still over
 * budget: header sections first, then blank-line paragraphs, then single
 * lines. A section or line that alone exceeds the budget is emitted whole
 * rather than truncated. Concatenating the returned chunks in index order
 * reproduces the input byte-for-byte.
 *
 * Sizes are UTF-8 byte lengths, not char counts: accented and non-Latin
 * text would otherwise under-count the payload sent to the provider.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex matching an ATX header line and capturing its hash run
static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})[ \t]").expect("Invalid header regex")
});

/// Which strategy produced a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Header-section accumulation
    Header,
    /// Blank-line paragraph accumulation
    Paragraph,
    /// Line-boundary accumulation (last resort)
    Line,
}

/// A contiguous, ordered slice of a document's clean text
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Ordinal position; reassembly is always in this order
    pub index: usize,
    /// Chunk text, anchors intact
    pub content: String,
    /// UTF-8 encoded byte length of the content
    pub byte_size: usize,
    /// Number of Unicode scalar values in the content
    pub char_count: usize,
    /// Strategy that produced this chunk
    pub kind: ChunkKind,
}

/// Splits clean Markdown text into byte-budgeted chunks
#[derive(Debug, Clone)]
pub struct MarkdownSplitter {
    /// Maximum UTF-8 bytes per chunk
    max_bytes: usize,
    /// ATX header level used as the primary boundary; any header of this
    /// level or shallower starts a new section
    header_level: u8,
}

impl MarkdownSplitter {
    /// Create a splitter with the given byte budget and header level
    pub fn new(max_bytes: usize, header_level: u8) -> Self {
        Self {
            max_bytes: max_bytes.max(1),
            header_level: header_level.clamp(1, 6),
        }
    }

    /// Split clean text into ordered chunks.
    ///
    /// Invariant: concatenating the returned contents equals the input.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut pieces: Vec<(String, ChunkKind)> = Vec::new();
        if text.len() <= self.max_bytes {
            pieces.push((text.to_string(), ChunkKind::Header));
        } else {
            self.split_sections(text, &mut pieces);
        }

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(index, (content, kind))| Chunk {
                index,
                byte_size: content.len(),
                char_count: content.chars().count(),
                kind,
                content,
            })
            .collect();

        let oversized = chunks.iter().filter(|c| c.byte_size > self.max_bytes).count();
        debug!(
            "Split {} bytes into {} chunks ({} oversized atomic)",
            text.len(),
            chunks.len(),
            oversized
        );

        chunks
    }

    /// Header strategy: accumulate whole sections up to the budget
    fn split_sections(&self, text: &str, out: &mut Vec<(String, ChunkKind)>) {
        let sections = self.section_ranges(text);
        let mut acc_start: Option<usize> = None;
        let mut acc_end = 0usize;

        for (start, end) in sections {
            let len = end - start;
            if len > self.max_bytes {
                // Flush what we have, then descend into the oversized section
                if let Some(s) = acc_start.take() {
                    out.push((text[s..acc_end].to_string(), ChunkKind::Header));
                }
                self.split_paragraphs(&text[start..end], out);
                continue;
            }

            match acc_start {
                Some(s) if end - s <= self.max_bytes => {
                    acc_end = end;
                }
                Some(s) => {
                    out.push((text[s..acc_end].to_string(), ChunkKind::Header));
                    acc_start = Some(start);
                    acc_end = end;
                }
                None => {
                    acc_start = Some(start);
                    acc_end = end;
                }
            }
        }

        if let Some(s) = acc_start {
            out.push((text[s..acc_end].to_string(), ChunkKind::Header));
        }
    }

    /// Paragraph strategy: accumulate blank-line-delimited groups
    fn split_paragraphs(&self, text: &str, out: &mut Vec<(String, ChunkKind)>) {
        let paragraphs = paragraph_ranges(text);
        let mut acc_start: Option<usize> = None;
        let mut acc_end = 0usize;

        for (start, end) in paragraphs {
            let len = end - start;
            if len > self.max_bytes {
                if let Some(s) = acc_start.take() {
                    out.push((text[s..acc_end].to_string(), ChunkKind::Paragraph));
                }
                self.split_lines(&text[start..end], out);
                continue;
            }

            match acc_start {
                Some(s) if end - s <= self.max_bytes => {
                    acc_end = end;
                }
                Some(s) => {
                    out.push((text[s..acc_end].to_string(), ChunkKind::Paragraph));
                    acc_start = Some(start);
                    acc_end = end;
                }
                None => {
                    acc_start = Some(start);
                    acc_end = end;
                }
            }
        }

        if let Some(s) = acc_start {
            out.push((text[s..acc_end].to_string(), ChunkKind::Paragraph));
        }
    }

    /// Line strategy: never split inside a line, even over budget
    fn split_lines(&self, text: &str, out: &mut Vec<(String, ChunkKind)>) {
        let mut acc = String::new();

        for line in text.split_inclusive('\n') {
            if line.len() > self.max_bytes {
                // An unsplittable line is emitted whole, over budget
                if !acc.is_empty() {
                    out.push((std::mem::take(&mut acc), ChunkKind::Line));
                }
                out.push((line.to_string(), ChunkKind::Line));
                continue;
            }

            if !acc.is_empty() && acc.len() + line.len() > self.max_bytes {
                out.push((std::mem::take(&mut acc), ChunkKind::Line));
            }
            acc.push_str(line);
        }

        if !acc.is_empty() {
            out.push((acc, ChunkKind::Line));
        }
    }

    /// Byte ranges of header-delimited sections covering the whole text
    fn section_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let mut starts = vec![0usize];
        let mut offset = 0usize;

        for line in text.split_inclusive('\n') {
            // Offset 0 is always a section start already
            if offset > 0 {
                if let Some(caps) = HEADER_REGEX.captures(line) {
                    if caps[1].len() <= self.header_level as usize {
                        starts.push(offset);
                    }
                }
            }
            offset += line.len();
        }

        let mut ranges = Vec::with_capacity(starts.len());
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            if end > start {
                ranges.push((start, end));
            }
        }
        ranges
    }
}

/// Byte ranges of paragraphs; each includes its trailing blank lines so the
/// ranges partition the text exactly
fn paragraph_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0usize;
    let mut offset = 0usize;
    let mut in_blank_run = false;

    for line in text.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if in_blank_run && !blank && offset > start {
            ranges.push((start, offset));
            start = offset;
        }
        in_blank_run = blank;
        offset += line.len();
    }

    if offset > start {
        ranges.push((start, offset));
    }
    ranges
}
