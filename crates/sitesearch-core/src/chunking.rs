//! Paragraph-greedy chunking with a size ceiling and a small-chunk floor.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub min_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 900, min_chars: 400 }
    }
}

const PARAGRAPH_SEP: &str = "\n\n";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split on blank lines. Paragraphs are trimmed and empty ones dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            push_paragraph(&mut paragraphs, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_paragraph(&mut paragraphs, &current);
    paragraphs
}

fn push_paragraph(out: &mut Vec<String>, lines: &[&str]) {
    let paragraph = lines.join("\n");
    let paragraph = paragraph.trim();
    if !paragraph.is_empty() {
        out.push(paragraph.to_string());
    }
}

/// Chunk `text` into pieces of roughly `max_chars`.
///
/// Paragraphs accumulate until the next one would push the buffer past
/// `max_chars`. A buffer that already holds `min_chars` is flushed and the
/// paragraph starts the next one; a smaller buffer is merged with the paragraph
/// and flushed together. Text with no paragraphs yields a single chunk cut to
/// `max_chars`.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let max = config.max_chars.max(1);
    let pieces = split_paragraphs(text).into_iter().flat_map(|p| split_oversized(&p, max));

    let mut chunks = Vec::new();
    let mut buf = String::new();
    for piece in pieces {
        let joined = if buf.is_empty() { char_len(&piece) } else { char_len(&buf) + PARAGRAPH_SEP.len() + char_len(&piece) };
        if joined <= max {
            append(&mut buf, &piece, PARAGRAPH_SEP);
        } else if !buf.is_empty() && char_len(&buf) >= config.min_chars {
            chunks.push(std::mem::replace(&mut buf, piece));
        } else {
            append(&mut buf, &piece, PARAGRAPH_SEP);
            chunks.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        chunks.push(buf);
    }
    if chunks.is_empty() {
        chunks.push(text.trim().chars().take(max).collect());
    }
    chunks
}

fn append(buf: &mut String, piece: &str, sep: &str) {
    if !buf.is_empty() {
        buf.push_str(sep);
    }
    buf.push_str(piece);
}

/// Break a paragraph longer than `max` at line boundaries, then at whitespace,
/// then by hard cut, re-packing the parts greedily up to `max`.
fn split_oversized(paragraph: &str, max: usize) -> Vec<String> {
    if char_len(paragraph) <= max {
        return vec![paragraph.to_string()];
    }
    let lines = paragraph
        .lines()
        .flat_map(|line| if char_len(line) <= max { vec![line.to_string()] } else { split_words(line, max) })
        .collect();
    pack(lines, "\n", max)
}

fn split_words(line: &str, max: usize) -> Vec<String> {
    let words = line
        .split_whitespace()
        .flat_map(|word| {
            if char_len(word) <= max {
                vec![word.to_string()]
            } else {
                word.chars().collect::<Vec<_>>().chunks(max).map(|c| c.iter().collect()).collect()
            }
        })
        .collect();
    pack(words, " ", max)
}

fn pack(units: Vec<String>, sep: &str, max: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    for unit in units {
        if !cur.is_empty() && char_len(&cur) + sep.len() + char_len(&unit) > max {
            out.push(std::mem::take(&mut cur));
        }
        append(&mut cur, &unit, sep);
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}
