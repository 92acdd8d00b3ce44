//! HTML to text extraction and phrase normalization.
//!
//! Both extractors work on raw bytes. Every position they jump to is either an
//! ASCII byte or the end of input, so slicing never splits a UTF-8 sequence.

/// Which part of a page feeds the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extraction {
    /// Only text nested inside `<span>` elements.
    #[default]
    Span,
    /// All text outside of tags.
    AllText,
}

impl Extraction {
    pub fn extract(self, html: &str) -> String {
        match self {
            Extraction::Span => extract_span_text(html),
            Extraction::AllText => strip_tags(html),
        }
    }
}

const SPAN: &str = "span";

/// Elements whose content is never text, with their closing tags.
const RAW_TEXT_ELEMENTS: [(&[u8], &[u8]); 2] =
    [(b"<script", b"</script>"), (b"<style", b"</style>")];

/// C `isspace` in the "C" locale; `u8::is_ascii_whitespace` misses `\x0b`.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn starts_with_ci(s: &[u8], pos: usize, kw: &[u8]) -> bool {
    s.get(pos..pos + kw.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(kw))
}

fn find_ci(s: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > s.len() {
        return None;
    }
    s[from..]
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|p| from + p)
}

fn find_byte(s: &[u8], from: usize, b: u8) -> Option<usize> {
    s.get(from..)?.iter().position(|&c| c == b).map(|p| from + p)
}

/// If a `<script` or `<style` element starts at `pos`, return the index just
/// past its closing tag. `Some(None)` means the closing tag is missing and
/// the rest of the input must be dropped.
fn skip_raw_text_element(s: &[u8], pos: usize) -> Option<Option<usize>> {
    for (open, close) in RAW_TEXT_ELEMENTS {
        if starts_with_ci(s, pos, open) {
            return Some(find_ci(s, pos, close).map(|end| end + close.len()));
        }
    }
    None
}

/// Text inside `<span>` elements with every other piece of markup removed.
///
/// Nesting is tracked by tag name only; an unmatched `</span>` never takes the
/// depth below zero. A space is emitted after each tag while inside a span.
pub fn extract_span_text(html: &str) -> String {
    let s = html.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(s.len() / 2);
    let mut depth: u32 = 0;
    let mut i = 0;

    while i < s.len() {
        if s[i] != b'<' {
            if depth > 0 {
                out.push(s[i]);
            }
            i += 1;
            continue;
        }

        match skip_raw_text_element(s, i) {
            Some(Some(next)) => {
                i = next;
                continue;
            }
            Some(None) => break,
            None => {}
        }

        let mut j = i + 1;
        if matches!(s.get(j), Some(b'!' | b'?')) {
            let Some(gt) = find_byte(s, j, b'>') else { break };
            i = gt + 1;
            if depth > 0 {
                out.push(b' ');
            }
            continue;
        }

        let closing = s.get(j) == Some(&b'/');
        if closing {
            j += 1;
        }
        while j < s.len() && is_space(s[j]) {
            j += 1;
        }
        let name_start = j;
        while j < s.len() && s[j].is_ascii_alphanumeric() {
            j += 1;
        }
        if s[name_start..j].eq_ignore_ascii_case(SPAN.as_bytes()) {
            if closing {
                depth = depth.saturating_sub(1);
            } else {
                depth += 1;
            }
        }

        let Some(gt) = find_byte(s, j, b'>') else { break };
        i = gt + 1;
        if depth > 0 {
            out.push(b' ');
        }
    }

    finish(&out)
}

/// All text outside of tags. Scripts, styles and their content are dropped
/// and every tag becomes a space.
pub fn strip_tags(html: &str) -> String {
    let s = html.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(s.len());
    let mut in_tag = false;
    let mut i = 0;

    while i < s.len() {
        let c = s[i];
        if in_tag {
            if c == b'>' {
                in_tag = false;
                out.push(b' ');
            }
            i += 1;
            continue;
        }
        if c != b'<' {
            out.push(c);
            i += 1;
            continue;
        }
        match skip_raw_text_element(s, i) {
            Some(Some(next)) => i = next,
            Some(None) => break,
            None => {
                in_tag = true;
                i += 1;
            }
        }
    }

    finish(&out)
}

fn finish(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    collapse_whitespace(&decode_entities(&text))
}

fn decode_named(entity: &str) -> Option<char> {
    Some(match entity {
        "&amp;" => '&',
        "&lt;" => '<',
        "&gt;" => '>',
        "&quot;" => '"',
        "&#39;" => '\'',
        "&nbsp;" => ' ',
        _ => return None,
    })
}

/// `&#NNN;` with a decimal value in 1..=255.
fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix("&#")?.strip_suffix(';')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut val: u32 = 0;
    for b in digits.bytes() {
        val = val * 10 + u32::from(b - b'0');
        if val > 0x10FFFF {
            return None;
        }
    }
    match val {
        1..=255 => char::from_u32(val),
        _ => None,
    }
}

/// Decode the fixed entity table. Anything unrecognized is copied verbatim.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let entity = match tail[1..].find(';') {
            Some(p) if p < 10 => &tail[..p + 2],
            _ => {
                out.push('&');
                rest = &tail[1..];
                continue;
            }
        };
        match decode_named(entity).or_else(|| decode_numeric(entity)) {
            Some(c) => out.push(c),
            None => out.push_str(entity),
        }
        rest = &tail[entity.len()..];
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for c in s.chars() {
        if c.is_ascii() && is_space(c as u8) {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    trim_one_space(out)
}

fn trim_one_space(mut s: String) -> String {
    if s.ends_with(' ') {
        s.pop();
    }
    if s.starts_with(' ') {
        s.remove(0);
    }
    s
}

/// Lowercase ASCII alphanumerics; every other character becomes a single
/// separating space. Used for document text and query phrases alike.
pub fn normalize_for_phrase(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_sep = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            in_sep = false;
        } else {
            if !in_sep {
                out.push(' ');
            }
            in_sep = true;
        }
    }
    trim_one_space(out)
}
