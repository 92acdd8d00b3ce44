use std::time::{Duration, Instant};

/// Throughput counters collected while tokenizing. Purely observational.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenizationStats {
    pub total_tokens: u64,
    pub total_token_chars: u64,
    pub bytes_processed: u64,
    pub elapsed: Duration,
}

impl TokenizationStats {
    pub fn avg_token_len(&self) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        self.total_token_chars as f64 / self.total_tokens as f64
    }

    pub fn kb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.bytes_processed as f64 / 1024.0) / secs
    }

    fn record_token(&mut self, token: &str) {
        self.total_tokens += 1;
        self.total_token_chars += token.len() as u64;
    }
}

/// Split text into lowercase ASCII alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    tokenize_into(text, &mut out, None);
    out
}

/// Append the tokens of `text` to `out`, optionally recording stats.
///
/// Every byte that is not ASCII alphanumeric is a boundary, so multi-byte
/// UTF-8 sequences never end up inside a token.
pub fn tokenize_into(text: &str, out: &mut Vec<String>, mut stats: Option<&mut TokenizationStats>) {
    let start = Instant::now();
    let mut cur = String::with_capacity(32);

    for &b in text.as_bytes() {
        if b.is_ascii_alphanumeric() {
            cur.push(char::from(b.to_ascii_lowercase()));
        } else if !cur.is_empty() {
            if let Some(s) = stats.as_deref_mut() {
                s.record_token(&cur);
            }
            out.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        if let Some(s) = stats.as_deref_mut() {
            s.record_token(&cur);
        }
        out.push(cur);
    }

    if let Some(s) = stats {
        s.bytes_processed += text.len() as u64;
        s.elapsed += start.elapsed();
    }
}
