//! Approximate, rule-based suffix stripping for lowercase ASCII tokens.
//!
//! This is a small heuristic, not Porter's algorithm. Index and query must go
//! through the same rules, so the order and thresholds below are fixed.

fn has_vowel(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u'))
}

/// Replace `suffix` (known to be present) with `with`.
fn replace_suffix(s: &mut String, suffix: &str, with: &str) {
    s.truncate(s.len() - suffix.len());
    s.push_str(with);
}

/// Strip `suffix` when what remains still contains a vowel.
fn strip_if_vowel(s: &mut String, suffix: &str) {
    let base = &s[..s.len() - suffix.len()];
    if has_vowel(base) {
        s.truncate(base.len());
    }
}

pub fn stem(token: &str) -> String {
    let mut s = token.to_string();
    if s.len() <= 2 {
        return s;
    }

    // plurals
    if s.ends_with("ies") && s.len() > 4 {
        replace_suffix(&mut s, "ies", "y");
    } else if s.ends_with("sses") && s.len() > 4 {
        replace_suffix(&mut s, "sses", "ss");
    } else if s.ends_with('s') && !s.ends_with("ss") && s.len() > 3 {
        s.pop();
    }

    if s.ends_with("ing") && s.len() > 5 {
        strip_if_vowel(&mut s, "ing");
    } else if s.ends_with("ed") && s.len() > 4 {
        strip_if_vowel(&mut s, "ed");
    }

    if s.ends_with("ly") && s.len() > 4 {
        replace_suffix(&mut s, "ly", "");
    }

    if s.ends_with("tion") && s.len() > 6 {
        replace_suffix(&mut s, "tion", "t");
    } else if s.ends_with("sion") && s.len() > 6 {
        replace_suffix(&mut s, "sion", "s");
    }

    if s.ends_with('e') && s.len() > 4 {
        s.pop();
    }

    s
}
