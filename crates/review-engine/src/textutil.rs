//! Text helpers shared by the scanners and the fixer.

use shared_types::ReviewError;

/// Upper bound on input size, in characters. Callers are expected to bound
/// input before invoking the engine; anything larger fails fast here so the
/// regex passes stay bounded.
pub const MAX_INPUT_CHARS: usize = 100_000;

/// Reject over-long input before any scanning work starts.
pub fn validate_input(text: &str) -> Result<(), ReviewError> {
    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(ReviewError::invalid_input(format!(
            "text is {chars} characters, maximum is {MAX_INPUT_CHARS}"
        )));
    }
    Ok(())
}

/// Character offset of a byte position. Violation positions are reported in
/// characters so the UI layer can highlight Korean text correctly.
pub fn char_offset(text: &str, byte_pos: usize) -> usize {
    text[..byte_pos].chars().count()
}

/// Snap a byte offset to a valid char boundary, forward or backward.
pub fn snap_to_char_boundary(text: &str, pos: usize, forward: bool) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut p = pos;
    if forward {
        while p < text.len() && !text.is_char_boundary(p) {
            p += 1;
        }
    } else {
        while p > 0 && !text.is_char_boundary(p) {
            p -= 1;
        }
    }
    p
}

/// Slice a context window around a byte range, safe for multi-byte text.
pub fn context_window(text: &str, start: usize, end: usize, half_width: usize) -> &str {
    let ctx_start = snap_to_char_boundary(text, start.saturating_sub(half_width), false);
    let ctx_end = snap_to_char_boundary(text, (end + half_width).min(text.len()), true);
    &text[ctx_start..ctx_end]
}

/// Split text into sentences, terminators included. Korean clinic copy ends
/// sentences with `.` `!` `?` `…` or a bare newline; consecutive terminators
/// stay attached to the sentence they close.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut in_terminator_run = false;

    for (idx, ch) in text.char_indices() {
        if in_terminator_run {
            // Trailing punctuation and whitespace stay with the sentence
            // they close.
            if ch.is_whitespace() || matches!(ch, '.' | '!' | '?' | '…') {
                continue;
            }
            sentences.push(&text[start..idx]);
            start = idx;
            in_terminator_run = false;
        }
        if matches!(ch, '.' | '!' | '?' | '…' | '\n') {
            in_terminator_run = true;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Average sentence length in characters, ignoring whitespace-only
/// sentences.
pub fn avg_sentence_chars(text: &str) -> f64 {
    let lengths: Vec<usize> = split_sentences(text)
        .into_iter()
        .map(|s| s.trim().chars().count())
        .filter(|&n| n > 0)
        .collect();
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_over_long_input() {
        let text = "가".repeat(MAX_INPUT_CHARS + 1);
        assert!(validate_input(&text).is_err());
    }

    #[test]
    fn test_accepts_input_at_limit() {
        let text = "가".repeat(MAX_INPUT_CHARS);
        assert!(validate_input(&text).is_ok());
    }

    #[test]
    fn test_char_offset_counts_hangul_as_one() {
        let text = "당뇨병 관리";
        // "당뇨병 " is 10 bytes but 4 chars
        assert_eq!(char_offset(text, 10), 4);
    }

    #[test]
    fn test_split_sentences_round_trips() {
        let text = "첫 문장입니다. 둘째 문장! 셋째 문장인가요? 마지막";
        let parts = split_sentences(text);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_split_sentences_keeps_terminator_with_sentence() {
        let parts = split_sentences("진료 안내입니다. 예약하세요.");
        assert_eq!(parts[0], "진료 안내입니다. ");
        assert_eq!(parts[1], "예약하세요.");
    }

    #[test]
    fn test_context_window_does_not_split_hangul() {
        let text = "본원은 환자분들의 건강을 최우선으로 생각합니다";
        // Deliberately mid-character offsets
        let w = context_window(text, 7, 8, 5);
        assert!(!w.is_empty());
        assert!(text.contains(w));
    }

    #[test]
    fn test_avg_sentence_chars() {
        let avg = avg_sentence_chars("abcd. ab.");
        // "abcd." is 5 chars, "ab." is 3 chars
        assert!((avg - 4.0).abs() < f64::EPSILON);
    }
}
