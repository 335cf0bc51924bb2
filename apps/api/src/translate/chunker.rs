//! Chunking for long translation inputs.
//!
//! Chunks overlap by a fixed number of characters so sentences cut at a
//! boundary still carry context into the next chunk. Boundaries prefer
//! sentence ends and newlines over hard cuts.

/// Inputs at or below this many characters are translated in one call.
pub const CHUNK_SIZE: usize = 4_000;
/// Characters of trailing context repeated at the start of the next chunk.
pub const CHUNK_OVERLAP: usize = 200;

/// Characters scanned backwards from a hard cut looking for a natural break.
const BOUNDARY_WINDOW: usize = 400;

/// Splits `text` into overlapping chunks of at most `CHUNK_SIZE` characters.
/// Inputs that fit in one chunk come back as a single element.
pub fn split_text_into_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= CHUNK_SIZE {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + CHUNK_SIZE).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            natural_boundary(&chars, start, hard_end)
        };

        chunks.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }
        // Step back by the overlap, but always move forward
        start = end.saturating_sub(CHUNK_OVERLAP).max(start + 1);
    }

    chunks
}

/// Finds a sentence or newline boundary within `BOUNDARY_WINDOW` characters
/// before `hard_end`, falling back to the hard cut.
fn natural_boundary(chars: &[char], start: usize, hard_end: usize) -> usize {
    let window_start = hard_end.saturating_sub(BOUNDARY_WINDOW).max(start + 1);
    for i in (window_start..hard_end).rev() {
        match chars[i] {
            '\n' => return i + 1,
            '.' | '!' | '?' => {
                // Sentence end only if followed by whitespace or at the cut
                if i + 1 >= hard_end || chars[i + 1].is_whitespace() {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    hard_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_one_chunk() {
        let text = "Short enough to translate in one call.";
        let chunks = split_text_into_chunks(text);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_input_at_threshold_is_one_chunk() {
        let text = "a".repeat(CHUNK_SIZE);
        assert_eq!(split_text_into_chunks(&text).len(), 1);
    }

    #[test]
    fn test_long_input_is_split_with_bounded_chunks() {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(300); // ~13,800 chars
        let chunks = split_text_into_chunks(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= CHUNK_SIZE);
        }
    }

    #[test]
    fn test_chunks_overlap() {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(300);
        let chunks = split_text_into_chunks(&text);
        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .chars()
                .rev()
                .take(50)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            assert!(
                pair[1].contains(tail.trim()),
                "next chunk must repeat the previous chunk's tail"
            );
        }
    }

    #[test]
    fn test_boundaries_prefer_sentence_ends() {
        let sentence = "Une phrase complete qui se termine proprement. ";
        let text = sentence.repeat(200); // ~9,400 chars
        let chunks = split_text_into_chunks(&text);
        // Every non-final chunk should end at a sentence boundary
        for chunk in &chunks[..chunks.len() - 1] {
            let last = chunk.trim_end().chars().next_back().unwrap();
            assert_eq!(last, '.', "chunk ended mid-sentence: ...{:?}", last);
        }
    }

    #[test]
    fn test_no_content_is_lost() {
        // With overlap, concatenated chunks must cover the full text:
        // each chunk after the first starts inside the previous one.
        let text = "word ".repeat(3000); // 15,000 chars
        let chunks = split_text_into_chunks(&text);
        let total: usize = chunks.iter().map(|c| c.chars().count()).sum();
        assert!(total >= text.chars().count());
    }

    #[test]
    fn test_unbreakable_text_falls_back_to_hard_cuts() {
        let text = "x".repeat(CHUNK_SIZE * 2 + 100);
        let chunks = split_text_into_chunks(&text);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= CHUNK_SIZE);
        }
    }
}
