//! Fixed-size character chunking for extracted document text

/// Split text into fixed-size chunks of at most `chunk_size` characters.
///
/// Chunks are split on character boundaries, never inside a UTF-8 sequence.
/// Blank chunks are dropped.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::with_capacity(chunk_size);

    for ch in text.chars() {
        current.push(ch);
        if current.chars().count() >= chunk_size {
            push_chunk(&mut chunks, &mut current, chunk_size);
        }
    }
    push_chunk(&mut chunks, &mut current, chunk_size);

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, current: &mut String, chunk_size: usize) {
    let chunk = current.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
    *current = String::with_capacity(chunk_size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(chunk_text("", 10).is_empty());
        assert!(chunk_text("   \n\t ", 10).is_empty());
    }

    #[test]
    fn test_zero_chunk_size() {
        assert!(chunk_text("content", 0).is_empty());
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_text("hello world", 100);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_splits_into_fixed_chunks() {
        let chunks = chunk_text("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_multibyte_boundary_safe() {
        let text = "नमस्ते दुनिया";
        let chunks = chunk_text(text, 5);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 5);
        }
    }

    #[test]
    fn test_chunks_are_trimmed() {
        let chunks = chunk_text("abc def ghi", 4);
        for chunk in &chunks {
            assert_eq!(chunk, &chunk.trim());
            assert!(!chunk.is_empty());
        }
    }
}
