//! Sentence-aware text chunking
//!
//! Long inputs are split into pieces of at most `max_length` characters.
//! Splits land on sentence boundaries where possible; a single sentence
//! longer than the bound is cut on character boundaries.

/// Characters that end a sentence (Japanese and Latin punctuation, newlines)
const SENTENCE_TERMINATORS: &[char] = &['。', '．', '.', '!', '?', '！', '？', '\n'];

/// Splits text into bounded, sentence-aligned chunks
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_length: usize,
}

impl TextChunker {
    /// `max_length` is measured in characters and clamped to at least 1
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Split text into sentences, each keeping its trailing terminators.
    ///
    /// Concatenating the returned pieces reproduces the input exactly.
    pub fn sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut in_terminators = false;

        for (idx, ch) in text.char_indices() {
            let is_terminator = SENTENCE_TERMINATORS.contains(&ch);
            if in_terminators && !is_terminator {
                sentences.push(&text[start..idx]);
                start = idx;
            }
            in_terminators = is_terminator;
        }
        if start < text.len() {
            sentences.push(&text[start..]);
        }
        sentences
    }

    /// Chunk a text. Always returns at least one chunk (possibly empty).
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in Self::sentences(text) {
            let sentence_len = sentence.chars().count();

            if current_len + sentence_len <= self.max_length {
                current.push_str(sentence);
                current_len += sentence_len;
                continue;
            }

            push_trimmed(&mut chunks, &current);
            current.clear();
            current_len = 0;

            if sentence_len <= self.max_length {
                current.push_str(sentence);
                current_len = sentence_len;
                continue;
            }

            // Oversized sentence: emit full pieces, keep the tail open
            let chars: Vec<char> = sentence.chars().collect();
            let mut pieces = chars.chunks(self.max_length).peekable();
            while let Some(piece) = pieces.next() {
                if pieces.peek().is_some() {
                    push_trimmed(&mut chunks, &piece.iter().collect::<String>());
                } else {
                    current = piece.iter().collect();
                    current_len = piece.len();
                }
            }
        }
        push_trimmed(&mut chunks, &current);

        if chunks.is_empty() {
            chunks.push(text.trim().chars().take(self.max_length).collect());
        }
        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
