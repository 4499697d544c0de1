use std::time::Duration;

pub const DEFAULT_CHUNK_SIZE: usize = 2;
pub const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(40);

/// Growing prefixes of `text`, revealing `chunk_size` words at a time.
///
/// Each chunk is followed by a single space, so `"a b c"` with a chunk size
/// of two yields `"a b "` then `"a b c "`.
pub fn reveal_prefixes(text: &str, chunk_size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut prefix = String::with_capacity(text.len() + 1);
    words
        .chunks(chunk_size.max(1))
        .map(|chunk| {
            prefix.push_str(&chunk.join(" "));
            prefix.push(' ');
            prefix.clone()
        })
        .collect()
}

/// Reveals finished text a few words at a time.
#[derive(Debug, Clone, Copy)]
pub struct StreamingPresenter {
    pub chunk_size: usize,
    pub delay: Duration,
}

impl Default for StreamingPresenter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delay: DEFAULT_WORD_DELAY,
        }
    }
}

impl StreamingPresenter {
    pub fn new(chunk_size: usize, delay: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            delay,
        }
    }

    /// Waits `delay` before each chunk and hands every prefix to `on_chunk`.
    /// Returns the original text once the last chunk has been shown.
    pub async fn stream<F>(&self, text: String, mut on_chunk: F) -> String
    where
        F: FnMut(String),
    {
        for prefix in reveal_prefixes(&text, self.chunk_size) {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            on_chunk(prefix);
        }
        text
    }
}
