// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Line-respecting text chunker

/// Splits text into bounded chunks, preferring line boundaries
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max: usize,
}

impl Chunker {
    /// Create a chunker; a zero size is treated as one byte
    pub fn new(max: usize) -> Self {
        Self { max: max.max(1) }
    }

    /// Maximum chunk size in bytes
    pub fn max_size(&self) -> usize {
        self.max
    }

    /// Lazily chunk `text`. The iterator is `Clone`, so a sequence can be
    /// restarted from any point.
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            rest: text,
            max: self.max,
        }
    }
}

/// Iterator over the chunks of a text
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    max: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        if self.rest.len() <= self.max {
            let chunk = self.rest;
            self.rest = "";
            return Some(chunk);
        }

        // Whole lines (newline included) that fit in the window
        let window = floor_char_boundary(self.rest, self.max);
        let end = match self.rest[..window].rfind('\n') {
            Some(newline) => newline + 1,
            // A single line longer than the window is hard-sliced
            None => window,
        };
        let end = if end == 0 { next_char_boundary(self.rest) } else { end };

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn next_char_boundary(s: &str) -> usize {
    s.chars().next().map(char::len_utf8).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(chunker: &Chunker, text: &str) -> String {
        chunker.chunks(text).collect()
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunker = Chunker::new(100);
        let chunks: Vec<_> = chunker.chunks("a\nb\nc").collect();
        assert_eq!(chunks, vec!["a\nb\nc"]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(Chunker::new(10).chunks("").count(), 0);
    }

    #[test]
    fn test_breaks_on_lines() {
        let chunker = Chunker::new(8);
        let chunks: Vec<_> = chunker.chunks("abc\ndef\nghi\njkl").collect();
        assert_eq!(chunks, vec!["abc\ndef\n", "ghi\njkl"]);
        assert!(chunks.iter().all(|c| c.len() <= 8));
    }

    #[test]
    fn test_hard_slices_long_line() {
        let chunker = Chunker::new(4);
        let chunks: Vec<_> = chunker.chunks("abcdefghij\nxy").collect();
        assert_eq!(chunks, vec!["abcd", "efgh", "ij\n", "xy"]);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "公司公司公司\n科技";
        for max in 1..12 {
            let chunker = Chunker::new(max);
            assert_eq!(join(&chunker, text), text, "max = {}", max);
        }
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let samples = [
            "",
            "\n",
            "\n\n\n",
            "no newline at all but quite long text here",
            "line one\nline two\r\nline three\n",
            "var a=\"/api/user\";\nvar b='//cdn.example.com/x.js';\n",
        ];
        for sample in samples {
            for max in [1, 2, 3, 7, 16, 1000] {
                assert_eq!(join(&Chunker::new(max), sample), sample);
            }
        }
    }

    #[test]
    fn test_restartable() {
        let chunker = Chunker::new(5);
        let mut chunks = chunker.chunks("aa\nbb\ncc\ndd\n");
        chunks.next();
        let snapshot = chunks.clone();
        let rest: Vec<_> = chunks.collect();
        let again: Vec<_> = snapshot.collect();
        assert_eq!(rest, again);
    }
}
