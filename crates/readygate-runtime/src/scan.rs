//! Marker detection over raw log chunks.

/// Looks for a marker in a sequence of log chunks.
///
/// Matching is done on bytes, so chunks need not be valid UTF-8. The last
/// `marker.len() - 1` bytes of each chunk are carried over, which catches a
/// marker that the runtime happened to split across two frames.
#[derive(Debug)]
pub struct MarkerScanner<'m> {
    marker: &'m [u8],
    window: Vec<u8>,
    observed: bool,
}

impl<'m> MarkerScanner<'m> {
    /// Creates a scanner that has seen nothing yet.
    #[must_use]
    pub const fn new(marker: &'m [u8]) -> Self {
        Self {
            marker,
            window: Vec::new(),
            observed: false,
        }
    }

    /// Feeds the next chunk and returns whether the marker has been seen.
    ///
    /// Once the marker is observed every later call returns `true` without
    /// looking at the chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> bool {
        if self.observed {
            return true;
        }
        if self.marker.is_empty() {
            self.observed = true;
            return true;
        }

        self.window.extend_from_slice(chunk);
        if contains(&self.window, self.marker) {
            self.observed = true;
            self.window.clear();
            return true;
        }

        let keep = self.marker.len() - 1;
        if self.window.len() > keep {
            let _ = self.window.drain(..self.window.len() - keep);
        }
        false
    }

    /// Returns whether the marker has been seen.
    #[must_use]
    pub const fn observed(&self) -> bool {
        self.observed
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marker_inside_a_line() {
        let mut scanner = MarkerScanner::new(b"Ready");
        assert!(scanner.feed(b"Server Ready on port 8080\n"));
        assert!(scanner.observed());
    }

    #[test]
    fn ignores_unrelated_output() {
        let mut scanner = MarkerScanner::new(b"Ready");
        assert!(!scanner.feed(b"Starting services\n"));
        assert!(!scanner.feed(b"Waiting for ports\n"));
        assert!(!scanner.observed());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut scanner = MarkerScanner::new(b"Ready");
        assert!(!scanner.feed(b"ready\n"));
    }

    #[test]
    fn finds_marker_split_across_chunks() {
        let mut scanner = MarkerScanner::new(b"Ready");
        assert!(!scanner.feed(b"all services Re"));
        assert!(scanner.feed(b"ady\n"));
    }

    #[test]
    fn finds_marker_split_across_many_small_chunks() {
        let mut scanner = MarkerScanner::new(b"Ready");
        for byte in b"xxRead" {
            assert!(!scanner.feed(&[*byte]));
        }
        assert!(scanner.feed(b"y"));
    }

    #[test]
    fn tolerates_invalid_utf8() {
        let mut scanner = MarkerScanner::new(b"Ready");
        assert!(scanner.feed(&[0xff, 0xfe, b'R', b'e', b'a', b'd', b'y']));
    }

    #[test]
    fn empty_marker_matches_first_chunk() {
        let mut scanner = MarkerScanner::new(b"");
        assert!(!scanner.observed());
        assert!(scanner.feed(b"anything"));
    }

    #[test]
    fn stays_observed_after_match() {
        let mut scanner = MarkerScanner::new(b"Ready");
        assert!(scanner.feed(b"Ready"));
        assert!(scanner.feed(b"later output"));
    }
}
