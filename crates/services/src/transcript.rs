//! Word-synchronized transcript view logic: which word to highlight for a
//! playback position, and where to seek when a word is clicked.

use ambience_store::Word;

/// Index of the word to highlight at playback time `t`: the first word
/// whose `[start, end)` interval contains `t`. Overlapping intervals are
/// not expected, but when they occur the earliest match wins. `None`
/// when no interval contains `t` (gaps, or past the end).
pub fn highlight_index(words: &[Word], t: f64) -> Option<usize> {
    words
        .iter()
        .position(|w| w.start <= t && t < w.end)
}

/// Playback position to seek to for a clicked word.
pub fn seek_target(words: &[Word], index: usize) -> Option<f64> {
    words.get(index).map(|w| w.start)
}
