use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

/// Shorten `input` to at most `max_graphemes` user-perceived characters, marking the cut.
pub(in crate::tui) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: char = '…';

    if max_graphemes == 0 {
        return Cow::Borrowed("");
    }

    let mut graphemes = input.graphemes(true);
    let mut end = 0;
    for _ in 0..max_graphemes {
        match graphemes.next() {
            Some(grapheme) => end += grapheme.len(),
            None => return Cow::Borrowed(input),
        }
    }
    if graphemes.next().is_none() {
        return Cow::Borrowed(input);
    }

    // Drop the last kept grapheme to make room for the marker.
    let keep = input[..end]
        .grapheme_indices(true)
        .next_back()
        .map_or(0, |(start, _)| start);
    let mut truncated = input[..keep].to_owned();
    truncated.push(ELLIPSIS);
    Cow::Owned(truncated)
}
