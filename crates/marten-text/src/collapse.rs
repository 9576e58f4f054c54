//! White-space collapsing over an inline formatting context's text buffer.
//!
//! [§ 4.1 The White Space Processing Rules](https://www.w3.org/TR/css-text-3/#white-space-rules)
//!
//! "For each inline box where white-space is normal...: any sequence of
//! collapsible spaces and tabs immediately preceding or following a
//! segment break is removed; collapsible segment breaks are transformed
//! into spaces; every collapsible tab is converted to a collapsible space;
//! any collapsible space immediately following another collapsible space
//! ... is collapsed to have zero advance width."
//!
//! The layout engine concatenates every run of an inline formatting context
//! into one buffer, hands it here together with each run's range, and gets
//! back the collapsed buffer plus each run's adjusted (possibly empty)
//! range. Runs whose ranges collapse to empty are pruned by the caller.

/// One run's contribution to the buffer being collapsed.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Byte offset where this segment starts in the uncollapsed buffer.
    pub start: usize,
    /// Exclusive byte offset where this segment ends.
    pub end: usize,
    /// Whether white space collapses in this segment
    /// (`white-space: normal`), or is preserved (`white-space: pre`).
    pub collapsible: bool,
}

/// The result of collapsing: the new buffer and each input segment's range
/// within it, in the same order as the input.
#[derive(Debug, Clone)]
pub struct Collapsed {
    /// The collapsed text buffer.
    pub text: String,
    /// Adjusted `(start, end)` ranges, one per input segment. A segment
    /// whose content collapsed away entirely has `start == end`.
    pub ranges: Vec<(usize, usize)>,
}

fn is_collapsible_ws(c: char) -> bool {
    // [§ 4.1](https://www.w3.org/TR/css-text-3/#white-space-rules)
    //
    // Spaces (U+0020), tabs (U+0009), and segment breaks (U+000A/U+000D)
    // are the collapsible white space characters.
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Collapse white space across a concatenated buffer.
///
/// `segments` must tile `text` in order (each segment's `start` equals the
/// previous segment's `end`). A collapsible space is dropped when it would
/// begin the buffer or follow another collapsed space — including across
/// segment boundaries, since adjoining runs collapse against each other.
#[must_use]
pub fn collapse(text: &str, segments: &[Segment]) -> Collapsed {
    let mut out = String::with_capacity(text.len());
    let mut ranges = Vec::with_capacity(segments.len());
    // True while the next collapsible space would be dropped: at buffer
    // start, or right after an emitted collapsed space.
    let mut pending_collapse = true;

    for seg in segments {
        let start = out.len();
        let slice = &text[seg.start..seg.end];

        if seg.collapsible {
            for c in slice.chars() {
                if is_collapsible_ws(c) {
                    if !pending_collapse {
                        out.push(' ');
                        pending_collapse = true;
                    }
                } else {
                    out.push(c);
                    pending_collapse = false;
                }
            }
        } else {
            // Preserved white space passes through untouched and resets
            // the collapse state: a following collapsible space is a new
            // sequence.
            out.push_str(slice);
            if !slice.is_empty() {
                pending_collapse = false;
            }
        }

        ranges.push((start, out.len()));
    }

    Collapsed { text: out, ranges }
}

/// True if every character of `text` is collapsible white space.
///
/// Used by the box-tree builder to suppress anonymous boxes for inline
/// runs that would collapse to nothing
/// ([§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)).
#[must_use]
pub fn is_all_collapsible_ws(text: &str) -> bool {
    text.chars().all(is_collapsible_ws)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: usize, end: usize) -> Segment {
        Segment {
            start,
            end,
            collapsible: true,
        }
    }

    #[test]
    fn collapses_internal_runs_of_whitespace() {
        let text = "a  \t\n b";
        let out = collapse(text, &[seg(0, text.len())]);
        assert_eq!(out.text, "a b");
        assert_eq!(out.ranges, vec![(0, 3)]);
    }

    #[test]
    fn drops_leading_whitespace() {
        let text = "   hello";
        let out = collapse(text, &[seg(0, text.len())]);
        assert_eq!(out.text, "hello");
    }

    #[test]
    fn collapses_across_segment_boundaries() {
        // "hi " + "  there": the spaces adjoin across the boundary and
        // collapse into the single space already emitted by segment one.
        let text = "hi   there";
        let out = collapse(text, &[seg(0, 5), seg(5, 10)]);
        assert_eq!(out.text, "hi there");
        assert_eq!(out.ranges, vec![(0, 3), (3, 8)]);
    }

    #[test]
    fn all_whitespace_segment_collapses_to_empty() {
        let text = " x   ";
        let out = collapse(text, &[seg(0, 2), seg(2, 5)]);
        assert_eq!(out.text, "x ");
        // Segment two contributed only the single collapsed trailing space.
        assert_eq!(out.ranges, vec![(0, 1), (1, 2)]);

        let ws = "  \n ";
        let out = collapse(ws, &[seg(0, ws.len())]);
        assert_eq!(out.text, "");
        assert_eq!(out.ranges, vec![(0, 0)]);
    }

    #[test]
    fn preserved_segments_pass_through() {
        let text = "a \n b";
        let out = collapse(
            text,
            &[
                Segment {
                    start: 0,
                    end: 2,
                    collapsible: true,
                },
                Segment {
                    start: 2,
                    end: 5,
                    collapsible: false,
                },
            ],
        );
        assert_eq!(out.text, "a \n b");
    }

    #[test]
    fn all_collapsible_detection() {
        assert!(is_all_collapsible_ws(" \t\n"));
        assert!(is_all_collapsible_ws(""));
        assert!(!is_all_collapsible_ws(" x "));
    }
}
