//! The shaping and line-breaking service boundary.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Real text shaping (font matching, script itemization, glyph placement)
//! is outside the layout engine; layout drives it through the
//! [`TextShaper`] trait and consumes only font extents, shaped items, and
//! line boxes. [`MetricShaper`] is the built-in deterministic
//! implementation: fixed-ratio metrics and greedy breaking, good enough to
//! lay out real documents without font data and exact enough to assert
//! against in tests.

use thiserror::Error;

/// Errors from the shaping/font service.
///
/// A failure here aborts the whole preprocessing phase of the affected
/// inline formatting context; no partial shaping result is ever used.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// No font face could be resolved for a style.
    #[error("font lookup failed: {0}")]
    FontLookup(String),
    /// The shaper failed to produce items for a buffer.
    #[error("shaping failed: {0}")]
    Shaping(String),
}

/// Font metrics in font units, as reported by a face.
///
/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// The descender is a positive distance below the baseline. Pixel values
/// are obtained by scaling with `font_size / units_per_em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontExtents {
    /// Ascent above the baseline, in font units.
    pub ascender: f32,
    /// Descent below the baseline (positive), in font units.
    pub descender: f32,
    /// Additional line gap recommended by the face, in font units.
    pub line_gap: f32,
    /// Size of the em square, in font units.
    pub units_per_em: f32,
}

/// The slice of a style the text subsystem needs: enough to select a face
/// and scale its metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Used line height in pixels; `None` means `line-height: normal`.
    pub line_height: Option<f32>,
}

/// One run of the text buffer sharing a single style, handed to
/// [`TextShaper::shape`].
#[derive(Debug, Clone, Copy)]
pub struct ShapeRun {
    /// Byte offset where the run starts in the collapsed buffer.
    pub start: usize,
    /// Exclusive byte offset where the run ends.
    pub end: usize,
    /// The run's text style.
    pub style: TextStyle,
}

/// A shaped item: a contiguous range of the buffer measured with one face.
///
/// Items are what shaping hands back to layout; layout never looks inside
/// them beyond range, advance, and face extents.
#[derive(Debug, Clone, Copy)]
pub struct ShapedItem {
    /// Byte offset where the item starts in the collapsed buffer.
    pub start: usize,
    /// Exclusive byte offset where the item ends.
    pub end: usize,
    /// Total advance width of the item, in pixels.
    pub advance: f32,
    /// Extents of the face the item was shaped with.
    pub extents: FontExtents,
}

/// A line box produced by line breaking: a range of the collapsed buffer
/// plus its measured advance.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is
/// called a line box."
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linebox {
    /// Byte offset where the line's content starts.
    pub start: usize,
    /// Exclusive byte offset where the line's content ends (trailing
    /// collapsible spaces removed).
    pub end: usize,
    /// Measured advance of the line's content, in pixels.
    pub width: f32,
}

/// The shaping/line-breaking service the layout engine drives.
///
/// Implementations must be deterministic for a given input; layout calls
/// [`TextShaper::extents`] and [`TextShaper::shape`] during preprocessing
/// (before any layout pass) and [`TextShaper::break_lines`] during text
/// layout, once the available inline size is known.
pub trait TextShaper {
    /// Font extents for a style (the "strut" metrics of its first
    /// available font, CSS2 [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)).
    ///
    /// # Errors
    ///
    /// Fails when no face can be resolved; fatal for preprocessing.
    fn extents(&self, style: &TextStyle) -> Result<FontExtents, ShapeError>;

    /// Shape the whole collapsed buffer into measured items covering the
    /// given style runs.
    ///
    /// # Errors
    ///
    /// Fails when shaping fails for any run; fatal for preprocessing.
    fn shape(&self, text: &str, runs: &[ShapeRun]) -> Result<Vec<ShapedItem>, ShapeError>;

    /// Break the buffer into line boxes no wider than `available` pixels,
    /// honoring the forced break offsets contributed by `<br>` boxes.
    fn break_lines(
        &self,
        text: &str,
        items: &[ShapedItem],
        forced_breaks: &[usize],
        available: f32,
    ) -> Vec<Linebox>;
}

/// Deterministic fixed-ratio shaper.
///
/// Implementation note: without access to actual font data we use fixed
/// ratio approximations. The average advance width of Latin glyphs in a
/// proportional font is approximately 0.6× the font size (typical for
/// Helvetica/Arial body text); the 800/200 ascent/descent split on a
/// 1000-unit em makes `line-height: normal` equal the font size exactly,
/// which keeps layout arithmetic exact in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricShaper;

impl MetricShaper {
    const UNITS_PER_EM: f32 = 1000.0;
    const ASCENDER: f32 = 800.0;
    const DESCENDER: f32 = 200.0;
    const ADVANCE_RATIO: f32 = 0.6;

    /// The advance of one character at `font_size`.
    #[must_use]
    pub fn char_advance(font_size: f32) -> f32 {
        Self::ADVANCE_RATIO * font_size
    }

    /// Per-character advance at a buffer offset, read from the covering
    /// shaped item (uniform within an item for this shaper).
    fn advance_at(items: &[ShapedItem], offset: usize) -> f32 {
        for item in items {
            if offset >= item.start && offset < item.end {
                let chars = item.end.saturating_sub(item.start).max(1);
                #[allow(clippy::cast_precision_loss)]
                return item.advance / chars as f32;
            }
        }
        0.0
    }

    /// Measure a byte range of the buffer.
    fn measure(text: &str, items: &[ShapedItem], start: usize, end: usize) -> f32 {
        text[start..end]
            .char_indices()
            .map(|(off, _)| Self::advance_at(items, start + off))
            .sum()
    }

    /// [§ 5.5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
    ///
    /// Greedy last-fit breaking of one forced-break-free segment.
    ///
    /// "A soft wrap opportunity exists at the boundary of whitespace." A
    /// word wider than the line is placed on a line of its own and
    /// overflows ([§ 3.3 overflow-wrap](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
    /// is not consumed by this engine).
    fn break_segment(
        text: &str,
        items: &[ShapedItem],
        seg_start: usize,
        seg_end: usize,
        available: f32,
        lines: &mut Vec<Linebox>,
    ) {
        let mut line_start = seg_start;

        loop {
            // Skip collapsible spaces at the start of a line.
            // [§ 4.1.3](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
            // "A sequence of collapsible spaces at the beginning of a line
            // is removed."
            while line_start < seg_end && text[line_start..].starts_with(' ') {
                line_start += 1;
            }
            if line_start >= seg_end {
                break;
            }

            // Walk forward accumulating advance; remember the last soft
            // wrap opportunity (the space before the word that no longer
            // fits breaks the line there).
            let mut width = 0.0;
            let mut last_space: Option<usize> = None;
            let mut line_end = seg_end;
            let mut overflowed = false;

            for (off, ch) in text[line_start..seg_end].char_indices() {
                let abs = line_start + off;
                if ch == ' ' {
                    last_space = Some(abs);
                }
                width += Self::advance_at(items, abs);
                if width > available && abs > line_start {
                    overflowed = true;
                    line_end = abs;
                    break;
                }
            }

            if overflowed {
                if let Some(space) = last_space {
                    line_end = space;
                } else {
                    // A single unbreakable word: extend it to the next
                    // space or the segment end and let it overflow.
                    line_end = text[line_end..seg_end]
                        .find(' ')
                        .map_or(seg_end, |o| line_end + o);
                }
            }

            // "A sequence of collapsible spaces at the end of a line is
            // removed."
            let mut content_end = line_end;
            while content_end > line_start && text[..content_end].ends_with(' ') {
                content_end -= 1;
            }

            lines.push(Linebox {
                start: line_start,
                end: content_end,
                width: Self::measure(text, items, line_start, content_end),
            });

            if line_end >= seg_end {
                break;
            }
            line_start = line_end;
        }
    }
}

impl TextShaper for MetricShaper {
    fn extents(&self, _style: &TextStyle) -> Result<FontExtents, ShapeError> {
        Ok(FontExtents {
            ascender: Self::ASCENDER,
            descender: Self::DESCENDER,
            line_gap: 0.0,
            units_per_em: Self::UNITS_PER_EM,
        })
    }

    fn shape(&self, text: &str, runs: &[ShapeRun]) -> Result<Vec<ShapedItem>, ShapeError> {
        let extents = self.extents(&TextStyle {
            font_size: 16.0,
            line_height: None,
        })?;
        let mut items = Vec::with_capacity(runs.len());
        for run in runs {
            if run.start == run.end {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let chars = text[run.start..run.end].chars().count() as f32;
            items.push(ShapedItem {
                start: run.start,
                end: run.end,
                advance: chars * Self::char_advance(run.style.font_size),
                extents,
            });
        }
        Ok(items)
    }

    fn break_lines(
        &self,
        text: &str,
        items: &[ShapedItem],
        forced_breaks: &[usize],
        available: f32,
    ) -> Vec<Linebox> {
        let mut lines = Vec::new();
        let mut seg_start = 0;

        for &forced in forced_breaks {
            let forced = forced.min(text.len());
            let before = lines.len();
            Self::break_segment(text, items, seg_start, forced, available, &mut lines);
            if lines.len() == before {
                // A forced break on an empty segment still ends a line:
                // consecutive breaks produce empty line boxes.
                lines.push(Linebox {
                    start: seg_start.min(forced),
                    end: seg_start.min(forced),
                    width: 0.0,
                });
            }
            seg_start = forced;
        }

        Self::break_segment(text, items, seg_start, text.len(), available, &mut lines);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: f32) -> TextStyle {
        TextStyle {
            font_size,
            line_height: None,
        }
    }

    fn shape_all(text: &str, font_size: f32) -> Vec<ShapedItem> {
        MetricShaper
            .shape(
                text,
                &[ShapeRun {
                    start: 0,
                    end: text.len(),
                    style: style(font_size),
                }],
            )
            .expect("metric shaping is infallible")
    }

    #[test]
    fn advance_is_ratio_of_font_size() {
        let items = shape_all("abcd", 10.0);
        assert_eq!(items.len(), 1);
        assert!((items[0].advance - 24.0).abs() < 1e-4);
    }

    #[test]
    fn single_line_when_everything_fits() {
        let text = "hello world";
        let items = shape_all(text, 10.0);
        let lines = MetricShaper.break_lines(text, &items, &[], 1000.0);
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].start, lines[0].end), (0, text.len()));
    }

    #[test]
    fn breaks_at_last_fitting_space() {
        // 6px per char at font-size 10. "aaa bbb ccc" = 11 chars.
        // 42px fits "aaa bbb" (7 chars = 42px); "ccc" wraps.
        let text = "aaa bbb ccc";
        let items = shape_all(text, 10.0);
        let lines = MetricShaper.break_lines(text, &items, &[], 42.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(&text[lines[0].start..lines[0].end], "aaa bbb");
        assert_eq!(&text[lines[1].start..lines[1].end], "ccc");
        // Trailing space is excluded from the measured width.
        assert!((lines[0].width - 42.0).abs() < 1e-4);
    }

    #[test]
    fn overlong_word_overflows_alone() {
        let text = "hi abcdefghij hi";
        let items = shape_all(text, 10.0);
        let lines = MetricShaper.break_lines(text, &items, &[], 30.0);
        let rendered: Vec<&str> = lines.iter().map(|l| &text[l.start..l.end]).collect();
        assert_eq!(rendered, vec!["hi", "abcdefghij", "hi"]);
        assert!(lines[1].width > 30.0);
    }

    #[test]
    fn forced_breaks_split_lines() {
        let text = "abcd";
        let items = shape_all(text, 10.0);
        let lines = MetricShaper.break_lines(text, &items, &[2], 1000.0);
        let rendered: Vec<&str> = lines.iter().map(|l| &text[l.start..l.end]).collect();
        assert_eq!(rendered, vec!["ab", "cd"]);
    }

    #[test]
    fn consecutive_forced_breaks_make_empty_lines() {
        // "ab<br><br>": the first break ends the "ab" line, the second
        // ends an empty line; nothing follows, so no further line.
        let text = "ab";
        let items = shape_all(text, 10.0);
        let lines = MetricShaper.break_lines(text, &items, &[2, 2], 1000.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(&text[lines[0].start..lines[0].end], "ab");
        assert_eq!((lines[1].start, lines[1].end), (2, 2));
    }
}
