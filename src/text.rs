//! Static text layout helpers: alignment padding and word-aware wrapping.

/// Horizontal alignment of text within a display line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

impl Align {
    /// Leading and trailing space counts needed to place `len` characters
    /// in a `width`-column line.
    pub const fn padding(self, len: usize, width: usize) -> (usize, usize) {
        if len >= width {
            return (0, 0);
        }
        let spare = width - len;
        match self {
            Self::Left => (0, spare),
            Self::Right => (spare, 0),
            // Odd spare column goes to the right.
            Self::Center => (spare / 2, spare - spare / 2),
        }
    }
}

/// Split `text` into a chunk that fits one `width`-column line and the
/// remaining text.
///
/// Breaks at the last space within the first `width + 1` characters when
/// one exists, otherwise hard-breaks at `width`. The remainder comes back
/// with surrounding whitespace trimmed.
pub fn split_for_width(text: &str, width: usize) -> (&str, &str) {
    if text.len() <= width {
        return (text, "");
    }

    // Probing one past the width catches a space sitting right after the
    // last column.
    let probe = text.get(..width + 1).unwrap_or(text);
    let break_at = probe.rfind(' ').unwrap_or(width);

    let chunk = text.get(..break_at).unwrap_or(text);
    let rest = text.get(break_at..).unwrap_or("").trim();
    (chunk, rest)
}
