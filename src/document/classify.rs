/*!
 * Line classification for model output.
 *
 * The model is asked for a small markdown subset: whole-line bold section
 * titles (`**Title:**`), `- ` bullets and plain paragraphs. Each line is
 * classified on its own, without looking at its neighbours.
 */

/// Bold marker used by the model for section titles
pub const BOLD_MARKER: &str = "**";

/// Prefix that introduces a bullet line
pub const BULLET_PREFIX: &str = "- ";

/// Classification of a single line of model output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming
    Blank,
    /// Wrapped in a pair of bold markers
    Header,
    /// Starts with `- `
    Bullet,
    /// Anything else
    Body,
}

/// A classified line together with the content downstream stages need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// Category of the line
    pub kind: LineKind,
    /// Trimmed content with the classifying markers removed
    pub content: &'a str,
}

impl<'a> ClassifiedLine<'a> {
    fn new(kind: LineKind, content: &'a str) -> Self {
        Self { kind, content }
    }
}

/// Classify one line of model output.
///
/// First match wins: blank, then header (`**...**`, at least four
/// characters so a lone `**` is not a header), then bullet, then body.
pub fn classify_line(line: &str) -> ClassifiedLine<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return ClassifiedLine::new(LineKind::Blank, "");
    }

    if trimmed.len() >= 2 * BOLD_MARKER.len()
        && trimmed.starts_with(BOLD_MARKER)
        && trimmed.ends_with(BOLD_MARKER)
    {
        let inner = &trimmed[BOLD_MARKER.len()..trimmed.len() - BOLD_MARKER.len()];
        return ClassifiedLine::new(LineKind::Header, inner);
    }

    if let Some(rest) = trimmed.strip_prefix(BULLET_PREFIX) {
        return ClassifiedLine::new(LineKind::Bullet, rest);
    }

    ClassifiedLine::new(LineKind::Body, trimmed)
}

/// Remove every bold marker left inside a piece of text
pub fn strip_bold_markers(text: &str) -> String {
    text.replace(BOLD_MARKER, "")
}
