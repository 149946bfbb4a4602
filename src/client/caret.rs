//! Remote caret geometry for the editor overlay.
//!
//! Converts a remote participant's character offset into pixel
//! coordinates relative to the text surface, so the overlay can draw a
//! thin vertical indicator with a short session label above it. An
//! unmounted surface suppresses the caret instead of erroring.

/// Fixed palette; a session id always maps to the same color within a run.
const CARET_COLORS: [&str; 6] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f1c40f", "#9b59b6", "#1abc9c",
];

/// Deterministic color for a session id: char-code sum modulo palette size.
pub fn color_for_session(session_id: &str) -> &'static str {
    let char_code_sum: usize = session_id.chars().map(|c| c as usize).sum();
    CARET_COLORS[char_code_sum % CARET_COLORS.len()]
}

/// Short label shown above the caret: the first 6 characters of the id.
pub fn caret_label(session_id: &str) -> String {
    session_id.chars().take(6).collect()
}

/// Font and padding metrics of a monospace text surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
    pub padding_top: f32,
    pub padding_left: f32,
    /// Soft-wrap column count; `None` disables wrapping.
    pub wrap_columns: Option<usize>,
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding_top: 0.0,
            padding_left: 0.0,
            wrap_columns: None,
        }
    }
}

/// A mounted text surface: content, metrics, and current scroll offsets.
#[derive(Clone, Debug)]
pub struct TextSurface {
    pub text: String,
    pub metrics: SurfaceMetrics,
    pub scroll_top: f32,
    pub scroll_left: f32,
}

impl TextSurface {
    pub fn new(text: impl Into<String>, metrics: SurfaceMetrics) -> Self {
        Self {
            text: text.into(),
            metrics,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }
}

/// Pixel position of a caret relative to the surface's visible origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretCoords {
    pub top: f32,
    pub left: f32,
    pub height: f32,
}

/// A remote caret ready to render: position, color, and label.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteCaret {
    pub session_id: String,
    pub coords: CaretCoords,
    pub color: &'static str,
    pub label: String,
}

/// Resolve a character offset to pixel coordinates on the surface,
/// adjusted for the surface's own scroll position.
///
/// Offsets past the end of the text clamp to the end, so position 0 and
/// position == text length are always resolvable on a mounted surface.
/// `None` surface (not yet mounted) yields `None`.
pub fn caret_coordinates(surface: Option<&TextSurface>, position: usize) -> Option<CaretCoords> {
    let surface = surface?;
    let metrics = &surface.metrics;

    let mut line = 0usize;
    let mut col = 0usize;
    for (i, c) in surface.text.chars().enumerate() {
        if i == position {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
            if let Some(wrap) = metrics.wrap_columns {
                if col >= wrap {
                    line += 1;
                    col = 0;
                }
            }
        }
    }

    Some(CaretCoords {
        top: metrics.padding_top + line as f32 * metrics.line_height - surface.scroll_top,
        left: metrics.padding_left + col as f32 * metrics.char_width - surface.scroll_left,
        height: metrics.line_height,
    })
}

/// Build the full render model for one remote participant's caret, or
/// `None` when the surface is unmounted.
pub fn remote_caret(
    surface: Option<&TextSurface>,
    session_id: &str,
    position: usize,
) -> Option<RemoteCaret> {
    let coords = caret_coordinates(surface, position)?;
    Some(RemoteCaret {
        session_id: session_id.to_string(),
        coords,
        color: color_for_session(session_id),
        label: caret_label(session_id),
    })
}
