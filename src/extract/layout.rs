//! Geometry normalization and reading-order reconstruction

use crate::pdf::{GlyphRun, Viewport};

use super::types::{PositionedFragment, SAME_LINE_TOLERANCE, WORD_GAP_TOLERANCE};

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Normalize a glyph run against its page viewport
///
/// Returns `None` for runs whose text is blank. The y axis is flipped from
/// PDF's bottom-up convention to top-down.
pub fn normalize_run(
    run: &GlyphRun,
    page_number: u32,
    viewport: Viewport,
) -> Option<PositionedFragment> {
    let text = run.text.trim();
    if text.is_empty() {
        return None;
    }

    let vw = viewport.width as f64;
    let vh = viewport.height as f64;

    // A zero-sized viewport still yields a fragment, just with no geometry.
    let (x, y, width, height) = if vw > 0.0 && vh > 0.0 {
        (
            run.origin_x() as f64 / vw,
            (vh - run.origin_y() as f64) / vh,
            run.width as f64 / vw,
            run.height as f64 / vh,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    Some(PositionedFragment {
        text: text.to_string(),
        page_number,
        x: clamp_unit(x),
        y: clamp_unit(y),
        width: clamp_unit(width),
        height: clamp_unit(height),
    })
}

/// Sort one page's fragments into reading order
///
/// Fragments are bucketed into lines: walking by ascending `y`, a fragment
/// joins the current line while it is within `tolerance` of the line's first
/// fragment. Lines go top to bottom, fragments within a line left to right.
///
/// Returns the line index of each fragment in its sorted position.
pub fn sort_reading_order(fragments: &mut [PositionedFragment], tolerance: f64) -> Vec<usize> {
    fragments.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::with_capacity(fragments.len());
    let mut line = 0usize;
    let mut anchor: Option<f64> = None;
    for fragment in fragments.iter() {
        match anchor {
            Some(y) if fragment.y - y <= tolerance => {}
            Some(_) => {
                line += 1;
                anchor = Some(fragment.y);
            }
            None => anchor = Some(fragment.y),
        }
        lines.push(line);
    }

    let mut keyed: Vec<(usize, PositionedFragment)> =
        lines.into_iter().zip(fragments.iter().cloned()).collect();
    keyed.sort_by(|(la, a), (lb, b)| {
        la.cmp(lb)
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    });

    let mut line_of = Vec::with_capacity(keyed.len());
    for (slot, (line, fragment)) in fragments.iter_mut().zip(keyed) {
        *slot = fragment;
        line_of.push(line);
    }
    line_of
}

/// Rebuild page text from fragments already in reading order
///
/// `lines` holds the line index of each fragment as returned by
/// [`sort_reading_order`]. A newline separates fragments on different lines;
/// a single space separates fragments on the same line whose horizontal gap
/// exceeds `word_gap`. Otherwise runs are joined directly so words split
/// across runs stay whole.
pub fn reconstruct_text(fragments: &[PositionedFragment], lines: &[usize], word_gap: f64) -> String {
    let mut text = String::new();
    let mut previous: Option<(&PositionedFragment, usize)> = None;

    for (fragment, &line) in fragments.iter().zip(lines) {
        if let Some((prev, prev_line)) = previous {
            if line != prev_line {
                text.push('\n');
            } else if fragment.x - prev.right() > word_gap {
                text.push(' ');
            }
        }
        text.push_str(&fragment.text);
        previous = Some((fragment, line));
    }

    text
}

/// Sort a copy of one page's fragments and rebuild its text with the
/// default tolerances
pub fn reconstruct_page_text(fragments: &[PositionedFragment]) -> String {
    let mut sorted = fragments.to_vec();
    let lines = sort_reading_order(&mut sorted, SAME_LINE_TOLERANCE);
    reconstruct_text(&sorted, &lines, WORD_GAP_TOLERANCE)
}
