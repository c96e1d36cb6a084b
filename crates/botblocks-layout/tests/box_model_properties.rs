//! Property tests for the distribution primitive.

use botblocks_dom::{Align, Length};
use botblocks_layout::{Sizing, Span, partition};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Relative comparison; sums of a hundred `f32`s drift in the last digits.
fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs()).max(1.0)
}

fn total(spans: &[Span]) -> f32 {
    spans.iter().map(|s| s.length).sum()
}

fn contiguous(spans: &[Span]) -> bool {
    spans
        .windows(2)
        .all(|w| close(w[0].offset + w[0].length, w[1].offset))
}

#[quickcheck]
fn percent_children_sum_to_available(weights: Vec<u8>, available: u16) -> TestResult {
    let sum: u32 = weights.iter().map(|&w| u32::from(w)).sum();
    if sum == 0 {
        return TestResult::discard();
    }
    #[allow(clippy::cast_precision_loss)]
    let children: Vec<Sizing> = weights
        .iter()
        .map(|&w| Sizing::new(Length::Percent(f32::from(w) * 100.0 / sum as f32), 0.0))
        .collect();
    let available = f32::from(available);
    let spans = partition(&children, 0.0, available, Align::Justify);
    TestResult::from_bool(close(total(&spans), available))
}

#[quickcheck]
fn justify_with_no_leftover_packs(pixels: Vec<u8>, start: i16) -> bool {
    let children: Vec<Sizing> = pixels
        .iter()
        .map(|&p| Sizing::new(Length::Pixels(f32::from(p)), 0.0))
        .collect();
    let available: f32 = pixels.iter().map(|&p| f32::from(p)).sum();
    let spans = partition(&children, f32::from(start), available, Align::Justify);
    contiguous(&spans) && spans.first().is_none_or(|s| close(s.offset, f32::from(start)))
}

#[quickcheck]
fn auto_children_fill_when_room(mins: Vec<u8>, extra: u8) -> TestResult {
    if mins.is_empty() {
        return TestResult::discard();
    }
    let children: Vec<Sizing> = mins
        .iter()
        .map(|&m| Sizing::new(Length::Auto, f32::from(m)))
        .collect();
    let available: f32 = mins.iter().map(|&m| f32::from(m)).sum::<f32>() + f32::from(extra);
    let spans = partition(&children, 0.0, available, Align::Justify);
    let fits = spans
        .iter()
        .zip(&children)
        .all(|(span, child)| span.length >= child.min_along || close(span.length, child.min_along));
    TestResult::from_bool(fits && close(total(&spans), available) && contiguous(&spans))
}

#[quickcheck]
fn proportional_uses_one_scale_factor(mins: Vec<u8>, extra: u8) -> TestResult {
    let mins: Vec<f32> = mins.into_iter().filter(|&m| m > 0).map(f32::from).collect();
    if mins.is_empty() {
        return TestResult::discard();
    }
    let children: Vec<Sizing> = mins.iter().map(|&m| Sizing::new(Length::Auto, m)).collect();
    let available = mins.iter().sum::<f32>() + f32::from(extra);
    let spans = partition(&children, 0.0, available, Align::Proportional);
    let scale = spans[0].length / mins[0];
    let uniform = spans
        .iter()
        .zip(&mins)
        .all(|(span, &min)| (span.length / min - scale).abs() < 1e-3);
    TestResult::from_bool(uniform && scale >= 1.0 - 1e-4 && contiguous(&spans))
}

#[quickcheck]
fn one_span_per_child(lengths: Vec<(u8, u8)>, available: u16, align: u8) -> bool {
    let aligns = [
        Align::Before,
        Align::After,
        Align::Center,
        Align::Distribute,
        Align::Justify,
        Align::Proportional,
    ];
    let align = aligns[usize::from(align) % aligns.len()];
    let children: Vec<Sizing> = lengths
        .iter()
        .map(|&(kind, value)| {
            let length = match kind % 4 {
                0 => Length::Auto,
                1 => Length::Min,
                2 => Length::Pixels(f32::from(value)),
                _ => Length::Percent(f32::from(value % 101)),
            };
            Sizing::new(length, f32::from(value))
        })
        .collect();
    partition(&children, 0.0, f32::from(available), align).len() == children.len()
}
