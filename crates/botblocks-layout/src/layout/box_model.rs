//! The axis-agnostic distribution primitive.
//!
//! Every distributing container (rows, columns, lengthwise, crosswise) hands
//! its children to [`partition`] with the along-axis start and length of its
//! rectangle. The result is one [`Span`] per child in child order.
//!
//! Sizing is resolved in a fixed order:
//! 1. `Npx` is exact.
//! 2. `N%` is a share of the *original* available length.
//! 3. `min` is the child's intrinsic minimum along the axis.
//! 4. `auto` children share what is left.
//!
//! Leftover space (which may be negative) is then spent by the container's
//! [`Align`] policy.

use botblocks_dom::{Align, Length};

/// One child as the box model sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    /// The child's sizing policy.
    pub length: Length,
    /// The child's intrinsic minimum along the container's axis.
    pub min_along: f32,
}

impl Sizing {
    /// Create a sizing entry.
    #[must_use]
    pub const fn new(length: Length, min_along: f32) -> Self {
        Self { length, min_along }
    }
}

/// A child's assigned slice along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    /// Absolute start coordinate.
    pub offset: f32,
    /// Length along the axis.
    pub length: f32,
}

/// Distribute `available` pixels starting at `start` among `children`.
#[must_use]
pub fn partition(children: &[Sizing], start: f32, available: f32, align: Align) -> Vec<Span> {
    let mut lengths = vec![0.0_f32; children.len()];
    let mut auto: Vec<usize> = Vec::new();
    let mut remaining = available;

    for (i, child) in children.iter().enumerate() {
        let length = match child.length {
            Length::Auto => {
                auto.push(i);
                continue;
            }
            Length::Pixels(px) => px,
            Length::Percent(pct) => available * pct / 100.0,
            Length::Min => child.min_along,
        };
        lengths[i] = length;
        remaining -= length;
    }

    if auto.is_empty() {
        return distribute(&lengths, start, remaining, align);
    }

    if align == Align::Proportional {
        let min_sum: f32 = auto.iter().map(|&i| children[i].min_along).sum();
        if min_sum > 0.0 {
            let scale = remaining / min_sum;
            for &i in &auto {
                lengths[i] = children[i].min_along;
                if scale >= 1.0 {
                    lengths[i] *= scale;
                }
            }
        } else {
            #[allow(clippy::cast_precision_loss)]
            let share = remaining.max(0.0) / auto.len() as f32;
            for &i in &auto {
                lengths[i] = share;
            }
        }
        return distribute(&lengths, start, 0.0, align);
    }

    remaining = fair_share(children, &auto, &mut lengths, remaining);
    distribute(&lengths, start, remaining, align)
}

/// Max-min fair division of `pool` among the `auto` children.
///
/// Each round computes an equal estimate and pins every child whose minimum
/// exceeds it at that minimum. Rounds repeat until nothing pins; the rest
/// split the pool equally. Returns the leftover after division.
fn fair_share(children: &[Sizing], auto: &[usize], lengths: &mut [f32], mut pool: f32) -> f32 {
    let mut unpinned: Vec<usize> = auto.to_vec();
    while !unpinned.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let estimate = pool / unpinned.len() as f32;
        let before = unpinned.len();
        unpinned.retain(|&i| {
            let min = children[i].min_along;
            if min > estimate {
                lengths[i] = min;
                pool -= min;
                false
            } else {
                true
            }
        });
        if unpinned.len() == before {
            for &i in &unpinned {
                lengths[i] = estimate;
                pool -= estimate;
            }
            break;
        }
    }
    pool
}

/// Lay out resolved lengths under a gap policy.
fn distribute(lengths: &[f32], start: f32, leftover: f32, align: Align) -> Vec<Span> {
    let n = lengths.len();
    #[allow(clippy::cast_precision_loss)]
    let count = n as f32;
    let (mut cursor, gap) = match align {
        Align::Before => (start, 0.0),
        Align::After => (start + leftover, 0.0),
        Align::Center => (start + leftover / 2.0, 0.0),
        Align::Distribute => {
            let gap = leftover / (count + 1.0);
            (start + gap, gap)
        }
        Align::Justify | Align::Proportional => {
            let gap = if leftover >= 0.0 && n > 1 {
                leftover / (count - 1.0)
            } else {
                0.0
            };
            (start, gap)
        }
    };
    lengths
        .iter()
        .map(|&length| {
            let span = Span {
                offset: cursor,
                length,
            };
            cursor += length + gap;
            span
        })
        .collect()
}

/// Intrinsic minimum of a distributing container, as `(along, across)`.
///
/// `children` pairs each child's sizing policy with its minimum
/// `(along, across)`. Percentage children claim a fraction of the along
/// extent; the fixed part is grown so that fraction is still available.
#[must_use]
pub fn min_extent(children: &[(Length, f32, f32)]) -> (f32, f32) {
    let mut along = 0.0_f32;
    let mut across = 0.0_f32;
    let mut unclaimed = 1.0_f32;
    for &(length, min_along, min_across) in children {
        match length {
            Length::Auto | Length::Min => along += min_along,
            Length::Pixels(px) => along += px,
            Length::Percent(pct) => unclaimed -= pct / 100.0,
        }
        across = across.max(min_across);
    }
    if unclaimed > 0.0 {
        along /= unclaimed;
    }
    (along, across)
}
