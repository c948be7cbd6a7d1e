//! Horizontal metrics: reading per-glyph entries and rebuilding 'hmtx'/'hhea'.

use write_fonts::{
    read::tables::hmtx::Hmtx as ReadHmtx,
    tables::{
        glyf::Bbox,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
    },
    types::{FWord, GlyphId, UfWord},
};

/// Advance width and left side bearing for a single glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HMetric {
    pub advance: u16,
    pub lsb: i16,
}

/// Returns the metric for `gid`, or `None` if the table has no entry for it.
///
/// Glyphs past `numberOfHMetrics` share the last advance and take their
/// side bearing from the trailing array.
pub(crate) fn metric(hmtx: &ReadHmtx, gid: GlyphId) -> Option<HMetric> {
    Some(HMetric {
        advance: hmtx.advance(gid)?,
        lsb: hmtx.side_bearing(gid)?,
    })
}

/// Compile per-glyph metrics into an 'hmtx' table.
///
/// Trailing glyphs that repeat the final advance are stored as side bearings
/// only. The returned count belongs in `hhea.numberOfHMetrics`.
pub(crate) fn compile_hmtx(metrics: &[HMetric]) -> (Hmtx, u16) {
    let num_long_metrics = num_long_metrics(metrics);
    let (long, short) = metrics.split_at(num_long_metrics);
    let hmtx = Hmtx {
        h_metrics: long
            .iter()
            .map(|m| LongMetric {
                advance: m.advance,
                side_bearing: m.lsb,
            })
            .collect(),
        left_side_bearings: short.iter().map(|m| m.lsb).collect(),
    };
    (hmtx, num_long_metrics as u16)
}

// reference: compute_new_num_h_metrics() in skera's hmtx subsetting
fn num_long_metrics(metrics: &[HMetric]) -> usize {
    let mut num_long_metrics = metrics.len().min(0xFFFF);
    let Some(last_advance) = metrics.get(num_long_metrics.wrapping_sub(1)).map(|m| m.advance)
    else {
        return 0;
    };
    while num_long_metrics > 1 {
        if metrics[num_long_metrics - 2].advance != last_advance {
            break;
        }
        num_long_metrics -= 1;
    }
    num_long_metrics
}

/// Recompute the derived 'hhea' fields.
///
/// `bounds` holds the bounding box of each glyph that has an outline; empty
/// glyphs only contribute to `advanceWidthMax`.
pub(crate) fn update_hhea(
    hhea: &mut Hhea,
    metrics: &[HMetric],
    bounds: &[Option<Bbox>],
    number_of_h_metrics: u16,
) {
    hhea.number_of_h_metrics = number_of_h_metrics;
    let max_adv = metrics.iter().map(|m| m.advance).max().unwrap_or(0);
    hhea.advance_width_max = UfWord::new(max_adv);

    let mut empty = true;
    let mut min_lsb = i16::MAX;
    let mut min_rsb = i16::MAX;
    let mut max_extent = i16::MIN;
    for (metric, bbox) in metrics.iter().zip(bounds) {
        let Some(bbox) = bbox else {
            continue;
        };
        empty = false;
        let width = bbox.x_max as i32 - bbox.x_min as i32;
        let rsb = metric.advance as i32 - metric.lsb as i32 - width;
        let extent = metric.lsb as i32 + width;
        min_lsb = min_lsb.min(metric.lsb);
        min_rsb = min_rsb.min(clamp_i16(rsb));
        max_extent = max_extent.max(clamp_i16(extent));
    }
    if empty {
        hhea.min_left_side_bearing = FWord::new(0);
        hhea.min_right_side_bearing = FWord::new(0);
        hhea.x_max_extent = FWord::new(0);
    } else {
        hhea.min_left_side_bearing = FWord::new(min_lsb);
        hhea.min_right_side_bearing = FWord::new(min_rsb);
        hhea.x_max_extent = FWord::new(max_extent);
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn m(advance: u16, lsb: i16) -> HMetric {
        HMetric { advance, lsb }
    }

    #[test]
    fn trailing_advances_are_collapsed() {
        let metrics = [m(500, 0), m(600, 10), m(600, 20), m(600, 30)];
        let (hmtx, count) = compile_hmtx(&metrics);
        assert_eq!(count, 2);
        assert_eq!(hmtx.h_metrics.len(), 2);
        assert_eq!(hmtx.h_metrics[1].advance, 600);
        assert_eq!(hmtx.h_metrics[1].side_bearing, 10);
        assert_eq!(hmtx.left_side_bearings, vec![20, 30]);
    }

    #[test]
    fn distinct_advances_are_all_long() {
        let metrics = [m(500, 0), m(600, 10), m(700, 20)];
        let (hmtx, count) = compile_hmtx(&metrics);
        assert_eq!(count, 3);
        assert!(hmtx.left_side_bearings.is_empty());
    }

    #[test]
    fn single_glyph() {
        let (hmtx, count) = compile_hmtx(&[m(250, 0)]);
        assert_eq!(count, 1);
        assert_eq!(hmtx.h_metrics.len(), 1);
    }

    #[test]
    fn no_glyphs() {
        let (hmtx, count) = compile_hmtx(&[]);
        assert_eq!(count, 0);
        assert!(hmtx.h_metrics.is_empty());
    }

    #[test]
    fn hhea_extremes() {
        let metrics = [m(600, 50), m(700, 20), m(300, 0)];
        let bounds = [
            Some(Bbox {
                x_min: 50,
                y_min: 0,
                x_max: 550,
                y_max: 700,
            }),
            Some(Bbox {
                x_min: 20,
                y_min: 0,
                x_max: 720,
                y_max: 700,
            }),
            None,
        ];
        let mut hhea = Hhea::default();
        update_hhea(&mut hhea, &metrics, &bounds, 3);
        assert_eq!(hhea.number_of_h_metrics, 3);
        assert_eq!(hhea.advance_width_max, UfWord::new(700));
        assert_eq!(hhea.min_left_side_bearing, FWord::new(20));
        // 700 - 20 - 700
        assert_eq!(hhea.min_right_side_bearing, FWord::new(-20));
        assert_eq!(hhea.x_max_extent, FWord::new(720));
    }
}
