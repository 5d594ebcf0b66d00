//! Row-based strip nester.
//!
//! Instances are sorted tallest bounding box first and laid out left to right
//! in rows. A row closes when the next instance does not fit in its remaining
//! width; the next row starts one row height plus spacing further up. No
//! rotation and no collision test is needed: rows reserve exact widths and
//! heights.

use crate::grid_nester::expand_instances;
use crate::part::Part;
use crate::plate::Plate;
use log::debug;
use sheetnest_core::{Config, NestingResult, Placement, Point2D, Result, UnplacedPart};

/// Slack for boxes ending exactly on the usable plate edge.
const FIT_TOLERANCE: f64 = 1e-9;

/// Row cursor over the usable plate region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripCursor {
    /// Next free x position in the current row.
    pub x: f64,
    /// Bottom of the current row.
    pub y: f64,
    /// Tallest instance placed in the current row.
    pub row_height: f64,
}

impl StripCursor {
    fn new(margin: f64) -> Self {
        Self {
            x: margin,
            y: margin,
            row_height: 0.0,
        }
    }
}

/// Places instances in shelf rows.
///
/// Every gap, including the one between rows, is `clearance + kerf`, so kerf
/// widens row spacing too.
pub fn nest_strip(parts: &[Part], plate: &Plate, config: &Config) -> Result<NestingResult> {
    let margin = config.spacing();
    let spacing = config.spacing();
    let max_x = plate.width() - margin;
    let max_y = plate.height() - margin;

    let mut instances = expand_instances(parts, config.allow_mirror);
    instances.sort_by(|a, b| {
        let height = |i: usize| parts[i].bounds().map_or(0.0, |bb| bb.height());
        height(b.part_index).total_cmp(&height(a.part_index))
    });

    let mut cursor = StripCursor::new(margin);
    let mut result = NestingResult::new();

    for inst in instances {
        let part = &parts[inst.part_index];
        let shape = part.prepare(0.0, inst.mirrored)?;
        let local = shape.local_bounds();
        let (w, h) = (local.width(), local.height());

        let fits = |x: f64, y: f64| {
            x + w <= max_x + FIT_TOLERANCE && y + h <= max_y + FIT_TOLERANCE
        };
        let row_started = cursor.x > margin || cursor.row_height > 0.0;

        let origin = if fits(cursor.x, cursor.y) {
            Some((cursor.x, cursor.y, false))
        } else if row_started && fits(margin, cursor.y + cursor.row_height + spacing) {
            Some((margin, cursor.y + cursor.row_height + spacing, true))
        } else {
            None
        };

        let Some((x, y, new_row)) = origin else {
            result.unplaced.push(UnplacedPart {
                part_index: inst.part_index,
                part_name: part.name().to_string(),
                instance: inst.instance,
            });
            continue;
        };

        if new_row {
            cursor.row_height = 0.0;
        }
        let translation = Point2D::new(x, y) - local.min();
        let placement = Placement::new(
            inst.part_index,
            part.name(),
            inst.instance,
            translation,
            0.0,
            shape.bounds_at(translation),
        )
        .with_mirrored(inst.mirrored);
        debug!(
            "strip placed {}#{} at ({:.3}, {:.3}){}",
            part.name(),
            inst.instance,
            x,
            y,
            if new_row { " in new row" } else { "" }
        );
        result.placements.push(placement);

        cursor.x = x + w + spacing;
        cursor.y = y;
        cursor.row_height = cursor.row_height.max(h);
    }

    Ok(result)
}
