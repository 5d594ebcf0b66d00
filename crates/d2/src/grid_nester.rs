//! Grid-sweep first-fit nester.
//!
//! Instances are processed largest net area first. For each instance every
//! allowed rotation is tried in order; within a rotation, candidate
//! translations are swept row-major (`y` outer, `x` inner) at the grid step
//! starting from the origin. The first candidate that stays inside the plate
//! margin and clears every committed placement is taken.
//!
//! What "clears" means is decided by a [`PlacementArena`]: [`ExactArena`]
//! runs the exact contour-set predicate behind an R*-tree broad phase, while
//! [`OccupancyGrid`] answers from a coarse cell map.

use crate::contour::Contour;
use crate::intersect::contour_sets_collide;
use crate::occupancy::OccupancyGrid;
use crate::part::{Part, PreparedShape, ResolvedRotations};
use crate::plate::Plate;
use crate::spatial_index::SpatialIndex2D;
use log::debug;
use rayon::prelude::*;
use sheetnest_core::{AxisAlignedBox, Config, NestingResult, Placement, Point2D, Result, UnplacedPart};

/// Slack for bounding boxes sitting exactly on the usable plate edge.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Committed placements as seen by the candidate search.
pub trait PlacementArena {
    /// Returns true if `shape` translated by `translation` keeps `spacing`
    /// from everything committed so far.
    fn fits(&self, shape: &PreparedShape, translation: Point2D, spacing: f64) -> bool;

    /// Records `shape` at `translation` as committed.
    fn commit(&mut self, shape: &PreparedShape, translation: Point2D);
}

/// Append-only arena of placed contour sets with a spatial index.
#[derive(Debug, Default)]
pub struct ExactArena {
    placed: Vec<Vec<Contour>>,
    index: SpatialIndex2D,
}

impl ExactArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed placements.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl PlacementArena for ExactArena {
    fn fits(&self, shape: &PreparedShape, translation: Point2D, spacing: f64) -> bool {
        let bounds = shape.bounds_at(translation);
        let hits = self.index.potential_collisions(&bounds, spacing);
        if hits.is_empty() {
            return true;
        }
        let candidate = shape.placed_contours(translation);
        !hits
            .into_iter()
            .any(|i| contour_sets_collide(&self.placed[i], &candidate, spacing))
    }

    fn commit(&mut self, shape: &PreparedShape, translation: Point2D) {
        let index = self.placed.len();
        self.index.insert(index, shape.bounds_at(translation));
        self.placed.push(shape.placed_contours(translation));
    }
}

/// One copy of a part awaiting placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PartInstance {
    pub part_index: usize,
    pub instance: usize,
    pub mirrored: bool,
}

/// Expands parts into instances in input order. With mirroring enabled, odd
/// copy indices are mirrored.
pub(crate) fn expand_instances(parts: &[Part], allow_mirror: bool) -> Vec<PartInstance> {
    parts
        .iter()
        .enumerate()
        .flat_map(|(part_index, part)| {
            (0..part.quantity()).map(move |instance| PartInstance {
                part_index,
                instance,
                mirrored: allow_mirror && instance % 2 == 1,
            })
        })
        .collect()
}

/// Pre-transformed shapes of one part, per mirror state and rotation.
struct ShapeSet {
    plain: Vec<PreparedShape>,
    mirrored: Vec<PreparedShape>,
}

impl ShapeSet {
    fn build(part: &Part, config: &Config) -> Result<Self> {
        let rotations = ResolvedRotations::resolve(part, config);
        let prepare_all = |mirrored: bool| -> Result<Vec<PreparedShape>> {
            rotations
                .angles()
                .iter()
                .map(|&angle| part.prepare(angle, mirrored))
                .collect()
        };
        let plain = prepare_all(false)?;
        let mirrored = if config.allow_mirror && part.quantity() > 1 {
            prepare_all(true)?
        } else {
            Vec::new()
        };
        Ok(Self { plain, mirrored })
    }

    fn shapes(&self, mirrored: bool) -> &[PreparedShape] {
        if mirrored {
            &self.mirrored
        } else {
            &self.plain
        }
    }
}

/// Inclusive range of grid indices `i` such that `i * step + local_min >= lo`
/// and `i * step + local_max <= hi`.
fn index_range(local_min: f64, local_max: f64, lo: f64, hi: f64, step: f64) -> Option<(u64, u64)> {
    let first = ((lo - local_min - BOUNDARY_TOLERANCE) / step).ceil().max(0.0);
    let last = ((hi - local_max + BOUNDARY_TOLERANCE) / step).floor();
    (last >= first && last.is_finite()).then_some((first as u64, last as u64))
}

/// First collision-free translation for `shape`, in row-major order.
fn first_fit<A: PlacementArena>(
    arena: &A,
    shape: &PreparedShape,
    usable: &AxisAlignedBox,
    step: f64,
    spacing: f64,
) -> Option<Point2D> {
    let local = shape.local_bounds();
    let (ix0, ix1) = index_range(local.min_x, local.max_x, usable.min_x, usable.max_x, step)?;
    let (iy0, iy1) = index_range(local.min_y, local.max_y, usable.min_y, usable.max_y, step)?;
    let allowed = usable.inflate(BOUNDARY_TOLERANCE);

    for iy in iy0..=iy1 {
        for ix in ix0..=ix1 {
            let translation = Point2D::new(ix as f64 * step, iy as f64 * step);
            if !allowed.contains_box(&shape.bounds_at(translation)) {
                continue;
            }
            if arena.fits(shape, translation, spacing) {
                return Some(translation);
            }
        }
    }
    None
}

/// Tries every rotation in order and returns the first that fits with its
/// translation. The parallel path evaluates all rotations concurrently and
/// keeps the lowest-index success, which matches the sequential order.
fn search<A: PlacementArena + Sync>(
    arena: &A,
    shapes: &[PreparedShape],
    usable: &AxisAlignedBox,
    config: &Config,
) -> Option<(usize, Point2D)> {
    let step = config.grid_step;
    let spacing = config.spacing();

    if config.parallel && shapes.len() > 1 {
        shapes
            .par_iter()
            .enumerate()
            .filter_map(|(i, shape)| first_fit(arena, shape, usable, step, spacing).map(|t| (i, t)))
            .min_by_key(|(i, _)| *i)
    } else {
        shapes
            .iter()
            .enumerate()
            .find_map(|(i, shape)| first_fit(arena, shape, usable, step, spacing).map(|t| (i, t)))
    }
}

/// Runs the sweep with the given arena.
pub fn sweep_nest<A: PlacementArena + Sync>(
    parts: &[Part],
    plate: &Plate,
    config: &Config,
    mut arena: A,
) -> Result<NestingResult> {
    let shape_sets = parts
        .iter()
        .map(|part| ShapeSet::build(part, config))
        .collect::<Result<Vec<_>>>()?;

    let mut instances = expand_instances(parts, config.allow_mirror);
    instances.sort_by(|a, b| {
        parts[b.part_index]
            .net_area()
            .total_cmp(&parts[a.part_index].net_area())
    });

    let usable = plate.usable_bounds(config.spacing());
    let mut result = NestingResult::new();

    for inst in instances {
        let part = &parts[inst.part_index];
        let shapes = shape_sets[inst.part_index].shapes(inst.mirrored);
        let found = usable
            .as_ref()
            .and_then(|usable| search(&arena, shapes, usable, config));

        match found {
            Some((rotation_idx, translation)) => {
                let shape = &shapes[rotation_idx];
                arena.commit(shape, translation);
                let placement = Placement::new(
                    inst.part_index,
                    part.name(),
                    inst.instance,
                    translation,
                    shape.rotation_deg(),
                    shape.bounds_at(translation),
                )
                .with_mirrored(inst.mirrored);
                debug!(
                    "placed {}#{} at ({:.3}, {:.3}) rotation {}{}",
                    part.name(),
                    inst.instance,
                    translation.x,
                    translation.y,
                    shape.rotation_deg(),
                    if inst.mirrored { " mirrored" } else { "" }
                );
                result.placements.push(placement);
            }
            None => result.unplaced.push(UnplacedPart {
                part_index: inst.part_index,
                part_name: part.name().to_string(),
                instance: inst.instance,
            }),
        }
    }

    Ok(result)
}

/// Grid sweep with exact polygon collision.
pub fn nest_exact(parts: &[Part], plate: &Plate, config: &Config) -> Result<NestingResult> {
    sweep_nest(parts, plate, config, ExactArena::new())
}

/// Grid sweep against a cell-occupancy map.
pub fn nest_occupancy(parts: &[Part], plate: &Plate, config: &Config) -> Result<NestingResult> {
    let grid = OccupancyGrid::new(plate.width(), plate.height(), config.grid_step);
    sweep_nest(parts, plate, config, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersect::intersects;

    fn plate(w: f64, h: f64) -> Plate {
        Plate::new(w, h).unwrap()
    }

    #[test]
    fn test_index_range() {
        assert_eq!(index_range(0.0, 10.0, 0.0, 100.0, 1.0), Some((0, 90)));
        assert_eq!(index_range(0.0, 10.0, 2.0, 98.0, 5.0), Some((1, 17)));
        assert_eq!(index_range(-4.0, 0.0, 0.0, 10.0, 1.0), Some((4, 10)));
        assert_eq!(index_range(0.0, 20.0, 0.0, 10.0, 1.0), None);
    }

    #[test]
    fn test_expand_instances_mirror_alternates() {
        let parts = vec![Part::rectangle("A", 1.0, 1.0).with_quantity(3)];
        let mirrored: Vec<bool> = expand_instances(&parts, true)
            .iter()
            .map(|i| i.mirrored)
            .collect();
        assert_eq!(mirrored, vec![false, true, false]);
        assert!(expand_instances(&parts, false).iter().all(|i| !i.mirrored));
    }

    #[test]
    fn test_first_instance_at_origin() {
        let parts = vec![Part::rectangle("A", 10.0, 5.0)];
        let result = nest_exact(&parts, &plate(100.0, 100.0), &Config::new()).unwrap();
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].translation, Point2D::new(0.0, 0.0));
        assert_eq!(
            result.placements[0].bounds,
            AxisAlignedBox::new(0.0, 0.0, 10.0, 5.0)
        );
    }

    #[test]
    fn test_row_major_first_fit() {
        let parts = vec![Part::rectangle("A", 4.0, 4.0).with_quantity(3)];
        let result = nest_exact(&parts, &plate(10.0, 10.0), &Config::new()).unwrap();
        let translations: Vec<Point2D> = result.placements.iter().map(|p| p.translation).collect();
        assert_eq!(
            translations,
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(4.0, 0.0),
                Point2D::new(0.0, 4.0)
            ]
        );
    }

    #[test]
    fn test_largest_area_first() {
        let parts = vec![
            Part::rectangle("small", 2.0, 2.0),
            Part::rectangle("big", 5.0, 5.0),
        ];
        let result = nest_exact(&parts, &plate(20.0, 20.0), &Config::new()).unwrap();
        assert_eq!(result.placements[0].part_name, "big");
        assert_eq!(result.placements[1].part_name, "small");
        assert_eq!(result.placements[1].translation, Point2D::new(5.0, 0.0));
    }

    #[test]
    fn test_margin_keeps_parts_off_the_edge() {
        let parts = vec![Part::rectangle("A", 5.0, 5.0).with_quantity(2)];
        let config = Config::new().with_clearance(1.0).with_kerf(1.0);
        let result = nest_exact(&parts, &plate(20.0, 10.0), &config).unwrap();
        assert_eq!(result.placements[0].translation, Point2D::new(2.0, 2.0));
        assert_eq!(result.placements[1].translation, Point2D::new(9.0, 2.0));
    }

    #[test]
    fn test_rotation_needed_to_fit() {
        let parts = vec![Part::rectangle("tall", 2.0, 8.0).with_rotation_step(90.0)];
        let result = nest_exact(&parts, &plate(10.0, 4.0), &Config::new()).unwrap();
        assert!(result.all_placed());
        let p = &result.placements[0];
        assert_eq!(p.rotation_deg, 90.0);
        assert!(plate(10.0, 4.0).bounds().contains_box(&p.bounds));
    }

    #[test]
    fn test_unplaced_when_too_big() {
        let parts = vec![Part::rectangle("huge", 50.0, 50.0).with_quantity(2)];
        let result = nest_exact(&parts, &plate(20.0, 20.0), &Config::new()).unwrap();
        assert!(result.placements.is_empty());
        assert_eq!(result.unplaced.len(), 2);
        assert_eq!(result.unplaced[1].instance, 1);
    }

    #[test]
    fn test_part_nests_inside_frame_hole() {
        let frame = Part::rectangle("frame", 10.0, 10.0).with_contour(Contour::from_tuples(
            &[(2.0, 2.0), (2.0, 8.0), (8.0, 8.0), (8.0, 2.0)],
            false,
        ));
        let block = Part::rectangle("block", 4.0, 4.0);
        let result = nest_exact(&[frame, block], &plate(10.0, 10.0), &Config::new()).unwrap();
        assert!(result.all_placed());
        let b = result.placements[1].bounds;
        assert!(AxisAlignedBox::new(2.0, 2.0, 8.0, 8.0).contains_box(&b));
    }

    #[test]
    fn test_l_shapes_do_not_overlap() {
        let parts = vec![Part::l_shape("L", 6.0, 6.0, 2.0, 2.0).with_quantity(4)];
        let plate = plate(20.0, 20.0);
        let result = nest_exact(&parts, &plate, &Config::new()).unwrap();
        assert!(result.all_placed());

        let world: Vec<Vec<Contour>> = result
            .placements
            .iter()
            .map(|p| parts[0].world_contours(p).unwrap())
            .collect();
        for i in 0..world.len() {
            for j in (i + 1)..world.len() {
                assert!(!intersects(world[i][0].vertices(), world[j][0].vertices()));
            }
        }
        // Touching the first L's right edge.
        assert_eq!(result.placements[1].translation, Point2D::new(6.0, 0.0));
    }

    #[test]
    fn test_l_shape_tucks_into_notch() {
        let parts = vec![Part::l_shape("L", 6.0, 6.0, 2.0, 2.0).with_quantity(2)];
        let result = nest_exact(&parts, &plate(8.0, 20.0), &Config::new()).unwrap();
        assert!(result.all_placed());
        assert_eq!(result.placements[1].translation, Point2D::new(2.0, 2.0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parts = vec![
            Part::l_shape("L", 7.0, 5.0, 3.0, 2.0)
                .with_quantity(5)
                .with_rotation_step(90.0),
            Part::rectangle("R", 3.0, 9.0)
                .with_quantity(3)
                .with_rotation_step(90.0),
        ];
        let plate = plate(25.0, 18.0);
        let config = Config::new().with_clearance(0.5).with_mirror(true);

        let sequential = nest_exact(&parts, &plate, &config).unwrap();
        let parallel = nest_exact(&parts, &plate, &config.clone().with_parallel(true)).unwrap();
        assert_eq!(sequential.placements, parallel.placements);
        assert_eq!(sequential.unplaced, parallel.unplaced);
    }

    #[test]
    fn test_occupancy_variant() {
        let parts = vec![Part::rectangle("A", 4.0, 4.0).with_quantity(5)];
        let result = nest_occupancy(&parts, &plate(10.0, 10.0), &Config::new()).unwrap();
        assert_eq!(result.placements.len(), 4);
        assert_eq!(result.unplaced.len(), 1);
        for (i, a) in result.placements.iter().enumerate() {
            for b in &result.placements[i + 1..] {
                assert!(!a.bounds.intersects(&b.bounds));
            }
        }
    }

    #[test]
    fn test_occupancy_respects_spacing() {
        let parts = vec![Part::rectangle("A", 4.0, 4.0).with_quantity(2)];
        let config = Config::new().with_clearance(1.0);
        let result = nest_occupancy(&parts, &plate(20.0, 10.0), &config).unwrap();
        assert_eq!(result.placements[0].translation, Point2D::new(1.0, 1.0));
        assert_eq!(result.placements[1].translation, Point2D::new(6.0, 1.0));
    }

    #[test]
    fn test_small_parts_are_not_stacked() {
        let parts = vec![Part::rectangle("tiny", 0.005, 0.005).with_quantity(3)];
        let config = Config::new().with_grid_step(0.001);
        let result = nest_exact(&parts, &plate(0.006, 0.006), &config).unwrap();
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.unplaced.len(), 2);
    }

    #[test]
    fn test_small_parts_touch_without_overlap() {
        let parts = vec![Part::rectangle("tiny", 0.004, 0.004).with_quantity(3)];
        let config = Config::new().with_grid_step(0.001);
        let result = nest_exact(&parts, &plate(0.008, 0.004), &config).unwrap();
        assert_eq!(result.placements.len(), 2);
        assert_eq!(result.unplaced.len(), 1);
        assert!(result.placements[1]
            .translation
            .approx_eq(Point2D::new(0.004, 0.0), 1e-12));

        let a = parts[0].world_contours(&result.placements[0]).unwrap();
        let b = parts[0].world_contours(&result.placements[1]).unwrap();
        assert!(!intersects(a[0].vertices(), b[0].vertices()));
    }
}
