// argus_core/src/geometry/bounds.rs

use num_traits::Float;

/// Tests whether the ball of squared radius `squared_radius` around `point`
/// intersects the axis-aligned box `[bounds_min, bounds_max]`.
///
/// This is the pruning test of a k-d tree search: per axis the point either
/// lies inside the slab between the two faces and contributes nothing, or it
/// contributes the squared distance to the nearer face. The search stops as
/// soon as the accumulated distance reaches the squared radius.
///
/// Boundary behaviour: the per-axis slab test is inclusive, so a point on
/// the box surface intersects even with a zero radius. The accumulated
/// distance must stay strictly below `squared_radius`, so a ball that only
/// touches the box from outside does not intersect.
///
/// # Panics
/// If the three slices do not have the same length.
pub fn bounds_intersect_ball<T: Float>(
    point: &[T],
    squared_radius: T,
    bounds_min: &[T],
    bounds_max: &[T],
) -> bool {
    assert_eq!(point.len(), bounds_min.len(), "point and bounds_min differ in dimension");
    assert_eq!(point.len(), bounds_max.len(), "point and bounds_max differ in dimension");

    let mut sum = T::zero();
    for ((&p, &lo), &hi) in point.iter().zip(bounds_min).zip(bounds_max) {
        let dist_lo = (p - lo) * (p - lo);
        let dist_hi = (p - hi) * (p - hi);
        let width = (hi - lo) * (hi - lo);

        // Within the slab: neither face is farther away than the slab is wide.
        if dist_lo <= width && dist_hi <= width {
            continue;
        }

        sum = sum + dist_lo.min(dist_hi);
        if sum >= squared_radius {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: [f64; 3] = [0.0, 0.0, 0.0];
    const MAX: [f64; 3] = [2.0, 4.0, 6.0];

    #[test]
    fn centre_with_zero_radius_intersects() {
        assert!(bounds_intersect_ball(&[1.0, 2.0, 3.0], 0.0, &MIN, &MAX));
    }

    #[test]
    fn point_on_a_face_with_zero_radius_intersects() {
        assert!(bounds_intersect_ball(&[2.0, 2.0, 3.0], 0.0, &MIN, &MAX));
        assert!(bounds_intersect_ball(&[0.0, 0.0, 0.0], 0.0, &MIN, &MAX));
    }

    #[test]
    fn ball_short_of_the_box_does_not_intersect() {
        // Nearest point is the corner (2, 4, 6): squared distance 1 + 4 + 9 = 14.
        let point = [3.0, 6.0, 9.0];
        assert!(!bounds_intersect_ball(&point, 13.0, &MIN, &MAX));
        assert!(!bounds_intersect_ball(&point, 1.0, &MIN, &MAX));
        assert!(bounds_intersect_ball(&point, 14.5, &MIN, &MAX));
    }

    #[test]
    fn exact_tangency_from_outside_is_exclusive() {
        let point = [3.0, 6.0, 9.0];
        // Squared radius equal to the squared corner distance.
        assert!(!bounds_intersect_ball(&point, 14.0, &MIN, &MAX));
        // Face tangency along a single axis behaves the same way.
        assert!(!bounds_intersect_ball(&[5.0, 2.0, 3.0], 9.0, &MIN, &MAX));
        assert!(bounds_intersect_ball(&[5.0, 2.0, 3.0], 9.0 + 1e-9, &MIN, &MAX));
    }

    #[test]
    fn far_point_in_one_slab_is_judged_by_the_other_axes() {
        // Inside the x and z slabs, 1 unit below the y range.
        assert!(bounds_intersect_ball(&[1.0, -1.0, 3.0], 1.5, &MIN, &MAX));
        assert!(!bounds_intersect_ball(&[1.0, -1.0, 3.0], 0.5, &MIN, &MAX));
    }

    #[test]
    fn result_is_invariant_under_axis_permutation() {
        let points = [[3.0, 6.0, 9.0], [-1.0, 2.0, 7.0], [1.0, -3.0, 3.0], [5.0, 5.0, -2.0]];
        let radii = [0.0, 1.0, 4.0, 9.0, 14.0, 20.0, 50.0];
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for point in &points {
            for &r2 in &radii {
                let reference = bounds_intersect_ball(point, r2, &MIN, &MAX);
                for perm in &permutations {
                    let p: Vec<f64> = perm.iter().map(|&i| point[i]).collect();
                    let lo: Vec<f64> = perm.iter().map(|&i| MIN[i]).collect();
                    let hi: Vec<f64> = perm.iter().map(|&i| MAX[i]).collect();
                    assert_eq!(bounds_intersect_ball(&p, r2, &lo, &hi), reference);
                }
            }
        }
    }

    #[test]
    fn works_for_single_precision() {
        let lo = [0.0f32, 0.0];
        let hi = [1.0f32, 1.0];
        assert!(bounds_intersect_ball(&[1.5f32, 0.5], 0.5, &lo, &hi));
        assert!(!bounds_intersect_ball(&[1.5f32, 1.5], 0.4, &lo, &hi));
    }

    #[test]
    #[should_panic]
    fn mismatched_dimensions_panic() {
        bounds_intersect_ball(&[0.0, 0.0], 1.0, &[0.0], &[1.0]);
    }
}
