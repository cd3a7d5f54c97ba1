use crate::core::pipeline::Interpolatable;
use nalgebra::Point3;

/// `a + (b - a) * t`, written so that t = 0 and t = 1 return the endpoints exactly.
#[inline(always)]
pub fn lerp<T: Interpolatable>(a: T, b: T, t: f32) -> T {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a * (1.0 - t) + b * t
    }
}

/// Twice the signed screen area of (p0, p1, p2), looking only at x and y.
///
/// With y growing downward, a triangle wound clockwise on screen is positive.
#[inline]
pub fn signed_area(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> f32 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Orders three items top to bottom by `y`, ties broken by `x`.
pub fn sort_by_y<T, F>(items: &mut [T; 3], key: F)
where
    F: Fn(&T) -> (f32, f32),
{
    let before = |a: &T, b: &T| {
        let (ax, ay) = key(a);
        let (bx, by) = key(b);
        ay < by || (ay == by && ax < bx)
    };
    if before(&items[1], &items[0]) {
        items.swap(0, 1);
    }
    if before(&items[2], &items[1]) {
        items.swap(1, 2);
    }
    if before(&items[1], &items[0]) {
        items.swap(0, 1);
    }
}

/// Parameter where the segment a..b crosses `y`; 0 for horizontal segments.
#[inline]
pub fn edge_t(a_y: f32, b_y: f32, y: f32) -> f32 {
    let dy = b_y - a_y;
    if dy.abs() < f32::EPSILON {
        0.0
    } else {
        (y - a_y) / dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_exactly() {
        assert_eq!(lerp(3.0_f32, 7.0, 0.0), 3.0);
        assert_eq!(lerp(3.0_f32, 7.0, 1.0), 7.0);
        assert!((lerp(3.0_f32, 7.0, 0.25) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn sorting_orders_by_y_then_x() {
        let mut pts = [(5.0, 2.0), (1.0, 0.0), (0.0, 2.0)];
        sort_by_y(&mut pts, |p| (p.0, p.1));
        assert_eq!(pts, [(1.0, 0.0), (0.0, 2.0), (5.0, 2.0)]);
    }

    #[test]
    fn clockwise_on_screen_is_positive() {
        let a = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(10.0, 0.0, 1.0);
        let c = Point3::new(0.0, 10.0, 1.0);
        assert!(signed_area(&a, &b, &c) > 0.0);
        assert!(signed_area(&a, &c, &b) < 0.0);
        assert_eq!(signed_area(&a, &a, &c), 0.0);
    }
}
