pub mod buffer;
pub mod general;
pub mod geometry;
pub mod projection;


#[cfg(test)]
mod general_tests {
    use crate::general::*;
    use approx::{assert_relative_eq, assert_ulps_eq};
    use proptest::prelude::*;

    #[test]
    fn test_argsort_ascending() {
        let x: Vec<f64> = vec![3.0, -1.0, 5.0, 8.0, -2.0];
        assert_eq!(argsort(&x, SortOrder::Ascending), vec![4, 1, 0, 2, 3]);
    }
    #[test]
    fn test_argsort_descending() {
        let x: Vec<i32> = vec![3, -1, 5, 8, -2];
        assert_eq!(argsort(&x, SortOrder::Descending), vec![3, 2, 0, 1, 4]);
    }

    #[test]
    fn test_limit() {
        assert_ulps_eq!(limit(4.0, -3.0, 3.0), 3.0);
        assert_ulps_eq!(limit(-4.0, -3.0, 3.0), -3.0);
        assert_ulps_eq!(limit(0.5, -3.0, 3.0), 0.5);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_ulps_eq!(ease_in(2.0, 6.0, 0.0), 2.0);
        assert_ulps_eq!(ease_in(2.0, 6.0, 0.5), 3.0);
        assert_ulps_eq!(ease_in(2.0, 6.0, 1.0), 6.0);
        assert_ulps_eq!(ease_in_out(0.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(ease_in_out(0.0, 10.0, 0.5), 5.0, epsilon = 1e-12);
        assert_relative_eq!(ease_in_out(0.0, 10.0, 1.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exponential_fog() {
        assert_ulps_eq!(exponential_fog(0.0, 5.0), 1.0);
        assert_relative_eq!(exponential_fog(1.0, 5.0), (-5.0_f64).exp(), epsilon = 1e-15);
        assert!(exponential_fog(0.5, 5.0) > exponential_fog(0.6, 5.0));
    }

    #[test]
    fn test_increase_wraps() {
        assert_ulps_eq!(increase(900.0, 200.0, 1000.0), 100.0);
        assert_ulps_eq!(increase(100.0, -300.0, 1000.0), 800.0);
        assert_ulps_eq!(increase(100.0, 2500.0, 1000.0), 600.0);
        assert_ulps_eq!(increase(0.0, 1000.0, 1000.0), 0.0);
        assert_ulps_eq!(increase(5.0, 5.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_remaining() {
        assert_ulps_eq!(percent_remaining(450.0, 200.0), 0.25);
        assert_ulps_eq!(percent_remaining(400.0, 200.0), 0.0);
    }

    #[test]
    fn test_overlap() {
        assert!(overlap(1.5, 0.1, 1.5, 0.1, 1.0));
        assert!(overlap(0.0, 0.4, 0.4, 0.4, 1.0));
        assert!(!overlap(0.0, 0.4, 0.41, 0.4, 1.0));
        assert!(!overlap(-1.0, 0.1, 1.0, 0.1, 1.0));
    }

    proptest! {
        #[test]
        fn prop_increase_stays_in_range(
            start in 0.0f64..450_000.0,
            inc in -2_000_000.0f64..2_000_000.0,
        ) {
            let res = increase(start, inc, 450_000.0);
            prop_assert!((0.0..450_000.0).contains(&res));
        }

        #[test]
        fn prop_limit_stays_in_range(value in -1e9f64..1e9) {
            let res = limit(value, -3.0, 3.0);
            prop_assert!((-3.0..=3.0).contains(&res));
        }
    }
}


#[cfg(test)]
mod projection_tests {
    use crate::geometry::Point3d;
    use crate::projection::{project, Camera, Viewport};
    use approx::assert_ulps_eq;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 600.0,
    };

    #[test]
    fn test_project_centerline() {
        let cam = Camera {
            x: 0.0,
            y: 500.0,
            z: 0.0,
            depth: 1.0,
        };
        let p = project(&Point3d { x: 0.0, y: 0.0, z: 1000.0 }, &cam, &VIEWPORT, 2000.0);
        assert_ulps_eq!(p.screen.scale, 0.001);
        assert_ulps_eq!(p.screen.x, 500.0);
        // 300 - 0.001 * -500 * 300 = 450
        assert_ulps_eq!(p.screen.y, 450.0);
        assert_ulps_eq!(p.screen.w, 1000.0);
        assert_ulps_eq!(p.camera.y, -500.0);
    }

    #[test]
    fn test_project_rounds_to_pixels() {
        let cam = Camera {
            x: 1.0,
            y: 0.0,
            z: 0.0,
            depth: 1.0,
        };
        let p = project(&Point3d { x: 0.0, y: 0.0, z: 3.0 }, &cam, &VIEWPORT, 2000.0);
        assert_ulps_eq!(p.screen.x, (500.0 - 500.0 / 3.0_f64).round());
    }

    #[test]
    fn test_project_camera_plane() {
        let cam = Camera {
            x: 0.0,
            y: 0.0,
            z: 200.0,
            depth: 0.8,
        };
        let p = project(&Point3d { x: 0.0, y: 0.0, z: 200.0 }, &cam, &VIEWPORT, 2000.0);
        assert_ulps_eq!(p.screen.scale, 0.0);
    }
}
