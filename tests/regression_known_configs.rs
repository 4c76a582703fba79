//! Regression tests over small fixed point configurations with known meshes.

use tinmesh::prelude::*;

/// Canonical form of the mesh: per triangle the sorted corner coordinates,
/// sorted over triangles, so meshes can be compared across insertion orders.
fn canonical_triangles(tin: &DelaunayTriangulation) -> Vec<Vec<(f64, f64)>> {
    let mut all: Vec<Vec<(f64, f64)>> = tin
        .triangles()
        .unwrap()
        .into_iter()
        .map(|key| {
            let mut corners: Vec<(f64, f64)> = tin
                .get_triangle(key)
                .unwrap()
                .iter()
                .map(|p| (p.x, p.y))
                .collect();
            corners.sort_by(|l, r| l.partial_cmp(r).unwrap());
            corners
        })
        .collect();
    all.sort_by(|l, r| l.partial_cmp(r).unwrap());
    all
}

#[test]
fn kite_quad_keeps_the_delaunay_diagonal() {
    let mut tin = DelaunayTriangulation::new();
    for p in [
        point!(0.0, 1.0),
        point!(2.0, 0.0),
        point!(4.0, 1.0),
        point!(2.0, 2.0),
    ] {
        tin.insert(p).unwrap();
    }
    assert_eq!(tin.number_of_triangles(), 2);
    assert_eq!(tin.convex_hull_size(), 4);
    // The circumcircle of ((0,1),(2,0),(4,1)) contains (2,2), so the shared
    // edge must be (2,0)-(2,2), never (0,1)-(4,1).
    for key in tin.triangles().unwrap() {
        let corners = tin.get_triangle(key).unwrap();
        assert!(corners.iter().any(|p| p.same_xy(&point!(2.0, 0.0))));
        assert!(corners.iter().any(|p| p.same_xy(&point!(2.0, 2.0))));
    }
}

#[test]
fn collinear_points_make_no_triangles_until_promoted() {
    let mut tin = DelaunayTriangulation::new();
    for x in [0.0, 1.0, 2.0] {
        tin.insert(point!(x, 0.0)).unwrap();
    }
    assert_eq!(tin.number_of_triangles(), 0);
    assert_eq!(tin.triangulate(
        &[point!(0.0, 0.0), point!(1.0, 0.0), point!(2.0, 0.0)]).unwrap(),
        Vec::new()
    );

    let mut tin = DelaunayTriangulation::new();
    for x in [0.0, 1.0, 2.0] {
        tin.insert(point!(x, 0.0)).unwrap();
    }
    tin.insert(point!(1.0, 1.0)).unwrap();
    assert_eq!(tin.number_of_triangles(), 2);
}

#[test]
fn containment_and_far_points() {
    let mut tin = DelaunayTriangulation::new();
    assert!(!tin.contains(&point!(0.0, 0.0)));
    for p in [point!(0.0, 0.0), point!(4.0, 0.0), point!(2.0, 3.0)] {
        tin.insert(p).unwrap();
    }
    assert!(tin.contains(&point!(2.0, 1.0)));
    // Corners and edges count as inside.
    assert!(tin.contains(&point!(0.0, 0.0)));
    assert!(tin.contains(&point!(2.0, 0.0)));
    assert!(!tin.contains(&point!(1000.0, 1000.0)));
    assert!(!tin.contains(&point!(-0.001, 0.0)));
}

#[test]
fn duplicate_insertion_is_idempotent() {
    let mut tin = DelaunayTriangulation::new();
    for p in [
        point!(0.0, 0.0, 5.0),
        point!(4.0, 0.0),
        point!(2.0, 3.0),
        point!(2.0, 1.0),
    ] {
        tin.insert(p).unwrap();
    }
    let triangles = canonical_triangles(&tin);
    let counter = tin.update_counter();
    let bb = tin.bounding_box().unwrap();

    // Same planar coordinates, even with a different height, are ignored.
    tin.insert(point!(0.0, 0.0, 99.0)).unwrap();
    tin.insert(point!(2.0, 1.0)).unwrap();
    assert_eq!(tin.number_of_vertices(), 4);
    assert_eq!(tin.update_counter(), counter);
    assert_eq!(tin.bounding_box().unwrap(), bb);
    assert_eq!(canonical_triangles(&tin), triangles);
    assert_eq!(tin.height_at(&point!(0.0, 0.0)).unwrap(), 5.0);
}

#[test]
fn insertion_order_does_not_change_the_mesh() {
    // General position: no four points cocircular.
    let base = [
        point!(0.0, 0.0),
        point!(7.0, 1.0),
        point!(9.0, 6.0),
        point!(3.0, 8.0),
        point!(4.0, 3.0),
        point!(6.0, 5.0),
    ];
    let mut expected = None;
    let orders: Vec<Vec<usize>> = vec![
        vec![0, 1, 2, 3, 4, 5],
        vec![5, 4, 3, 2, 1, 0],
        vec![2, 5, 0, 3, 1, 4],
        vec![4, 0, 5, 1, 3, 2],
    ];
    for order in orders {
        let mut tin = DelaunayTriangulation::new();
        for i in order {
            tin.insert(base[i]).unwrap();
        }
        let triangles = canonical_triangles(&tin);
        match &expected {
            None => expected = Some(triangles),
            Some(first) => assert_eq!(&triangles, first),
        }
    }
}

#[test]
fn height_interpolation_on_a_sloped_plane() {
    // z = x + 2y over a square: every interpolated value must match.
    let mut tin = DelaunayTriangulation::new();
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (4.0, 6.0)] {
        tin.insert(point!(x, y, x + 2.0 * y)).unwrap();
    }
    for (x, y) in [(5.0, 5.0), (1.0, 1.0), (9.0, 2.0), (4.0, 6.0), (0.0, 0.0)] {
        let h = tin.height_at(&point!(x, y)).unwrap();
        assert!((h - (x + 2.0 * y)).abs() < 1e-9, "height at ({x}, {y}) was {h}");
    }
    assert_eq!(
        tin.height_at(&point!(-5.0, -5.0)).unwrap_err(),
        QueryError::OutsideHull
    );
}

#[test]
fn queries_on_an_empty_or_degenerate_mesh_fail_cleanly() {
    let tin = DelaunayTriangulation::new();
    assert_eq!(
        tin.locate(&point!(0.0, 0.0)).unwrap_err(),
        QueryError::EmptyTriangulation
    );
    assert_eq!(
        tin.nearest_existing_point(&point!(0.0, 0.0)).unwrap_err(),
        QueryError::EmptyTriangulation
    );

    let mut tin = DelaunayTriangulation::new();
    tin.insert(point!(0.0, 0.0)).unwrap();
    tin.insert(point!(5.0, 0.0)).unwrap();
    assert_eq!(
        tin.height_at(&point!(1.0, 0.0)).unwrap_err(),
        QueryError::EmptyTriangulation
    );
    // Nearest point still answers from the buffered set.
    let nearest = tin.nearest_existing_point(&point!(4.0, 1.0)).unwrap();
    assert!(nearest.same_xy(&point!(5.0, 0.0)));
}

#[test]
fn triangulate_rebuilds_and_enumerates() {
    let pts = [
        point!(0.0, 0.0),
        point!(8.0, 0.0),
        point!(8.0, 8.0),
        point!(0.0, 8.0),
        point!(3.0, 5.0),
    ];
    let mut tin = DelaunayTriangulation::new();
    let keys = tin.triangulate(&pts).unwrap();
    assert_eq!(keys.len(), tin.number_of_triangles());
    assert_eq!(keys.len(), 4);
    // A rebuild over the same input discards the previous mesh.
    let keys = tin.triangulate(&pts[..3]).unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(tin.number_of_vertices(), 3);
}

#[test]
fn nearest_existing_point_prefers_the_true_corner() {
    let mut tin = DelaunayTriangulation::new();
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)] {
        tin.insert(point!(x, y)).unwrap();
    }
    let nearest = tin.nearest_existing_point(&point!(4.0, 4.0)).unwrap();
    assert!(nearest.same_xy(&point!(5.0, 5.0)));
    let nearest = tin.nearest_existing_point(&point!(9.0, 1.0)).unwrap();
    assert!(nearest.same_xy(&point!(10.0, 0.0)));
}

#[test]
fn bounding_box_tracks_all_axes() {
    let mut tin = DelaunayTriangulation::new();
    assert!(tin.bounding_box().is_none());
    for p in [point!(1.0, 2.0, 3.0), point!(-4.0, 7.0, 0.5), point!(2.0, -1.0, 9.0)] {
        tin.insert(p).unwrap();
    }
    let bb = tin.bounding_box().unwrap();
    assert_eq!((bb.min.x, bb.min.y, bb.min.z), (-4.0, -1.0, 0.5));
    assert_eq!((bb.max.x, bb.max.y, bb.max.z), (2.0, 7.0, 9.0));
}

#[test]
fn collinear_chain_hull_lists_each_point_once() {
    // Interior chain points sit on both sides of the halfplane ring; the
    // walk must still report each of them a single time.
    let mut tin = DelaunayTriangulation::new();
    for x in [0.0, 1.0, 2.0] {
        tin.insert(point!(x, 0.0)).unwrap();
    }
    let hull: Vec<Point> = tin.convex_hull_vertices().collect();
    assert_eq!(hull.len(), 3);
    assert_eq!(tin.convex_hull_size(), 3);
    for x in [0.0, 1.0, 2.0] {
        assert_eq!(
            hull.iter().filter(|p| p.same_xy(&point!(x, 0.0))).count(),
            1
        );
    }
}

#[test]
fn convex_hull_walk_yields_each_vertex_once() {
    let mut tin = DelaunayTriangulation::new();
    for (x, y) in [(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0), (3.0, 3.0), (2.0, 4.0)] {
        tin.insert(point!(x, y)).unwrap();
    }
    let hull: Vec<Point> = tin.convex_hull_vertices().collect();
    assert_eq!(hull.len(), 4);
    assert_eq!(hull.len(), tin.convex_hull_size());
    for expected in [(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)] {
        assert_eq!(
            hull.iter()
                .filter(|p| p.same_xy(&point!(expected.0, expected.1)))
                .count(),
            1
        );
    }
}
