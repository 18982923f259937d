use lot_router::{
    error::ResolveError,
    graphs::{
        road_graph::{Coordinate, RoadGraph, RoadGraphBuilder},
        Graph,
    },
    points::{Point, PointId, PointSet},
    resolver::{nearest_node, resolve, shortest_path},
};

fn portaria() -> PointId {
    PointId::from("portaria")
}

/// The gate and one lot, joined by a single street of weight 100.
fn two_point_scenario() -> (PointSet, RoadGraph) {
    let points = PointSet::new(vec![
        Point::new("portaria", "Portaria", Coordinate::new(0.0, 0.0)),
        Point::new("L1", "Lote 1", Coordinate::new(0.0, 0.01)),
    ])
    .unwrap();

    let mut builder = RoadGraphBuilder::new();
    let gate = builder.add_vertex(Coordinate::new(0.0, 0.0));
    let lot = builder.add_vertex(Coordinate::new(0.0, 0.01));
    builder.add_edge_bidirectional(gate, lot, 100);

    (points, builder.build())
}

/// A 5x5 street grid with lots scattered next to it.
fn grid_scenario() -> (PointSet, RoadGraph) {
    let mut builder = RoadGraphBuilder::new();
    let spacing = 0.001;
    let vertex = |row: u32, column: u32| row * 5 + column;
    for row in 0..5 {
        for column in 0..5 {
            builder.add_vertex(Coordinate::new(
                row as f64 * spacing,
                column as f64 * spacing,
            ));
        }
    }
    for row in 0..5 {
        for column in 0..5 {
            if column + 1 < 5 {
                builder.add_segment(vertex(row, column), vertex(row, column + 1), true);
            }
            if row + 1 < 5 {
                // northbound one-way avenues
                builder.add_segment(vertex(row, column), vertex(row + 1, column), column % 2 == 0);
            }
        }
    }

    let mut points = vec![Point::new(
        "portaria",
        "Portaria",
        Coordinate::new(-0.0001, 0.0001),
    )];
    for lot in 1..=10u32 {
        let row = (lot * 7 % 5) as f64;
        let column = (lot * 3 % 5) as f64;
        points.push(Point::new(
            PointId::lot(lot),
            format!("Lote {}", lot),
            Coordinate::new(row * spacing + 0.0002, column * spacing - 0.0001),
        ));
    }

    (PointSet::new(points).unwrap(), builder.build())
}

#[test]
fn resolves_single_street() {
    let (points, graph) = two_point_scenario();

    let route = resolve(&points, &graph, &portaria(), &PointId::from("L1")).unwrap();

    assert_eq!(route.vertices.len(), 2);
    assert_eq!(route.distance, 100);
    assert_eq!(
        route.coordinates,
        vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)]
    );
    assert_eq!(route.origin, portaria());
    assert_eq!(route.destination, PointId::from("L1"));
}

#[test]
fn missing_destination_is_point_not_found() {
    let (points, graph) = two_point_scenario();

    let error = resolve(&points, &graph, &portaria(), &PointId::from("missing_id")).unwrap_err();

    assert!(matches!(error, ResolveError::PointNotFound { id } if id.as_str() == "missing_id"));
}

#[test]
fn missing_origin_is_point_not_found() {
    let (points, graph) = two_point_scenario();

    let error = resolve(&points, &graph, &PointId::from("gate"), &PointId::from("L1")).unwrap_err();

    assert!(matches!(error, ResolveError::PointNotFound { id } if id.as_str() == "gate"));
}

#[test]
fn disconnected_components_are_no_path() {
    let points = PointSet::new(vec![
        Point::new("portaria", "Portaria", Coordinate::new(0.0, 0.0)),
        Point::new("L2", "Lote 2", Coordinate::new(0.01, 0.01)),
    ])
    .unwrap();
    let mut builder = RoadGraphBuilder::new();
    let a = builder.add_vertex(Coordinate::new(0.0, 0.0));
    let b = builder.add_vertex(Coordinate::new(0.0, 0.001));
    let c = builder.add_vertex(Coordinate::new(0.01, 0.01));
    let d = builder.add_vertex(Coordinate::new(0.01, 0.011));
    builder
        .add_edge_bidirectional(a, b, 10)
        .add_edge_bidirectional(c, d, 10);
    let graph = builder.build();

    let error = resolve(&points, &graph, &portaria(), &PointId::from("L2")).unwrap_err();

    assert!(matches!(error, ResolveError::NoPath { from, to } if from == a && to == c));
}

#[test]
fn empty_graph_is_not_found() {
    let (points, _) = two_point_scenario();
    let graph = RoadGraphBuilder::new().build();

    let error = resolve(&points, &graph, &portaria(), &PointId::from("L1")).unwrap_err();

    assert!(matches!(error, ResolveError::NotFound { .. }));
}

#[test]
fn origin_to_itself_is_zero_length() {
    let (points, graph) = two_point_scenario();

    let route = resolve(&points, &graph, &portaria(), &portaria()).unwrap();

    assert_eq!(route.vertices.len(), 1);
    assert_eq!(route.coordinates.len(), 1);
    assert_eq!(route.number_of_segments(), 0);
    assert_eq!(route.distance, 0);
}

#[test]
fn every_lot_routes_between_nearest_vertices() {
    let (points, graph) = grid_scenario();
    let origin = points.get(&portaria()).unwrap();
    let origin_vertex = nearest_node(&graph, origin.latitude(), origin.longitude()).unwrap();

    for point in points.iter() {
        let route = resolve(&points, &graph, &portaria(), &point.id).unwrap();
        let destination_vertex = nearest_node(&graph, point.latitude(), point.longitude()).unwrap();

        assert_eq!(route.origin_vertex(), Some(origin_vertex));
        assert_eq!(route.destination_vertex(), Some(destination_vertex));
        assert!(!route.vertices.is_empty());
        assert_eq!(route.vertices.len(), route.coordinates.len());
        for (vertex, coordinate) in route.vertices.iter().zip(&route.coordinates) {
            assert_eq!(graph.coordinate(*vertex), Some(*coordinate));
        }
        assert_eq!(graph.graph().get_path_distance(&route.vertices), Some(route.distance));
    }
}

#[test]
fn resolution_is_idempotent() {
    let (points, graph) = grid_scenario();

    for point in points.iter() {
        let first = resolve(&points, &graph, &portaria(), &point.id).unwrap();
        let second = resolve(&points, &graph, &portaria(), &point.id).unwrap();

        assert_eq!(first, second);
    }
}

#[test]
fn shortest_path_follows_one_way_streets() {
    let (_, graph) = grid_scenario();

    // column 1 is one-way northbound, so going south needs a detour
    let north = shortest_path(&graph, 1, 21).unwrap();
    let south = shortest_path(&graph, 21, 1).unwrap();

    assert_eq!(north.vertices, vec![1, 6, 11, 16, 21]);
    assert!(south.distance > north.distance);
    assert_eq!(graph.graph().get_path_distance(&south.vertices), Some(south.distance));
}
