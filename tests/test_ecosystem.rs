use std::sync::Arc;

use hamilton::{
    ecosystem::{EcosystemBuilder, EcosystemOptions, TourMetric},
    error::HamiltonError,
    genotype::Genotype,
    graph::{DistanceGraph, Point},
    rng::RandomNumberGenerator,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn unit_square() -> DistanceGraph {
    DistanceGraph::from_points(&[
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ])
}

fn random_population(
    count: usize,
    size: usize,
    rng: &mut RandomNumberGenerator,
) -> Vec<Genotype> {
    (0..count)
        .map(|_| Genotype::random(size, rng).unwrap())
        .collect()
}

#[test]
fn test_construction_errors() {
    let missing_graph = EcosystemBuilder::new()
        .with_options(EcosystemOptions::new(5, 10, 0.1))
        .build();
    assert!(matches!(
        missing_graph,
        Err(HamiltonError::EcosystemConstruction(_))
    ));

    let small_children = EcosystemBuilder::new()
        .with_graph(unit_square())
        .with_options(EcosystemOptions::new(5, 4, 0.1))
        .build();
    assert!(matches!(
        small_children,
        Err(HamiltonError::EcosystemConstruction(_))
    ));

    for probability in [-0.5, 1.5] {
        let result = EcosystemBuilder::new()
            .with_graph(unit_square())
            .with_options(EcosystemOptions::new(5, 10, probability))
            .build();
        assert!(matches!(result, Err(HamiltonError::EcosystemConstruction(_))));
    }
}

#[test]
fn test_mismatched_initial_individuals_are_fatal() {
    let mut rng = RandomNumberGenerator::from_seed(1);
    let individuals = random_population(3, 5, &mut rng);
    let result = EcosystemBuilder::new()
        .with_graph(unit_square())
        .with_individuals(individuals)
        .build();
    assert_eq!(
        result.unwrap_err(),
        HamiltonError::SizeMismatch { left: 4, right: 5 }
    );
}

#[test]
fn test_unit_square_converges_to_perimeter() {
    init_tracing();

    let mut rng = RandomNumberGenerator::from_seed(2024);
    let individuals = random_population(20, 4, &mut rng);
    let graph = Arc::new(unit_square());

    let mut ecosystem = EcosystemBuilder::new()
        .with_graph(Arc::clone(&graph))
        .with_options(EcosystemOptions::new(20, 40, 0.05))
        .with_individuals(individuals)
        .with_rng(rng)
        .build()
        .unwrap();

    for _ in 0..200 {
        ecosystem.next_generation().unwrap();
    }

    let best = ecosystem.best().unwrap().fenotype();
    let closed = graph.cycle_length(&best).unwrap();
    assert!((closed - 4.0).abs() < 1e-9, "closed tour length {}", closed);
}

#[test]
fn test_parent_count_is_stable() {
    let mut rng = RandomNumberGenerator::from_seed(5);
    let points: Vec<Point> = (0..15)
        .map(|k| Point::new((k * 7 % 11) as f64, (k * 3 % 5) as f64))
        .collect();
    let individuals = random_population(30, 15, &mut rng);

    let mut ecosystem = EcosystemBuilder::new()
        .with_graph(DistanceGraph::from_points(&points))
        .with_options(EcosystemOptions::new(12, 30, 0.2))
        .with_individuals(individuals)
        .with_rng(rng)
        .build()
        .unwrap();

    for _ in 0..10 {
        ecosystem.next_generation().unwrap();
        let parents = ecosystem.parents_snapshot();
        assert_eq!(parents.len(), 12);
        assert!(parents.iter().all(Option::is_some));
    }
}

#[test]
fn test_best_never_regresses_without_mutation() {
    let mut rng = RandomNumberGenerator::from_seed(77);
    let points: Vec<Point> = (0..20)
        .map(|k| {
            let angle = k as f64 * 0.7;
            Point::new(angle.cos() * (1.0 + k as f64), angle.sin() * 3.0)
        })
        .collect();
    let individuals = random_population(10, 20, &mut rng);

    let options = EcosystemOptions::builder()
        .parent_capacity(10)
        .child_capacity(30)
        .mutation_probability(0.0)
        .elitism(true)
        .build();
    let mut ecosystem = EcosystemBuilder::new()
        .with_graph(DistanceGraph::from_points(&points))
        .with_options(options)
        .with_individuals(individuals)
        .with_rng(rng)
        .build()
        .unwrap();

    let mut best = ecosystem.fitness_of(ecosystem.best().unwrap()).unwrap();
    for _ in 0..30 {
        let report = ecosystem.next_generation().unwrap();
        let next = report.best_fitness.unwrap();
        assert!(next >= best, "best fitness fell from {} to {}", best, next);
        best = next;
    }
}

#[test]
fn test_closed_cycle_metric() {
    let mut rng = RandomNumberGenerator::from_seed(8);
    let individuals = random_population(6, 4, &mut rng);
    let options = EcosystemOptions::builder()
        .parent_capacity(6)
        .child_capacity(6)
        .tour_metric(TourMetric::ClosedCycle)
        .build();
    let graph = unit_square();

    let ecosystem = EcosystemBuilder::new()
        .with_graph(graph.clone())
        .with_options(options)
        .with_individuals(individuals)
        .build()
        .unwrap();

    let best = ecosystem.best().unwrap();
    assert_eq!(
        ecosystem.fitness_of(best).unwrap(),
        -graph.cycle_length(&best.fenotype()).unwrap()
    );
}

#[test]
fn test_snapshots_are_independent() {
    let mut rng = RandomNumberGenerator::from_seed(3);
    let individuals = random_population(4, 6, &mut rng);
    let points: Vec<Point> = (0..6).map(|k| Point::new(k as f64, 0.0)).collect();

    let mut ecosystem = EcosystemBuilder::new()
        .with_graph(DistanceGraph::from_points(&points))
        .with_options(EcosystemOptions::new(4, 6, 0.5))
        .with_individuals(individuals)
        .with_rng(rng)
        .build()
        .unwrap();

    let before = ecosystem.parents_snapshot();
    let mut copy = ecosystem.parents_snapshot();
    if let Some(Some(first)) = copy.first_mut() {
        first.mutate(&mut RandomNumberGenerator::from_seed(0));
    }
    assert_eq!(ecosystem.parents_snapshot(), before);

    ecosystem.next_generation().unwrap();
    assert_eq!(before.len(), ecosystem.parents_snapshot().len());
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut rng = RandomNumberGenerator::from_seed(404);
        let individuals = random_population(10, 12, &mut rng);
        let points: Vec<Point> = (0..12)
            .map(|k| Point::new((k % 4) as f64, (k / 4) as f64))
            .collect();
        let mut ecosystem = EcosystemBuilder::new()
            .with_graph(DistanceGraph::from_points(&points))
            .with_options(EcosystemOptions::new(10, 25, 0.3))
            .with_individuals(individuals)
            .with_rng(rng)
            .build()
            .unwrap();
        for _ in 0..15 {
            ecosystem.next_generation().unwrap();
        }
        ecosystem.parents_snapshot()
    };
    assert_eq!(run(), run());
}
