#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use funicular::{
    line, point, Advisory, EditError, ModelInput, NodeKind, Point, PointLoad, RollerMode,
    Session, Snapshot, StepParameters, USE_CURRENT_LENGTH,
};
use petgraph::graph::{EdgeIndex, NodeIndex};

fn chain(supports: Vec<Point>) -> ModelInput {
    ModelInput {
        nodes: vec![
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(2.0, 0.0, 0.0),
        ],
        springs: vec![
            line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)),
            line(point(1.0, 0.0, 0.0), point(2.0, 0.0, 0.0)),
        ],
        supports,
        ..ModelInput::default()
    }
}

fn run(
    session: &mut Session,
    input: &ModelInput,
    parameters: &StepParameters,
    steps: usize,
) -> Snapshot {
    let mut snapshot = session.step(input, parameters).expect("valid input");
    for _ in 1..steps {
        snapshot = session.step(input, parameters).expect("valid input");
    }
    snapshot
}

#[test]
fn two_node_spring_contracts_after_one_step() {
    let input = ModelInput {
        nodes: vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)],
        springs: vec![line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0))],
        supports: vec![point(0.0, 0.0, 0.0)],
        stiffnesses: vec![1.0],
        natural_lengths: vec![0.5],
        mass_densities: vec![1.0],
        mass_type: 0,
        ..ModelInput::default()
    };
    let parameters = StepParameters::default()
        .with_gravity(0.0)
        .with_damping(1.0)
        .with_time_step(0.01);

    let mut session = Session::new();
    let snapshot = session.step(&input, &parameters).expect("valid input");

    assert_eq!(snapshot.iteration, 1);
    assert_eq!(snapshot.positions[0], point(0.0, 0.0, 0.0));
    assert_relative_eq!(snapshot.positions[1].x, 0.995, epsilon = 1.0e-12);
    assert_eq!(snapshot.positions[1].y, 0.0);
    assert_eq!(snapshot.positions[1].z, 0.0);
    assert_relative_eq!(snapshot.tensions[0], 0.5, epsilon = 1.0e-12);
    assert_relative_eq!(snapshot.bars[0].length(), 0.995, epsilon = 1.0e-12);
    let velocity = session
        .structure()
        .and_then(|structure| structure.node(NodeIndex::new(1)))
        .map(|node| node.velocity().x)
        .expect("built");
    assert_relative_eq!(velocity, -0.5, epsilon = 1.0e-12);
}

#[test]
fn symmetric_chain_reaches_equilibrium() {
    let input = ModelInput {
        stiffnesses: vec![10.0],
        natural_lengths: vec![USE_CURRENT_LENGTH],
        mass_type: 0,
        ..chain(vec![point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0)])
    };
    let parameters = StepParameters::default()
        .with_gravity(-1.0)
        .with_damping(0.9)
        .with_time_step(0.1);

    let mut session = Session::new();
    let snapshot = run(&mut session, &input, &parameters, 3000);

    let middle = snapshot.positions[1];
    assert!(middle.z < 0.0);
    assert_relative_eq!(middle.x, 1.0, epsilon = 1.0e-9);
    assert_relative_eq!(middle.y, 0.0, epsilon = 1.0e-12);

    // Vertical components of both bar forces balance the unit weight.
    let length = (1.0 + middle.z * middle.z).sqrt();
    let tension = 10.0 * (length - 1.0);
    let residual = -2.0 * middle.z * tension / length - 1.0;
    assert!(residual.abs() < 1.0e-6, "residual {residual}");
    assert_relative_eq!(snapshot.tensions[0], snapshot.tensions[1], epsilon = 1.0e-9);
}

#[test]
fn supports_never_move() {
    let supports = vec![point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0)];
    let input = chain(supports.clone());
    let parameters = StepParameters::default()
        .with_wind(3.0)
        .with_dead_load(-2.0);

    let mut session = Session::new();
    for _ in 0..200 {
        let snapshot = session.step(&input, &parameters).expect("valid input");
        assert_eq!(snapshot.positions[0], supports[0]);
        assert_eq!(snapshot.positions[2], supports[1]);
    }
}

#[test]
fn length_based_mass_is_half_of_each_bar() {
    let input = ModelInput {
        mass_densities: vec![1.0, 2.0, 3.0],
        ..chain(vec![point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0)])
    };
    let mut session = Session::new();
    let snapshot = session
        .step(&input, &StepParameters::default())
        .expect("valid input");

    assert_relative_eq!(snapshot.masses[0], 0.5, epsilon = 1.0e-12);
    assert_relative_eq!(snapshot.masses[1], 2.0, epsilon = 1.0e-12);
    assert_relative_eq!(snapshot.masses[2], 1.5, epsilon = 1.0e-12);
    assert_relative_eq!(snapshot.total_mass(), 4.0, epsilon = 1.0e-12);
}

#[test]
fn area_based_mass_uses_neighbour_triangle() {
    let centre = point(1.0, 1.0, 1.0);
    let corners = vec![
        point(0.0, 0.0, 0.0),
        point(3.0, 0.0, 0.0),
        point(0.0, 4.0, 0.0),
    ];
    let mut nodes = vec![centre];
    nodes.extend(corners.iter().copied());
    let input = ModelInput {
        nodes,
        springs: corners.iter().map(|corner| line(centre, *corner)).collect(),
        supports: corners,
        mass_densities: vec![2.0],
        mass_type: 2,
        ..ModelInput::default()
    };
    let mut session = Session::new();
    let snapshot = session
        .step(&input, &StepParameters::default().with_gravity(0.0))
        .expect("valid input");

    assert_relative_eq!(snapshot.masses[0], 12.0, epsilon = 1.0e-12);
    assert_eq!(&snapshot.masses[1..], &[0.0, 0.0, 0.0]);
    assert_eq!(snapshot.valencies, vec![3, 1, 1, 1]);
    assert_eq!(snapshot.neighbors[0], vec![1, 2, 3]);
    let mesh = snapshot.meshes[0].as_ref().expect("three neighbours");
    assert_relative_eq!(mesh.area(), 6.0, epsilon = 1.0e-12);
    assert!(snapshot.meshes[1].is_none());
}

#[test]
fn area_mesh_is_the_triangle_behind_the_mass() {
    let centre = point(1.0, 1.0, 1.0);
    let corners = [
        point(0.0, 0.0, 0.0),
        point(3.0, 0.0, 0.0),
        point(0.0, 4.0, 0.0),
    ];
    let mut nodes = vec![centre];
    nodes.extend(corners);
    let input = ModelInput {
        nodes,
        springs: corners.iter().map(|corner| line(centre, *corner)).collect(),
        stiffnesses: vec![1.0],
        natural_lengths: vec![0.5],
        mass_densities: vec![2.0],
        mass_type: 2,
        ..ModelInput::default()
    };
    let parameters = StepParameters::default()
        .with_gravity(0.0)
        .with_time_step(0.5);

    let mut session = Session::new();
    let snapshot = session.step(&input, &parameters).expect("valid input");

    assert_ne!(&snapshot.positions[1..], &corners[..]);
    let mesh = snapshot.meshes[0].as_ref().expect("three neighbours");
    assert_eq!(mesh.vertices, corners);
    assert_relative_eq!(snapshot.masses[0], mesh.area() * 2.0, epsilon = 1.0e-12);
}

#[test]
fn high_valency_is_reported_but_not_fatal() {
    let centre = point(0.0, 0.0, 1.0);
    let leaves = vec![
        point(1.0, 0.0, 0.0),
        point(-1.0, 0.0, 0.0),
        point(0.0, 1.0, 0.0),
        point(0.0, -1.0, 0.0),
    ];
    let mut nodes = vec![centre];
    nodes.extend(leaves.iter().copied());
    let input = ModelInput {
        nodes,
        springs: leaves.iter().map(|leaf| line(centre, *leaf)).collect(),
        supports: leaves,
        stiffnesses: vec![1.0, 1.0, 1.0, 1.0],
        natural_lengths: vec![1.0, 1.0, 1.0, 1.0],
        mass_densities: vec![1.0, 1.0, 1.0, 1.0, 1.0],
        ..ModelInput::default()
    };
    let mut session = Session::new();
    for iteration in 1..=3 {
        let snapshot = session
            .step(&input, &StepParameters::default())
            .expect("advisories are not fatal");
        assert_eq!(snapshot.iteration, iteration);
        assert_eq!(
            snapshot.advisories,
            vec![Advisory::StaticallyIndeterminate {
                node: 0,
                valency: 4
            }]
        );
    }
}

#[test]
fn reset_without_rebuild_preserves_positions() {
    let input = chain(vec![point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0)]);
    let parameters = StepParameters::default();
    let mut session = Session::new();
    let relaxed = run(&mut session, &input, &parameters, 20);

    for _ in 0..4 {
        session.reset();
        assert_eq!(session.iteration(), 0);
    }
    let positions: Vec<Point> = session
        .structure()
        .map(|structure| structure.nodes().map(|(_, node)| node.position()).collect())
        .expect("structure persists across resets");
    assert_eq!(positions, relaxed.positions);

    let rebuilt = session.step(&input, &parameters).expect("valid input");
    assert_eq!(rebuilt.iteration, 1);
}

#[test]
fn live_edits_apply_to_the_next_step() {
    let input = ModelInput {
        stiffnesses: vec![5.0],
        natural_lengths: vec![0.5],
        ..chain(vec![point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0)])
    };
    let parameters = StepParameters::default().with_gravity(0.0);
    let mut session = Session::new();
    session.step(&input, &parameters).expect("valid input");

    let structure = session.structure_mut().expect("built");
    structure.retune(EdgeIndex::new(0), 0.0).expect("known bar");
    structure
        .set_natural_length(EdgeIndex::new(1), USE_CURRENT_LENGTH)
        .expect("known bar");
    assert_eq!(
        structure.retune(EdgeIndex::new(7), 1.0),
        Err(EditError::UnknownBar(EdgeIndex::new(7)))
    );

    let snapshot = session.step(&input, &parameters).expect("persisted structure");
    assert_eq!(snapshot.tensions[0], 0.0);
    assert_eq!(snapshot.iteration, 2);
}

#[test]
fn rollers_and_loads_come_from_input() {
    let input = ModelInput {
        nodes: vec![
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(2.0, 0.0, 0.0),
        ],
        springs: vec![
            line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)),
            line(point(1.0, 0.0, 0.0), point(2.0, 0.0, 0.0)),
        ],
        supports: vec![point(0.0, 0.0, 0.0)],
        rollers: vec![point(2.0, 0.0, 0.0)],
        loads: vec![PointLoad {
            position: point(1.0, 0.0, 0.0),
            force: [0.0, 0.0, -1.0],
        }],
        stiffnesses: vec![10.0],
        natural_lengths: vec![USE_CURRENT_LENGTH],
        ..ModelInput::default()
    };
    let parameters = StepParameters::default()
        .with_gravity(0.0)
        .with_roller_mode(RollerMode::Integrated);
    let mut session = Session::new();
    let snapshot = run(&mut session, &input, &parameters, 100);

    let structure = session.structure().expect("built");
    let kinds: Vec<NodeKind> = structure.nodes().map(|(_, node)| node.kind()).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Pinned, NodeKind::Loaded, NodeKind::Roller]
    );
    assert!(snapshot.positions[1].z < 0.0);
    assert_eq!(snapshot.positions[2].z, 0.0);
}
