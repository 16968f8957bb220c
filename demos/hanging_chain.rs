use funicular::{line, point, ModelInput, Point, Session, StepParameters, USE_CURRENT_LENGTH};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Ten links hanging between two supports at the same height
    let links: u32 = 10;
    let nodes: Vec<Point> = (0..=links).map(|i| point(f64::from(i), 0.0, 0.0)).collect();
    let springs = nodes.windows(2).map(|pair| line(pair[0], pair[1])).collect();
    let input = ModelInput {
        supports: vec![nodes[0], nodes[nodes.len() - 1]],
        nodes,
        springs,
        stiffnesses: vec![50.0],
        natural_lengths: vec![USE_CURRENT_LENGTH],
        ..ModelInput::default()
    };
    let parameters = StepParameters::default()
        .with_gravity(-9.81)
        .with_time_step(0.01);

    let mut session = Session::new();
    let mut snapshot = session.step(&input, &parameters)?;
    while snapshot.iteration < 2_000 {
        snapshot = session.step(&input, &parameters)?;
    }

    let heights = snapshot.coordinates().column(2).to_vec();
    for (node, z) in heights.iter().enumerate() {
        println!("node {node:>2}: z = {z:+.4}");
    }
    if let Some((bar, tension)) = snapshot.peak_tension() {
        println!("peak tension {tension:.3} in bar {bar}");
    }

    Ok(())
}
