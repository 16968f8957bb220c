use funicular::{line, point, ModelInput, Session, StepParameters};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A single spring stretched to twice its rest length
    let input = ModelInput {
        nodes: vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)],
        springs: vec![line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0))],
        supports: vec![point(0.0, 0.0, 0.0)],
        stiffnesses: vec![1.0],
        natural_lengths: vec![0.5],
        mass_type: 0,
        ..ModelInput::default()
    };
    let parameters = StepParameters::default().with_gravity(0.0);

    let mut session = Session::new();
    for _ in 0..100 {
        let snapshot = session.step(&input, &parameters)?;
        if snapshot.iteration % 20 == 0 {
            println!(
                "step {:>3}: x = {:.4}, tension = {:+.4}",
                snapshot.iteration, snapshot.positions[1].x, snapshot.tensions[0]
            );
        }
    }

    Ok(())
}
