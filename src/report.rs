use funicular::Snapshot;
use std::fmt::Write;

/// Render a textual summary of a relaxed structure.
///
/// The lowest node and the most heavily loaded bar are the two numbers a
/// designer usually checks first: sag and the member to size.
#[must_use]
pub fn render_summary(snapshot: &Snapshot) -> String {
    let mut output = String::new();

    // State how far the relaxation went and how large the model is, so the
    // reader can judge whether more steps are needed.
    writeln!(
        &mut output,
        "Dynamic relaxation after {} steps ({} nodes, {} bars)",
        snapshot.iteration,
        snapshot.positions.len(),
        snapshot.bars.len()
    )
    .expect("writing to string cannot fail");

    // The total mass is the load gravity acted on during the last step.
    writeln!(&mut output, "Total mass: {:.3}", snapshot.total_mass())
        .expect("writing to string cannot fail");

    // The lowest node shows the sag of a hanging form, or the rise of an
    // inverted one when gravity points up.
    let heights = snapshot.coordinates().column(2).to_vec();
    let lowest = heights
        .iter()
        .copied()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b));
    if let Some((node, z)) = lowest {
        let position = snapshot.positions[node];
        writeln!(
            &mut output,
            "Lowest node: {node} at ({:+.4}, {:+.4}, {z:+.4})",
            position.x, position.y
        )
        .expect("writing to string cannot fail");
    }

    // Report the most heavily loaded bar with its sign spelled out, since a
    // funicular form carries either pure tension or pure compression.
    if let Some((bar, tension)) = snapshot.peak_tension() {
        let kind = if tension < 0.0 { "compression" } else { "tension" };
        writeln!(
            &mut output,
            "Peak axial force: bar {bar}, {:+.4e} ({kind})",
            tension
        )
        .expect("writing to string cannot fail");
    } else {
        output.push_str("Peak axial force: not available (no bars)\n");
    }

    // Advisories are not errors, but they flag inputs worth a second look.
    for advisory in &snapshot.advisories {
        writeln!(&mut output, "Note: {advisory}").expect("writing to string cannot fail");
    }

    output
}
