//! Renders a query answer into the assistant's display text.

/// Builds `"{summary}\n\nReferences:\n\n{lines}"`.
///
/// Scores are used only when they line up one-to-one with `references`;
/// otherwise every reference is rendered without a consistency figure.
pub fn format_response(summary: &str, references: &[String], scores: &[f64]) -> String {
    let scored = !scores.is_empty() && scores.len() == references.len();

    let lines: Vec<String> = references
        .iter()
        .enumerate()
        .map(|(i, text)| {
            if scored {
                format!(
                    "Reference {} - {:.2}% chance of being factually consistent with the generated response: {}",
                    i + 1,
                    scores[i] * 100.0,
                    text
                )
            } else {
                format!("Reference {}: {}", i + 1, text)
            }
        })
        .collect();

    format!("{}\n\nReferences:\n\n{}", summary, lines.join("\n\n"))
}
