//! Placeholder markup for configured sections.

use super::GridShape;

const GRID_GAP_PX: u32 = 5;

/// Emit one container per configured section, in order. Each container holds
/// a `rows x cols` grid of labelled placeholder cells (`Section i.j`, 1-based).
pub fn generate_content(configs: &[GridShape]) -> String {
    configs
        .iter()
        .enumerate()
        .map(|(index, shape)| section_container(index + 1, *shape))
        .collect()
}

fn section_container(number: usize, shape: GridShape) -> String {
    let cells: String = (1..=shape.cell_count())
        .map(|cell| {
            format!("<div class=\"editor-section\"><p>Section {number}.{cell}</p></div>")
        })
        .collect();

    format!(
        "<div class=\"main-section\"><div style=\"display: grid; \
         grid-template-rows: repeat({rows}, 1fr); \
         grid-template-columns: repeat({cols}, 1fr); gap: {GRID_GAP_PX}px;\">{cells}</div></div>",
        rows = shape.rows,
        cols = shape.cols,
    )
}
