// ===== cubeforge/src/reports/mod.rs =====
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use cubeforge::cube::{Color as Facelet, CubeState, Face};
use cubeforge::optimizer::{LevelStatus, RecallRun, RunReport};
use cubeforge::pieces::{Level, PIECES};

fn facelet_cell(c: Facelet) -> Cell {
    let fg = match c {
        Facelet::White => Color::White,
        Facelet::Green => Color::Green,
        Facelet::Red => Color::Red,
        Facelet::Orange => Color::DarkYellow,
        Facelet::Blue => Color::Blue,
        Facelet::Yellow => Color::Yellow,
    };
    Cell::new(c.to_string())
        .fg(fg)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Center)
}

fn face_row(state: &CubeState, face: Face, row: usize) -> Vec<Cell> {
    let first = *face.positions().start() + row * 3;
    (first..first + 3).map(|p| facelet_cell(state.at(p))).collect()
}

fn blank_block() -> Vec<Cell> {
    vec![Cell::new(" "), Cell::new(" "), Cell::new(" ")]
}

/// Prints the unfolded net: up above front, left and right beside it,
/// down below, back below down.
pub fn print_cube_net(title: &str, state: &CubeState) {
    println!("\n{}", title);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let centered = |face: Face, row: usize| {
        let mut cells = blank_block();
        cells.extend(face_row(state, face, row));
        cells.extend(blank_block());
        cells
    };

    for row in 0..3 {
        table.add_row(centered(Face::Up, row));
    }
    for row in 0..3 {
        let mut cells = face_row(state, Face::Left, row);
        cells.extend(face_row(state, Face::Front, row));
        cells.extend(face_row(state, Face::Right, row));
        table.add_row(cells);
    }
    for row in 0..3 {
        table.add_row(centered(Face::Down, row));
    }
    for row in 0..3 {
        table.add_row(centered(Face::Back, row));
    }

    println!("{table}");
}

/// Correct-piece counts per level plus the list of misplaced pieces.
pub fn print_piece_status(state: &CubeState) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Level").add_attribute(Attribute::Bold),
        Cell::new("Correct"),
        Cell::new("Missing").fg(Color::Red),
    ]);

    for level in Level::ALL {
        let correct = level.correct_pieces(state);
        let missing: Vec<&str> = PIECES[..level.piece_count()]
            .iter()
            .enumerate()
            .filter(|(i, _)| !correct.contains(*i))
            .map(|(_, p)| p.name)
            .collect();
        table.add_row(vec![
            Cell::new(level.to_string()).add_attribute(Attribute::Bold),
            Cell::new(format!("{}/{}", correct.count(), level.piece_count())),
            Cell::new(missing.join(" ")).fg(Color::Red),
        ]);
    }

    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    println!("{table}");
}

pub fn print_run_summary(run_id: usize, report: &RunReport) {
    println!("\n=== Run {} ===", run_id);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Level").add_attribute(Attribute::Bold),
        Cell::new("Status"),
        Cell::new("Start"),
        Cell::new("End"),
        Cell::new("Iter"),
        Cell::new("Last+"),
        Cell::new("Impr").fg(Color::Green),
        Cell::new("Reuse").fg(Color::Cyan),
        Cell::new("New"),
        Cell::new("Moves"),
    ]);

    for l in &report.levels {
        let status = match l.status {
            LevelStatus::Solved => Cell::new("SOLVED").fg(Color::Green),
            LevelStatus::Exhausted => Cell::new("EXHAUSTED").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(l.level.to_string()).add_attribute(Attribute::Bold),
            status,
            Cell::new(l.start_count),
            Cell::new(format!("{}/{}", l.end_count, l.target)),
            Cell::new(l.iterations),
            Cell::new(l.last_improvement),
            Cell::new(l.improvements).fg(Color::Green),
            Cell::new(l.reuses).fg(Color::Cyan),
            Cell::new(l.recorded),
            Cell::new(l.sequence.len()),
        ]);
    }

    for i in 2..=9 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{table}");

    if !report.scramble.is_empty() {
        println!("Scramble ({}): {}", report.scramble.len(), report.scramble);
    }
    println!(
        "Sequence ({} moves, {:.2}s): {}",
        report.total_moves(),
        report.elapsed.as_secs_f64(),
        report.sequence
    );
}

pub fn print_recall_summary(run_id: usize, run: &RecallRun) {
    println!("\n=== Recall Run {} ===", run_id);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Iter"),
        Cell::new("Time"),
        Cell::new("Moves"),
        Cell::new("Sequence"),
    ]);

    for (i, s) in run.solutions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Bold),
            Cell::new(s.iterations),
            Cell::new(format!("{:.2}s", s.elapsed.as_secs_f64())),
            Cell::new(s.moves.len()).fg(Color::Cyan),
            Cell::new(s.moves.to_string()),
        ]);
    }
    println!("{table}");
    println!(
        "{} solution(s), {} iterations, {} exhausted chain(s)",
        run.solutions.len(),
        run.iterations,
        run.exhausted_chains
    );
}
