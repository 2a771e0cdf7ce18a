use std::fmt;

const PREFIX: &str = "Tabla_filas_";
const EXTENSION: &str = ".docx";

/// Longest file name accepted by common filesystems, in bytes.
const MAX_NAME_BYTES: usize = 255;

/// File name for a table generated from `rows`, e.g. `Tabla_filas_5_6_7.docx`.
///
/// Rows are listed in request order. When that does not fit in
/// [`MAX_NAME_BYTES`], consecutive rows collapse into ranges
/// (`Tabla_filas_5-100.docx`); if the ranges still do not fit, the tail is
/// replaced by an `_and_N_more` count.
pub fn output_file_name(rows: &[u32]) -> String {
    let singles: Vec<Segment> = rows.iter().map(|&row| Segment::single(row)).collect();
    let name = compose(&singles);
    if name.len() <= MAX_NAME_BYTES {
        return name;
    }
    let runs = collapse_runs(rows);
    let name = compose(&runs);
    if name.len() <= MAX_NAME_BYTES {
        return name;
    }
    truncate(&runs)
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    first: u32,
    last: u32,
}

impl Segment {
    fn single(row: u32) -> Self {
        Self {
            first: row,
            last: row,
        }
    }

    fn rows(self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// Merges ascending neighbours (`5, 6, 7`) into one segment; order is kept.
fn collapse_runs(rows: &[u32]) -> Vec<Segment> {
    let mut runs: Vec<Segment> = Vec::new();
    for &row in rows {
        match runs.last_mut() {
            Some(run) if run.last.checked_add(1) == Some(row) => run.last = row,
            _ => runs.push(Segment::single(row)),
        }
    }
    runs
}

fn compose(segments: &[Segment]) -> String {
    let joined: Vec<String> = segments.iter().map(ToString::to_string).collect();
    format!("{PREFIX}{}{EXTENSION}", joined.join("_"))
}

fn truncate(runs: &[Segment]) -> String {
    let total: usize = runs.iter().copied().map(Segment::rows).sum();
    let mut body = String::new();
    let mut covered = 0;
    for run in runs {
        let piece = if body.is_empty() {
            run.to_string()
        } else {
            format!("_{run}")
        };
        let suffix = format!("_and_{}_more", total - covered - run.rows());
        if PREFIX.len() + body.len() + piece.len() + suffix.len() + EXTENSION.len()
            > MAX_NAME_BYTES
        {
            break;
        }
        body.push_str(&piece);
        covered += run.rows();
    }
    format!("{PREFIX}{body}_and_{}_more{EXTENSION}", total - covered)
}
