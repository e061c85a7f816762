//! Aligned plain-text tables.

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Columns are never squeezed below this many characters.
const MIN_COLUMN: usize = 4;
const GAP: &str = "  ";

/// Lay out `rows` under `headers`, one line per row.
///
/// Integer cells are right-aligned. With a `max_width`, the widest columns
/// give way first and their cells end in `…`.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();
    if let Some(max_width) = options.max_width {
        shrink_to(&mut widths, max_width);
    }

    let total = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    let mut lines = vec![line(headers.iter().copied(), &widths, false), "-".repeat(total)];
    lines.extend(
        rows.iter()
            .map(|row| line(row.iter().map(String::as_str), &widths, options.color)),
    );
    lines.join("\n")
}

fn shrink_to(widths: &mut [usize], max_width: usize) {
    let gaps = GAP.len() * widths.len().saturating_sub(1);
    while widths.iter().sum::<usize>() + gaps > max_width {
        let Some(widest) = widths
            .iter_mut()
            .filter(|width| **width > MIN_COLUMN)
            .max_by_key(|width| **width)
        else {
            break;
        };
        *widest -= 1;
    }
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], color: bool) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let text = truncate(cell, width);
            let pad = " ".repeat(width.saturating_sub(text.chars().count()));
            let text = if color { paint(text) } else { text };
            if is_integer(cell) {
                format!("{pad}{text}")
            } else {
                format!("{text}{pad}")
            }
        })
        .collect();
    padded.join(GAP).trim_end().to_string()
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Color run states; other text passes through.
fn paint(value: String) -> String {
    let code = match value.as_str() {
        "running" | "open" => "32",
        "idle" => "33",
        "error" | "deleted" => "31",
        _ => return value,
    };
    format!("\u{1b}[{code}m{value}\u{1b}[0m")
}
