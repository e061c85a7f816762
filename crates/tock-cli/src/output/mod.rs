//! Command output as pretty JSON, single-line JSON, or an aligned table.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;
pub mod views;

/// A value shown as one table line.
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Render one value in the requested format.
pub fn render<T: Serialize + Row>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(table_of(std::slice::from_ref(value))),
        OutputFormat::Json | OutputFormat::Raw => render_json(value, format),
    }
}

/// Render a list in the requested format.
pub fn render_list<T: Serialize + Row>(values: &[T], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table if values.is_empty() => Ok(String::from("(no rows)")),
        OutputFormat::Table => Ok(table_of(values)),
        OutputFormat::Json | OutputFormat::Raw => render_json(values, format),
    }
}

/// Print one value in the requested format.
pub fn output<T: Serialize + Row>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print a list in the requested format.
pub fn output_list<T: Serialize + Row>(values: &[T], format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_list(values, format)?);
    Ok(())
}

fn render_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Raw {
        Ok(serde_json::to_string(value)?)
    } else {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

fn table_of<T: Row>(values: &[T]) -> String {
    let prefs = ui::prefs();
    let rows: Vec<Vec<String>> = values.iter().map(Row::cells).collect();
    table::render(
        T::HEADERS,
        &rows,
        table::TableOptions {
            max_width: prefs.term_width,
            color: prefs.table_color,
        },
    )
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Example {
        id: i64,
        synopsis: &'static str,
    }

    impl Row for Example {
        const HEADERS: &'static [&'static str] = &["id", "synopsis"];

        fn cells(&self) -> Vec<String> {
            vec![self.id.to_string(), self.synopsis.to_string()]
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: 1, synopsis: "Write report" };
        let out = render(&value, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["synopsis"], "Write report");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let rows = vec![
            Example { id: 1, synopsis: "A" },
            Example { id: 2, synopsis: "B" },
        ];
        let out = render_list(&rows, OutputFormat::Raw).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["synopsis"], "B");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn single_value_table_has_one_row() {
        let value = Example { id: 1, synopsis: "Write report" };
        let out = render(&value, OutputFormat::Table).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().next().is_some_and(|line| line.starts_with("id")));
        assert!(out.contains("Write report"));
    }

    #[test]
    fn list_table_uses_row_headers() {
        let rows = vec![
            Example { id: 1, synopsis: "A" },
            Example { id: 2, synopsis: "B" },
        ];
        let out = render_list(&rows, OutputFormat::Table).unwrap();
        assert_eq!(out.lines().next(), Some("id  synopsis"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let rows: Vec<Example> = Vec::new();
        assert_eq!(render_list(&rows, OutputFormat::Table).unwrap(), "(no rows)");
        assert_eq!(render_list(&rows, OutputFormat::Raw).unwrap(), "[]");
    }
}
