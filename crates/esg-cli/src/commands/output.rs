//! 표, CSV, JSON 출력.

use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported output format '{}' (table, csv, json)", other)),
        }
    }
}

/// 머리글과 셀 문자열로 이루어진 표.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// 열 너비를 맞춘 텍스트 표.
    pub fn to_text(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(self.headers[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut output = line(&self.headers);
        output.push('\n');
        output.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        for row in &self.rows {
            output.push('\n');
            output.push_str(&line(row));
        }
        output
    }

    pub fn to_csv(&self) -> String {
        let mut output = self.headers.join(",");
        for row in &self.rows {
            output.push('\n');
            output.push_str(&row.iter().map(|cell| escape_csv(cell)).collect::<Vec<_>>().join(","));
        }
        output
    }
}

/// 형식에 맞춰 렌더링합니다. JSON은 `value`를, 나머지는 `table`을 사용합니다.
pub fn render<T: Serialize>(format: OutputFormat, table: &Table, value: &T) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table.to_text()),
        OutputFormat::Csv => Ok(table.to_csv()),
        OutputFormat::Json => serde_json::to_string_pretty(value).context("Failed to serialize to JSON"),
    }
}

/// `output_path`가 있으면 파일에, 없으면 stdout에 씁니다.
pub fn write_output(content: &str, output_path: Option<&str>) -> Result<()> {
    match output_path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
            info!(path, bytes = content.len(), "report written");
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// 금액 셀 (소수 둘째 자리).
pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["month", "fv"]);
        table.push(vec!["11".into(), money(1234.5)]);
        table.push(vec!["23".into(), money(99.0)]);
        table
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_columns_are_aligned() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "month       fv");
        assert_eq!(lines[2], "   11  1234.50");
        assert_eq!(lines[3], "   23    99.00");
    }

    #[test]
    fn test_csv() {
        let mut table = sample();
        table.push(vec!["a,b".into(), "x".into()]);
        assert_eq!(table.to_csv(), "month,fv\n11,1234.50\n23,99.00\n\"a,b\",x");
    }

    #[test]
    fn test_json_uses_value() {
        let json = render(OutputFormat::Json, &sample(), &vec![1, 2]).unwrap();
        assert_eq!(serde_json::from_str::<Vec<i32>>(&json).unwrap(), vec![1, 2]);
    }
}
