use crate::domain::shopping::{IngredientLine, ShoppingList};
use crate::utils::error::{PlannerError, Result};
use serde::Serialize;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct ExportRow<'a> {
    ingredient: &'a str,
    measure: String,
    checked: bool,
}

impl<'a> From<&'a IngredientLine> for ExportRow<'a> {
    fn from(line: &'a IngredientLine) -> Self {
        Self {
            ingredient: &line.name,
            measure: line.measure(),
            checked: line.checked,
        }
    }
}

pub fn render(list: &ShoppingList, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(render_text(list)),
        ExportFormat::Csv => render_csv(list),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(
            &list.lines.iter().map(ExportRow::from).collect::<Vec<_>>(),
        )?),
    }
}

/// One `"{mark} {measure} {ingredient}"` line per ingredient.
pub fn render_text(list: &ShoppingList) -> String {
    list.lines
        .iter()
        .map(|line| {
            let mark = if line.checked { "✓" } else { "○" };
            format!("{} {} {}", mark, line.measure(), line.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_csv(list: &ShoppingList) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for line in &list.lines {
        writer.serialize(ExportRow::from(line))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PlannerError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
