//! `caseflow list` command handler

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `list` command.
pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    let registry = super::builtin_registry()?;
    let report = ScenarioList {
        total: registry.count(),
        scenarios: registry
            .list()
            .into_iter()
            .map(|entry| ScenarioRow {
                kind: entry.kind().to_owned(),
                description: entry.description().to_owned(),
            })
            .collect(),
    };
    writer.render(&report)
}

/// Registered scenario kinds.
#[derive(Serialize)]
pub struct ScenarioList {
    pub total: usize,
    pub scenarios: Vec<ScenarioRow>,
}

#[derive(Serialize)]
pub struct ScenarioRow {
    pub kind: String,
    pub description: String,
}

impl Render for ScenarioList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scenarios ({} registered)", self.total.to_string().bold())?;
        writeln!(w, "{:<16} Description", "Kind")?;
        writeln!(w, "{}", "-".repeat(64))?;
        for row in &self.scenarios {
            writeln!(w, "{:<16} {}", row.kind.cyan(), row.description)?;
        }
        Ok(())
    }
}
