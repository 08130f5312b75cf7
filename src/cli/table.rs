//! Per-file summary table for verbose runs

use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::core::pipeline::FileOutcome;

/// Widest an error message may get in the status column
const STATUS_WIDTH: usize = 60;

/// Render one row per manifest entry: file, object, data rows, status
pub fn outcome_table(outcomes: &[FileOutcome]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["File", "Object", "Rows", "Status"]);

    for outcome in outcomes {
        let (rows, status) = match &outcome.result {
            Ok(processed) if processed.normalized.renamed => (
                processed.normalized.data_rows.to_string(),
                "ok (Id renamed)".to_string(),
            ),
            Ok(processed) => (
                processed.normalized.data_rows.to_string(),
                "ok".to_string(),
            ),
            Err(e) => ("-".to_string(), truncate_str(&e.to_string(), STATUS_WIDTH)),
        };

        builder.push_record([
            outcome.file.clone(),
            outcome.object_name(),
            rows,
            status,
        ]);
    }

    builder.build().with(Style::rounded()).to_string()
}
