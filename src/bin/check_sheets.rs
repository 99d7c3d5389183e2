// src/bin/check_sheets.rs
// Connects with the service's configuration and reports what each sheet holds.

use anyhow::{Context, Result};
use feedback_hub::{
    config::{Config, Sheet},
    questions::{categories, extract},
    sheets::{GoogleSheets, SheetStore},
    table::project,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const SAMPLE_ROWS: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).init();

    let config = Config::from_env();
    let client = GoogleSheets::connect(&config.credentials)
        .await
        .context("connecting to Google Sheets")?;

    for which in Sheet::ALL {
        let sheet = match config.sheet_ref(which) {
            Ok(s) => s,
            Err(e) => {
                warn!("{:?}: {}", which, e);
                continue;
            }
        };

        let title = client
            .probe(&sheet.spreadsheet_id)
            .await
            .with_context(|| format!("opening {}", sheet))?;
        let grid = client
            .read_grid(&sheet)
            .await
            .with_context(|| format!("reading {}", sheet))?;
        info!(sheet = ?which, title = %title, rows = grid.len(), "opened");

        let projection = project(&grid);
        info!(sheet = ?which, "header: {:?}", projection.header);
        for (i, row) in grid.iter().skip(1).take(SAMPLE_ROWS).enumerate() {
            info!(sheet = ?which, "row {}: {:?}", i + 1, row);
        }
        info!(sheet = ?which, records = projection.records.len(), "non-blank data rows");

        if which == Sheet::Questions {
            let items = extract(&grid);
            info!(
                questions = items.len(),
                "categories: {:?}",
                categories(&items)
            );
        }
    }

    Ok(())
}
