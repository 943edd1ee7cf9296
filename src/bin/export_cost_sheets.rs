// Small utility: export all active cost sheets to CSV.
//
// Usage:
//   cargo run --bin export_cost_sheets -- [db_path] [out.csv]
//
// Without out.csv the CSV is written to stdout.

use awning_estimator::app::{get_default_db_path, AppState};
use awning_estimator::engine::CostSheetFilter;
use awning_estimator::i18n;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    awning_estimator::logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(get_default_db_path);
    let out = args.next();

    let state = AppState::new(db_path)?;
    let filter = CostSheetFilter::default();

    match out {
        Some(path) => {
            let rows = state
                .dashboard_api
                .export_csv_to_path(&filter, Path::new(&path))?;
            eprintln!(
                "{}",
                i18n::t_with_args(
                    "export.file_written",
                    &[("count", rows.to_string().as_str()), ("path", path.as_str())]
                )
            );
        }
        None => {
            state
                .dashboard_api
                .export_csv(&filter, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
