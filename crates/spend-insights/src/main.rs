mod bootstrap;

use anyhow::Result;
use insights_core::assistant::SpendingAssistant;
use insights_core::households::reference_households;
use insights_core::settings::Settings;
use insights_data::analysis::load_and_analyze;
use insights_data::source;
use insights_ui::app::App;
use insights_ui::report::render_report;
use insights_ui::spending_view::SpendingPanel;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();
    let dashboard = settings.view == "dashboard";

    bootstrap::ensure_directories()?;

    // The dashboard owns the terminal, so its logs go to a file.
    let log_file = match (&settings.log_file, dashboard) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(bootstrap::default_log_path()),
        (None, false) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Spend Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    // The HTTP client is blocking; build, use and drop it off the executor.
    let fetch_settings = settings.clone();
    let (description, result) = tokio::task::spawn_blocking(move || {
        match source::from_settings(&fetch_settings) {
            Ok(src) => {
                let description = src.describe();
                let result = load_and_analyze(src.as_ref(), &fetch_settings.required_columns());
                (description, result)
            }
            Err(e) => (fetch_settings.sheet.clone(), Err(e)),
        }
    })
    .await?;

    if let Err(e) = &result {
        if e.is_precondition() {
            tracing::warn!("{}", e);
        } else {
            tracing::error!("{}", e);
        }
    }
    let panel = SpendingPanel::from_result(result);

    // clap only admits "dashboard" and "report".
    if dashboard {
        let app = App::new(&settings.theme, description, panel);
        app.run_dashboard().await?;
    } else {
        let text = render_report(
            &description,
            &panel,
            &reference_households(),
            &SpendingAssistant::new(),
        );
        println!("{}", text);
    }

    Ok(())
}
