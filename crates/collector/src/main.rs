use collector::{get_config_info, Cli, DustService, TimeWindow, View};
use dust_monitor_core::setup_logger;
use slog::{debug, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = get_config_info()?;
    let logger = setup_logger(cli.level.as_deref());

    info!(logger, "Dust collector starting...");
    info!(logger, "  Upstream: {}", cli.fetch.base_url());
    info!(logger, "  View: {:?}", cli.view());
    debug!(logger, "  Networks: {:?}", cli.fetch.fetch_config().networks);

    let service = cli.fetch.build_service(&logger)?;
    let output = run_view(&service, &cli).await?;
    println!("{}", output);
    Ok(())
}

async fn run_view(service: &DustService, cli: &Cli) -> Result<String, anyhow::Error> {
    let window = || {
        TimeWindow::from_query(cli.hours, cli.start.as_deref(), cli.end.as_deref())
    };
    let station = cli.station.as_deref();

    let value = match cli.view() {
        View::All => serde_json::to_value(service.observations(&window()?, station).await?)?,
        View::Summary => serde_json::to_value(service.summary(&window()?).await?)?,
        View::Map => serde_json::to_value(service.map_points(&window()?).await?)?,
        View::Windrose => serde_json::to_value(service.wind_rose(&window()?, station).await?)?,
        View::Report => {
            let date = cli.date.as_deref().unwrap_or("");
            serde_json::to_value(service.report(date).await?)?
        }
    };
    Ok(serde_json::to_string_pretty(&value)?)
}
