use clap::Parser;
use csv_geocode::core::ConfigProvider;
use csv_geocode::utils::error::ErrorSeverity;
use csv_geocode::utils::{logger, validation::Validate};
use csv_geocode::{
    enrich, preview, AdresseApiClient, CliConfig, EnrichError, EnrichOutcome, LocalStorage,
    Settings,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting csv-geocode");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Geocoding failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: &CliConfig) -> Result<(), EnrichError> {
    let settings = Settings::from_cli(cli)?;
    settings.validate()?;
    tracing::debug!("Settings: {:?}", settings);

    let storage = LocalStorage::default();

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no request is sent and the file is not modified");
        let plan = preview(&storage, settings.input_path(), settings.selector()).await?;

        println!("📋 Columns: {}", plan.layout.output_headers.to_text().join(";"));
        for field in csv_geocode::domain::model::LogicalField::ALL {
            match plan.columns.get(field) {
                Some(column) => println!("  {:<9} -> #{} {}", field, column.position + 1, column.name),
                None => println!("  {:<9} -> (unused)", field),
            }
        }
        if plan.layout.appends_coordinates {
            println!("  latitude/longitude columns would be appended");
        }
        return Ok(());
    }

    let gateway = AdresseApiClient::from_config(&settings)?;

    match enrich(storage, gateway, settings.input_path(), settings.selector()).await? {
        EnrichOutcome::Completed(report) => {
            println!("✅ Geocoded {} of {} rows", report.matched, report.rows);
            println!("📁 Output saved to: {}", report.output_path);
        }
        EnrichOutcome::Skipped(reason) => {
            println!("⏭️  Skipped: {}", reason);
        }
    }

    Ok(())
}
