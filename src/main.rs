use anyhow::Context;
use clap::Parser;
use luxmed_hunter::core::table::{render, OutputFormat, TableRow};
use luxmed_hunter::domain::ports::ConfigProvider;
use luxmed_hunter::utils::error::ErrorSeverity;
use luxmed_hunter::utils::{logger, validation::Validate};
use luxmed_hunter::{
    AppConfig, Cli, Command, HttpLuxmedApi, HunterError, JsonFileStore, LocalStorage, LuxmedHunter,
    ReferenceCache, TermQuery,
};

type Hunter = LuxmedHunter<HttpLuxmedApi, JsonFileStore, LocalStorage>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    let config = match AppConfig::load_or_default(&cli.config).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration from '{}' rejected: {}", cli.config, e);
            exit_with(&e);
        }
    };

    let hunter = match build_hunter(&config) {
        Ok(hunter) => hunter,
        Err(e) => exit_with(&e),
    };

    let table = match run(&hunter, &cli.command, cli.format).await {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(
                "Command failed: {} (category: {:?}, severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e);
        }
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &table).with_context(|| format!("writing {}", path))?;
            tracing::info!("Output saved to: {}", path);
        }
        None => print!("{}", table),
    }

    Ok(())
}

fn build_hunter(config: &AppConfig) -> luxmed_hunter::Result<Hunter> {
    let api = HttpLuxmedApi::new(config.api.clone())?;
    let reference = ReferenceCache::new(
        JsonFileStore::new(config.cache_path()),
        LocalStorage::new(config.export_dir().to_string()),
        config.refresh_pause(),
    );
    Ok(LuxmedHunter::new(api, reference))
}

async fn run(hunter: &Hunter, command: &Command, format: OutputFormat) -> luxmed_hunter::Result<String> {
    match command {
        Command::Cities => table(&hunter.cities().await?, format),
        Command::Services => table(&hunter.services().await?, format),
        Command::Clinics { city, service } => table(&hunter.clinics(city, service).await?, format),
        Command::Doctors {
            city,
            service,
            clinic,
        } => table(
            &hunter.doctors(city, service, clinic.as_deref()).await?,
            format,
        ),
        Command::Terms {
            city,
            service,
            days,
            doctor,
            clinic,
        } => {
            let query = TermQuery {
                city: city.clone(),
                service: service.clone(),
                lookup_days: *days,
                doctor: doctor.clone(),
                clinic: clinic.clone(),
            };
            table(&hunter.get_available_terms_translated(&query).await?, format)
        }
        Command::Refresh => {
            let data = hunter.refresh_reference_data().await?;
            Ok(format!(
                "Refreshed {} cities and {} services\n",
                data.cities.len(),
                data.services.len()
            ))
        }
    }
}

fn table<R: TableRow>(rows: &[R], format: OutputFormat) -> luxmed_hunter::Result<String> {
    tracing::info!("{} rows", rows.len());
    render(rows, format)
}

fn exit_with(e: &HunterError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
