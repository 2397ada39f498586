use clap::Parser;
use spring_dr_config::config::cli::LogFormat;
use spring_dr_config::domain::model::RunReport;
use spring_dr_config::utils::{logger, validation::Validate};
use spring_dr_config::{
    CliConfig, DrEngine, DrError, EnvironmentResolver, GitCliPublisher, LocalStorage, ProcessEnv,
};

fn run(config: &CliConfig) -> Result<RunReport, DrError> {
    let settings = config.settings()?;

    // 驗證配置
    settings.validate()?;
    for unknown in settings.unknown_services() {
        tracing::warn!("Service {} is not in the known service catalogue", unknown);
    }
    tracing::info!(
        "✅ Configuration loaded: {} services in {}",
        settings.services.len(),
        settings.working_dir.display()
    );

    // 先解析所有環境變數，缺少任何一個就不處理任何服務
    let plan = EnvironmentResolver::new(&ProcessEnv)
        .plan(&settings.services, &settings.working_dir)?;

    let publisher = GitCliPublisher::new(settings.working_dir.clone());
    let mut engine = DrEngine::new(LocalStorage::new(), publisher, settings);
    engine.run(&plan)
}

fn main() {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting spring-dr-config");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config) {
        Ok(report) => {
            tracing::info!(
                "✅ DR profiles generated for {} services (publish: {:?})",
                report.services.len(),
                report.publish
            );
            for outcome in &report.services {
                println!("{} -> {}", outcome.service, outcome.output.display());
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ DR profile generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}
