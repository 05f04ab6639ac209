use clap::Parser;
use json_to_xml::config::Layered;
use json_to_xml::core::ConfigProvider;
use json_to_xml::utils::logger;
use json_to_xml::{CliConfig, Dispatcher, FileSinkFactory, PipelineError, ReqwestClient, RunConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let client = match ReqwestClient::new(config.timeout) {
        Ok(client) => client,
        Err(e) => fail(e),
    };

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }
    let dispatcher = Dispatcher::new(config, client, FileSinkFactory).with_monitor(cli.monitor);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        print_plan(&dispatcher);
        return Ok(());
    }

    match dispatcher.run().await {
        Ok(summary) => {
            if summary.failed > 0 {
                tracing::warn!("{} of {} urls failed", summary.failed, summary.urls_processed);
            }
            tracing::debug!("Run summary: {}", serde_json::to_string(&summary)?);
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn resolve_config(cli: &CliConfig) -> json_to_xml::Result<RunConfig> {
    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Some(TomlConfig::from_file(path)?)
        }
        None => None,
    };

    RunConfig::from_provider(&Layered::new(
        cli,
        file.as_ref().map(|f| f as &dyn ConfigProvider),
    ))
}

fn print_plan(dispatcher: &Dispatcher<ReqwestClient, FileSinkFactory>) {
    let config = dispatcher.config();
    println!("📋 Plan:");
    println!("  Output: {}", config.output_dir.display());
    println!("  Timeout: {:?}", config.timeout);
    println!("  Concurrency: {}", config.concurrency);
    for assignment in dispatcher.plan() {
        println!("  {} -> {}", assignment.url, assignment.output_path.display());
    }
}

fn fail(e: PipelineError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let code = e.severity().exit_code();
    std::process::exit(if code == 0 { 1 } else { code })
}
