use airtable_upload::utils::logger;
use airtable_upload::{AirtableClient, CliArgs, ImportEngine, ImportError, ImportSettings};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help / --version print to stdout and succeed; usage errors exit 1
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logger::init_cli_logger(args.verbose);

    // 驗證配置
    let settings = match ImportSettings::resolve(&args) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    let client = match AirtableClient::new(&settings.connection) {
        Ok(client) => client,
        Err(e) => fail(e),
    };

    let engine = ImportEngine::new(client, &settings);
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();

    if let Err(e) = engine.run(stdin, stdout).await {
        fail(e);
    }
}

fn fail(e: ImportError) -> ! {
    tracing::debug!("Import failed: {:?}", e);
    tracing::debug!("Suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    std::process::exit(1);
}
