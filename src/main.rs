use clap::Parser;
use family_loader::config::cli::{Cli, Command};
use family_loader::config::toml_config::FileConfig;
use family_loader::core::maintenance;
use family_loader::core::{DeleteRun, ImportOutcome, ImportRun};
use family_loader::utils::{console, logger, validation::Validate};
use family_loader::{
    ImportEngine, ImportPipeline, LoaderError, LocalStorage, Settings, SupabaseClient,
    TerminalConfirm,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            e.severity().exit_code()
        }
    };

    std::process::exit(exit_code);
}

fn title(command: &Command) -> &'static str {
    match command {
        Command::Import(_) => "IMPORT FAMILY MEMBERS TO SUPABASE",
        Command::Delete => "DELETE FAMILY TREE",
        Command::Backup(_) => "BACKUP FAMILY TREES",
        Command::Slugs => "FAMILY TREE SLUGS",
    }
}

async fn run(cli: &Cli) -> Result<i32, LoaderError> {
    let command = cli.command();
    println!("{}", console::banner(title(&command)));

    let file = cli
        .config
        .as_deref()
        .map(FileConfig::from_file)
        .transpose()?;
    let settings = Settings::resolve(file, &cli.overrides());
    tracing::debug!(
        url = %settings.supabase_url,
        key = %settings.masked_key(),
        tree_slug = %settings.tree_slug,
        table = %settings.table,
        "Resolved settings"
    );

    settings.validate()?;

    println!("📡 Connecting to Supabase...");
    let client = SupabaseClient::connect(&settings.supabase_url, &settings.supabase_key)?;
    println!("✅ Connected!\n");

    match command {
        Command::Import(_) => import(client, settings).await,
        Command::Delete => delete(client, settings).await,
        Command::Backup(_) => backup(client, settings).await,
        Command::Slugs => slugs(client, settings).await,
    }
}

async fn import(client: SupabaseClient, settings: Settings) -> Result<i32, LoaderError> {
    println!("📂 Loading {}...", settings.input_file);

    let pipeline = ImportPipeline::new(LocalStorage::new("."), client, settings);
    let engine = ImportEngine::new(pipeline, TerminalConfirm);

    match engine.run().await? {
        ImportRun::Cancelled => {
            println!("❌ Import cancelled by user");
            Ok(0)
        }
        ImportRun::Finished(summary) => {
            println!();
            print!("{}", console::render_summary(&summary));
            println!();
            println!("{}", console::rule());

            Ok(match summary.outcome() {
                ImportOutcome::Complete => 0,
                ImportOutcome::Partial => 2,
                ImportOutcome::Failed => 1,
            })
        }
    }
}

async fn delete(client: SupabaseClient, settings: Settings) -> Result<i32, LoaderError> {
    let run =
        maintenance::delete_tree(&client, &TerminalConfirm, &settings.table, &settings.tree_slug)
            .await?;

    match run {
        DeleteRun::Empty => println!("ℹ️  Nothing to delete"),
        DeleteRun::Cancelled => println!("❌ Cancelled by user"),
        DeleteRun::Deleted { count } => {
            println!("✅ Successfully deleted all members!");
            println!("🔢 Total deleted: {}", count);
        }
    }
    Ok(0)
}

async fn backup(client: SupabaseClient, settings: Settings) -> Result<i32, LoaderError> {
    let storage = LocalStorage::new(settings.backup_dir.clone());
    let today = chrono::Utc::now().date_naive();

    println!("📥 Fetching members from '{}'...", settings.table);
    let report = maintenance::backup_trees(&client, &storage, &settings.table, today).await?;
    print!("{}", console::render_backup(&report));
    Ok(0)
}

async fn slugs(client: SupabaseClient, settings: Settings) -> Result<i32, LoaderError> {
    println!("🔎 Checking tree slugs in '{}'...", settings.table);
    let counts = maintenance::slug_counts(&client, &settings.table).await?;
    print!("{}", console::render_slug_counts(&counts));
    Ok(0)
}
