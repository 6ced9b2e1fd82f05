use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use plano_contas::source::{AccountSource, DbAccountSource, StaticAccountSource};
use plano_contas::{db, render, routes, AppState, Config, TreeBuilder};

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .skip_while(|arg| arg.as_str() != flag)
        .nth(1)
        .map(|s| s.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-help" || arg == "--help") {
        println!("Usage: plano-contas [OPTIONS]");
        println!("Options:");
        println!("  -config <path>  Path to configuration file (default: ./etc/plano-contas.toml)");
        println!("  --seed <path>   Serve accounts from a JSON file instead of the database");
        println!("  --print         Print the account tree and exit");
        println!("  -help, --help   Print this help message");
        return Ok(());
    }

    let config_path =
        flag_value(&args, "-config").unwrap_or_else(|| "./etc/plano-contas.toml".to_string());

    // Load configuration first (before logging init)
    let mut config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Could not load config file: {}, using defaults", e);
        Config::default()
    });
    if let Some(seed) = flag_value(&args, "--seed") {
        config.seed_file = Some(PathBuf::from(seed));
    }

    // Priority: RUST_LOG env var > config file > default "info"
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting plano-contas...");
    info!("Loading configuration from: {}", config_path);

    let source: Arc<dyn AccountSource> = match (&config.seed_file, &config.database) {
        (Some(seed), _) => {
            info!("Serving accounts from seed file {}", seed.display());
            Arc::new(StaticAccountSource::from_json_file(seed)?)
        }
        (None, Some(database)) => {
            let conn = db::init_database(database).await.map_err(|e| {
                tracing::error!("Database initialization failed: {}", e);
                anyhow::anyhow!("Database initialization failed: {}", e)
            })?;
            Arc::new(DbAccountSource::new(conn))
        }
        (None, None) => {
            anyhow::bail!(
                "No account source: add {}/db.toml or pass --seed <file>",
                config.config_dir.display()
            );
        }
    };

    if args.iter().any(|arg| arg == "--print") {
        let accounts = source.list_accounts().await?;
        let forest = TreeBuilder::new(config.tree.ordering.comparator())
            .duplicates(config.tree.duplicates)
            .max_depth(config.tree.max_depth)
            .build(&accounts)?;
        print!("{}", render::render_text(&forest, 2));
        return Ok(());
    }

    let state = AppState::new(source, config.clone());
    let app = routes::create_router(state);

    let addr: SocketAddr = match config.addr.parse() {
        Ok(addr) => addr,
        Err(_) => {
            tracing::warn!("Invalid address '{}', using default 0.0.0.0:8080", config.addr);
            SocketAddr::from(([0, 0, 0, 0], 8080))
        }
    };

    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
