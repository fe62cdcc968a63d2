use std::sync::Arc;

use axum::Router;
use clap::Parser;
use lockgate::{AdjustableClock, Lockgate, LockoutConfig, StaticCredentials, StaticDirectory};
use tracing::info;

/// Command line interface for the lockgate server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Expose clock-control routes under /test so harnesses can drive the
    /// lockout window deterministically
    #[arg(long)]
    testing_mode: bool,

    /// Suppress log output
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        tracing_subscriber::fmt()
            .with_env_filter("info,lockgate=debug,lockgate_core=debug")
            .init();
    }

    // The directory of tracked identities is derived from the same account
    // table the credential store answers for.
    let credentials = Arc::new(StaticCredentials::new().with_account("admin", "admin"));
    let directory = Arc::new(StaticDirectory::new(credentials.identities()));

    // The clock reads system time until pinned; only testing mode mounts
    // the routes that can pin it.
    let clock = Arc::new(AdjustableClock::new());

    let lockgate = Arc::new(Lockgate::new(
        clock.clone(),
        directory,
        credentials,
        LockoutConfig::default(),
    ));

    let mut app = Router::new().nest("/auth", lockgate_axum::routes(lockgate));
    if cli.testing_mode {
        info!("enabling testing mode");
        app = app.nest("/test", lockgate_axum::time_routes(clock));
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cli.port)).await?;
    info!("listening on {}", listener.local_addr()?);
    info!("available endpoints:");
    info!("  POST   /auth/login              - Authenticate a username/password pair");
    info!("  GET    /auth/lockout/{{identity}} - Lockout status for an identity");
    info!("  GET    /auth/health             - Health check");
    if cli.testing_mode {
        info!("  GET    /test/time               - Current clock reading");
        info!("  PUT    /test/time               - Pin the clock to an instant");
        info!("  DELETE /test/time               - Restore system time");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
