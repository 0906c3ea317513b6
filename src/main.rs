//! # Typewriter Main Entry Point

use anyhow::Result;
use typewriter::cmd_args::CommandLineArgs;
use typewriter::logging::init_tracing_subscriber;
use typewriter::AppController;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();
    init_tracing_subscriber(cmd_args.verbose())?;

    let mut app = AppController::new(cmd_args).await?;
    app.run().await
}
