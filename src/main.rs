use anyhow::Result;
use study_circle::{cli, logger};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logger::init() {
        eprintln!("Failed to initialize logger: {e}");
    }

    cli::main().await
}
