use anyhow::Context;
use pointclaim::{cli::config_path_from_args, config::Config, logging, runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let _logging_guard = logging::init_tracing(&config.logging)?;
    let cookie = config.claim.credential.resolve()?;

    runner::run(&config, cookie).await?;
    Ok(())
}
