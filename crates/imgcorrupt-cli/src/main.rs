use imgcorrupt_cli::{Args, RunConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    let config: RunConfig = args.into_config()?;

    if let Some(num_threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }

    log::info!("🚀 Starting to corrupt the images");

    let summary = imgcorrupt_cli::run(&config)?;

    log::info!(
        "🔥 Done: {} written, {} skipped, {} failed",
        summary.written,
        summary.skipped,
        summary.failed
    );

    if summary.failed > 0 {
        return Err(format!("{} jobs failed", summary.failed).into());
    }

    Ok(())
}
