use anyhow::Result;
use log::LevelFilter;
use matwrap::DemoOptions;
use matwrap::tasks;
use matwrap::utils::memory::TrackingAllocator;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("MATWRAP_LOG", "warn"))
        .init();

    let options = DemoOptions::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tasks::run_all(&options, &mut out)?;
    Ok(())
}
