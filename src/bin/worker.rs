#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = ecampus_rust::run_worker().await {
        eprintln!("ecampus-worker fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
