#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = ecampus_rust::run().await {
        eprintln!("ecampus-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
