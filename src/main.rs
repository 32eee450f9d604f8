#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = giiku_client::run().await {
        eprintln!("giiku fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
