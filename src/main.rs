#[tokio::main]
async fn main() -> anyhow::Result<()> {
    folio_admin::run().await
}
