#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vrchat_joiner_lib::run().await
}
