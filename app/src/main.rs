#[tokio::main]
async fn main() -> anyhow::Result<()> {
    route_composer_app::run().await
}
