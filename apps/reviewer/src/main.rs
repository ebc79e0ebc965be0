#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    reveal_reviewer::run().await
}
