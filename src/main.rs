use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = magazine_subscriptions::run().await {
        error!("magazine-subscriptions exited with error: {}", error);
        std::process::exit(1);
    }
}
