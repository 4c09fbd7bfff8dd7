use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt::init();
    let account = mock_server::Account::new(
        std::env::var("PETFRIENDS_EMAIL").unwrap_or_else(|_| "tester@petfriends.dev".to_string()),
        std::env::var("PETFRIENDS_PASSWORD").unwrap_or_else(|_| "P@ssw0rd!".to_string()),
    );
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    mock_server::run(listener, account).await
}
