mod error;
mod handlers;

use std::error::Error;

use axum_server::tls_rustls::RustlsConfig;
use clientele::{infrastructure::MongoCustomerRepository, ClienteleConfig};
use tracing::{error, info, Level};

use crate::handlers::{router, AppState};

#[tokio::main]
async fn main() {
    match ClienteleConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = serve(&config).await {
                error!("アプリケーションエラー: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("設定読み込みエラー: {}", error)
        }
    }
}

async fn serve(config: &ClienteleConfig) -> Result<(), Box<dyn Error>> {
    let repository = MongoCustomerRepository::connect(&config.database).await?;
    let app = router(AppState::new(repository));
    let address = config.server.address;

    match &config.server.tls {
        Some(tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            info!("https://{} で待ち受けます", address);
            axum_server::bind_rustls(address, rustls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("http://{} で待ち受けます", address);
            axum_server::bind(address)
                .serve(app.into_make_service())
                .await?;
        }
    }
    Ok(())
}
