use anyhow::Result;
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use webdav_gateway::{logger, parse_args, Config, RemoteStoreFacade, WebDAVClient, WebServer};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logger::init();

    let args = parse_args();
    let config = Config::resolve(&args)?;

    let client = WebDAVClient::new(
        config.webdav_url.clone(),
        config.username.clone(),
        config.password.clone(),
    )?;

    // 验证是否可连接
    if client.is_connected().await {
        info!("Connected to WebDAV server {}", client.host());
    } else {
        warn!(
            "WebDAV server {} is not reachable, requests will fail until it is",
            client.host()
        );
    }

    let facade = Arc::new(RemoteStoreFacade::new(Arc::new(client)));
    let address = SocketAddr::new(config.server_addr.parse()?, config.server_port);
    let webserver = Arc::new(WebServer::new(address, facade, config.max_upload_size));

    let server = Arc::clone(&webserver);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down");
            if let Err(e) = server.shutdown().await {
                error!("Failed to stop web server: {}", e);
            }
        }
    });

    webserver.run().await
}
