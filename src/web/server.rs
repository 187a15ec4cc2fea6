use crate::store::RemoteStoreFacade;
use anyhow::Result;
use log::info;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::{oneshot, Mutex};

use super::api;

pub struct WebServer {
    address: SocketAddr,
    facade: Arc<RemoteStoreFacade>,
    max_upload_size: u64,
    shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl WebServer {
    pub fn new(address: SocketAddr, facade: Arc<RemoteStoreFacade>, max_upload_size: u64) -> Self {
        Self {
            address,
            facade,
            max_upload_size,
            shutdown_tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Serves until [`WebServer::shutdown`] is called.
    pub async fn run(&self) -> Result<()> {
        let routes = api(Arc::clone(&self.facade), self.max_upload_size);

        let (tx, rx) = oneshot::channel();
        {
            *self.shutdown_tx.lock().await = Some(tx);
        }

        let (addr, server) =
            warp::serve(routes).try_bind_with_graceful_shutdown(self.address, async {
                rx.await.ok();
            })?;
        info!("Web server listening on http://{}", addr);

        server.await;
        info!("Web server stopped");
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            tx.send(())
                .map_err(|_| anyhow::anyhow!("无法发送关闭信号"))?;
        }
        Ok(())
    }
}
