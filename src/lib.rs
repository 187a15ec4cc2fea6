pub mod cli;
pub mod config;
pub mod errors;
pub mod logger;
pub mod network;
pub mod path;
pub mod store;
pub mod web;

pub use cli::{parse_args, Args};
pub use config::{get_config_path, Config};
pub use network::WebDAVClient;
pub use store::{OperationOutcome, RemoteStore, RemoteStoreFacade};
pub use web::WebServer;
