use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the TOML config file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub webdav_url: Option<String>,

    #[arg(long)]
    pub webdav_username: Option<String>,

    #[arg(long)]
    pub webdav_password: Option<String>,

    #[arg(long)]
    pub server_addr: Option<String>,

    #[arg(long)]
    pub server_port: Option<u16>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
