pub mod webdav;

pub use webdav::WebDAVClient;
