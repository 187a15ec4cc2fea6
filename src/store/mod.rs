pub mod facade;
pub mod models;
pub mod outcome;
pub mod traits;

pub use self::facade::RemoteStoreFacade;
pub use self::models::{DownloadedFile, RemoteEntry, UploadedFileRecord};
pub use self::outcome::{OperationOutcome, ResCode};
pub use self::traits::RemoteStore;
