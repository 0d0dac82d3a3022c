//! Shoebox Storage Library
//!
//! The upload client abstraction the batch uploader talks to, plus a local
//! filesystem implementation of it.
//!
//! An upload is a three step handshake: the client hands out an `Uploader`
//! for one file, the uploader starts the transfer and returns an
//! `UploadController`, and the controller resolves to an `UploadReceipt`
//! once the transfer is complete.

pub mod fingerprint;
pub mod local;
pub mod traits;

pub use fingerprint::sha1_hex;
pub use local::LocalDriveClient;
pub use traits::{
    StorageError, StorageResult, Thumbnail, UploadClient, UploadController, UploadMetadata,
    UploadReceipt, Uploader,
};
