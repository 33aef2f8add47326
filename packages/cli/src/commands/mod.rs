pub mod body;
pub mod init;
pub mod library;
pub mod update;

pub use body::{body, BodyCommand};
pub use init::{init, InitArgs};
pub use library::{library, LibraryCommand};
pub use update::{check_update, UpdateArgs};
