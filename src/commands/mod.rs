pub mod add;
pub mod content;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod relocate;
pub mod remove;
pub mod rename;
pub mod search;
pub mod view;
