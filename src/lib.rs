pub mod config;
pub mod logger;
pub mod meta;
pub mod document;
pub mod collection;
pub mod util;
pub mod folder_list;
pub mod post_processor;
pub mod asset_manager;
pub mod path_updater;
pub mod hooks;
mod test_data;
