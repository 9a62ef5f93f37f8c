pub mod account_service;
pub mod entry_service;

pub use account_service::AccountService;
pub use entry_service::EntryService;
