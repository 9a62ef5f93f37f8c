pub mod postgres_entry_repository;
pub mod postgres_user_repository;

pub use postgres_entry_repository::PostgresEntryRepository;
pub use postgres_user_repository::PostgresUserRepository;
