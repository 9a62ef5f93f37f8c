use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User};
use anyhow::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    /// First account whose stored kin_email matches, if any.
    async fn find_by_kin_email(&self, kin_email: &str) -> Result<Option<User>>;
    async fn list_all(&self) -> Result<Vec<User>>;
    async fn update_profile(&self, id: i64, username: &str, kin_email: &str) -> Result<User>;
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()>;
}
