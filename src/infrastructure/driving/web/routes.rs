use actix_web::{web, Scope};

use super::handlers::{
    account, contact, entry_info, home, login, logout, new_entry, register, request_kin_reset,
    request_reset, reset_password, update_account,
};
use crate::application::services::{AccountService, EntryService};
use crate::infrastructure::driven::database::{PostgresEntryRepository, PostgresUserRepository};
use crate::infrastructure::driven::email::WebhookNotifier;

type Accounts = AccountService<PostgresUserRepository, PostgresEntryRepository, WebhookNotifier>;
type Entries = EntryService<PostgresEntryRepository>;

pub fn diary_routes() -> Scope {
    web::scope("")
        .route("/", web::get().to(home::<Accounts, Entries>))
        .route("/home", web::get().to(home::<Accounts, Entries>))
        .route("/entry", web::get().to(entry_info))
        .route("/contact", web::get().to(contact))
        .route("/register", web::post().to(register::<Accounts, Entries>))
        .route("/login", web::post().to(login::<Accounts, Entries>))
        .route("/logout", web::get().to(logout))
        .route("/newentry", web::post().to(new_entry::<Accounts, Entries>))
        .route("/account", web::get().to(account::<Accounts, Entries>))
        .route(
            "/account",
            web::post().to(update_account::<Accounts, Entries>),
        )
        .route(
            "/reset_password",
            web::post().to(request_reset::<Accounts, Entries>),
        )
        .route(
            "/reset_password/{token}",
            web::post().to(reset_password::<Accounts, Entries>),
        )
        .route(
            "/kin_reset_password",
            web::post().to(request_kin_reset::<Accounts, Entries>),
        )
}
