pub mod in_ports;
pub mod notifier;

pub use in_ports::{
    AuthenticationUseCase, DormancyUseCase, EntryManagementUseCase, PasswordResetUseCase,
    ProfileUseCase, RegistrationUseCase,
};
pub use notifier::{Notifier, OutboundEmail};
