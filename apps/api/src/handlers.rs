pub mod health;
pub mod records;
pub mod role_permissions;
pub mod roles;
pub mod session;
pub mod users;
