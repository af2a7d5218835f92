pub mod committees;
pub mod create;
pub mod delete;
pub mod list;
pub mod registrations;
pub mod validate;
