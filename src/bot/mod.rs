pub mod access;
pub mod commands;
pub mod gateway;
pub mod handlers;
pub mod keyboards;
pub mod session;
