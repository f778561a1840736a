pub mod notification;
pub mod promise;
pub mod result;
pub mod user;
pub mod vote;
