pub mod change;
pub mod credential;
pub mod message;
