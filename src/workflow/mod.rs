pub mod commit;
pub mod credential;
pub mod generate;
