pub mod prelude;

pub mod requests;
pub mod vote_logs;
