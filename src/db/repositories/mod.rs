pub mod request;
pub mod vote_ledger;
