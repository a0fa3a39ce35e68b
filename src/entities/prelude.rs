pub use super::requests::Entity as Requests;
pub use super::vote_logs::Entity as VoteLogs;
