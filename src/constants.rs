pub mod board {

    pub const DEFAULT_MAX_REQUESTS: u64 = 10;

    pub const INITIAL_VOTES: i32 = 1;
}

pub mod routes {

    pub const BOARD: &str = "/";

    pub const OWNER_PANEL: &str = "/owner_panel";
}
