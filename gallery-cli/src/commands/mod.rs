pub mod check_cmd;
pub mod new_cmd;
pub mod simulate_cmd;
pub mod walk_cmd;
