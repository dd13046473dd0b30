pub mod check;
pub mod init;
pub mod run;

pub use check::check_command;
pub use init::init_command;
pub use run::run_command;
