pub mod execution_command;
pub mod process;
pub mod repository_retrying;
pub mod svn_command;
