pub mod compile;
pub mod execute;
pub mod shell;
pub mod stubs;
pub mod versions;

pub use compile::compile_command;
pub use execute::execute_command;
pub use shell::shell_command;
pub use stubs::stubs_command;
pub use versions::versions_command;
