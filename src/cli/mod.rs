// CLI module
// Readline input and the interactive prompt loop

mod input;
mod repl;

pub use input::InputHandler;
pub use repl::Repl;
