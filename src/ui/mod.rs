//! Console rendering and operator input

mod console;
mod messages;
mod tree;

pub use console::ConsoleOperator;
pub use messages::{format_time, Messages};
pub use tree::TreeLayout;
