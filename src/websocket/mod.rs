pub mod handler;
pub mod messages;

pub use handler::{broadcast_solution, broadcast_to_board, handle_websocket, toggle_messages};
