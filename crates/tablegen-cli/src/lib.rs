//! Library side of the `tablegen` binary: logging setup and the session
//! that holds loaded inputs between commands.

pub mod logging;
pub mod session;

pub use session::{EmptySelection, GeneratedTable, Session, SessionError};
