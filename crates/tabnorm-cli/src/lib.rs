//! Library side of the `tabnorm` binary: logging setup, command runners and
//! output rendering.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
