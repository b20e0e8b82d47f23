pub mod check;
pub mod repl;
pub mod send;
pub mod serve;
