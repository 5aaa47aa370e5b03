//! Grammars of the commands that are parsed beyond their name.

mod execute;
mod function;
mod schedule;
