//! Value grammars shared between commands.

mod blockstate;
mod nbt;
mod range;
mod resource_location;
mod selector;
mod vector;
