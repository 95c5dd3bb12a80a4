mod book;
mod client;
mod identity;
mod order;

pub use self::{book::*, client::*, identity::*, order::*};
