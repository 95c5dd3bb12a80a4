mod book;
mod client;
mod order;

pub use self::{book::*, client::*, order::*};
