mod book;
mod client;
mod common;
mod order;

pub use self::{book::*, client::*, common::*, order::*};
