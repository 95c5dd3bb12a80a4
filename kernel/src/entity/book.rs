mod author;
mod copies;
mod id;
mod title;

pub use self::{author::*, copies::*, id::*, title::*};
use crate::entity::common::Version;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    copies: CopiesNumber,
    version: Version<Book>,
}

impl Book {
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        copies: CopiesNumber,
        version: Version<Book>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            copies,
            version,
        }
    }

    pub(crate) fn take_copy(&mut self) {
        self.copies = self.copies.decremented();
    }

    pub(crate) fn put_copy(&mut self) {
        self.copies = self.copies.incremented();
    }
}
