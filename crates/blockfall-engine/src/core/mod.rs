pub use self::{collision::*, grid::*, piece::*};

pub(crate) mod collision;
pub(crate) mod grid;
pub(crate) mod piece;
