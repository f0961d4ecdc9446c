pub mod achievement;
pub mod cat;
pub mod gallery;
pub mod litter;
pub mod lookup;
pub mod shared;
