pub mod achievement;
pub mod cat;
pub mod gallery;
pub mod image;
pub mod litter;
pub mod lookup;
