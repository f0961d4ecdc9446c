pub mod achievement;
pub mod blood_type;
pub mod cat;
pub mod cat_blood_type;
pub mod cat_color;
pub mod cat_litter;
pub mod cat_variety;
pub mod color;
pub mod enums;
pub mod image;
pub mod litter;
pub mod variety;

pub use enums::{CatStatus, Gender, LitterStatus};
