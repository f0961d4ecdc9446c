//! Entity aggregation: fetch rows from several tables and join them in memory
//! into denormalized views.
//!
//! Every routine has a fallible `try_` form. The non-`try_` forms used by public
//! listings log the failure and return an empty list instead.

mod achievements;
mod cats;
mod join;
mod litters;
pub mod ordering;

pub use achievements::{fetch_achievements, try_fetch_achievement, try_fetch_achievements};
pub use cats::{
    CatFilter, fetch_cats_with_details, try_fetch_cat, try_fetch_cats_by_ids,
    try_fetch_cats_with_details,
};
pub use join::{COLOR_GENETICS_TEST_NAME, COLOR_TEST_TYPE, retain_complete_litters};
pub use litters::{
    fetch_litters_by_status, try_fetch_litter, try_fetch_litters_by_status, try_fetch_litters_page,
};
