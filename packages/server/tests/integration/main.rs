mod achievements;
mod auth;
mod cats;
mod gallery;
mod litters;
