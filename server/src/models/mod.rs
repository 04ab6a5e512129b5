// server/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart;
pub mod product;
pub mod review;
pub mod session;
pub mod user;

// Re-export the model structs for convenient access
pub use cart::{Cart, CartItem};
pub use product::{GalleryImage, Product};
pub use review::Review;
pub use session::Session;
pub use user::User;
