mod cart;
mod envelope;
mod product;
mod user;

pub use cart::*;
pub use envelope::*;
pub use product::*;
pub use user::*;
