pub mod payment;
pub mod ping;

pub use payment::*;
pub use ping::*;
