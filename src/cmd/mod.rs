pub mod decrypt;
pub mod resolve;
pub mod sign;
pub mod stream;
