//! Stream-source providers

pub mod cinemaos;

pub use cinemaos::CinemaOsProvider;
