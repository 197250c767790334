pub mod entities;
pub mod level;
pub mod responses;
