//! 进程生命周期

pub mod lifetime;
