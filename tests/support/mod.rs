#![allow(dead_code)]

pub mod app;
pub mod architecture;
pub mod config;
pub mod lightstreamer;
