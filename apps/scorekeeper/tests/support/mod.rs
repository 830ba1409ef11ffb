#![allow(dead_code)]


pub use factory::{direct, file_store, memory_store_with, totals};
