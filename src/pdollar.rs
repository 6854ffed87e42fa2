//! Main module for pdollar library functionality

pub mod config;
pub mod formats;
pub mod geometry;
pub mod lexer;
pub mod parser;
pub mod recognizer;
pub mod store;
