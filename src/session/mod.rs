pub mod core;
mod requests;
mod verbs;
