//! HTML front end rendered with Askama

pub mod handlers;
