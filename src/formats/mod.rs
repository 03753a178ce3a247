//! Text representations of a [`BlockDocument`](crate::model::BlockDocument)
//!
//! The JSON save shape is handled by serde on the model itself; HTML lives here.

pub mod html;
