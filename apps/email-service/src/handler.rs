//! # HTTP ハンドラ
//!
//! - [`email`] - `POST /send`
//! - [`health`] - `GET /health`

pub mod email;
pub mod health;

pub use email::{EmailState, SendEmailResponse, send_email};
pub use health::health_check;
