//! 인증/인가를 위한 도메인 모델.

mod role;
mod user;

pub use role::*;
pub use user::*;
