//! 재고 관리를 위한 도메인 모델.

mod fields;
mod product;
mod sample;
mod stock;

pub use product::*;
pub use sample::*;
pub use stock::*;
