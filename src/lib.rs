//! food-link
//!
//! 栄養成分表とFODMAPリストの照合・統合ツール（ライブラリ部分）

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod merger;
pub mod output;

pub use food_link_common as common;
