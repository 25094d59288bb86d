pub mod rankup;

pub use rankup::{RankupCommand, RankupSignal};
