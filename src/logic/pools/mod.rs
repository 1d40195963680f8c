pub mod pair;
pub mod pool;

pub use pair::ConstantProductPair;
pub use pool::Pool;
