mod classifier;

pub use self::classifier::*;
