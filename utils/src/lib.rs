mod error;
pub use error::ArithError;

mod bigint_ext;
pub use bigint_ext::BigIntExt;

mod biguint_ext;
pub use biguint_ext::BigUintExt;
