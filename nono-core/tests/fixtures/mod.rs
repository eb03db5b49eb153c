pub mod factories;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use factories::*;
#[allow(unused_imports)]
pub use http::*;
