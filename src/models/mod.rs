pub mod enums;
pub mod order;
pub mod patient;
pub mod report;
pub mod result;
pub mod technician;
pub mod test_type;

pub use enums::*;
pub use order::*;
pub use patient::*;
pub use report::*;
pub use result::*;
pub use technician::*;
pub use test_type::*;
