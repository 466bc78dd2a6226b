pub mod regions;
pub mod util;
