pub mod map;
pub mod panels;
pub mod stats;
pub mod table;
