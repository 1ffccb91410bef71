pub mod aggregate;
pub mod duration;
pub mod pipeline;
pub mod render;
pub mod table;
