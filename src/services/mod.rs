pub mod clock;
pub mod console_sink;
pub mod controller;
pub mod normalizer;
pub mod panels;
pub mod render;
pub mod scheduler;
pub mod sink;
