pub mod discipline;
