//! Mock firmware project trees for testing.


pub use project::FirmwareProject;
