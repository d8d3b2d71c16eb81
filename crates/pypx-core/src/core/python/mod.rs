pub mod installer;
pub mod locator;
pub mod python_cli;
pub mod version;
