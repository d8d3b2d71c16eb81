//! Virtual environment management.

pub mod env_cli;
pub mod venv_manager;
