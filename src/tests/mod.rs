
mod core_tests;
mod registry_tests;
