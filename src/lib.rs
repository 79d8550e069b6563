// csv-insight - CSV upload, AI-assisted analysis and dashboard generation
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
