pub mod assistants;
pub mod driver;
pub mod errors;
pub mod models;
pub mod retrieval;
pub mod toolbox;
