pub mod assistant;
pub mod calendar;
pub mod generative;
pub mod oauth;
pub mod types;
