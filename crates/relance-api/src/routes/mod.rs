pub mod health;
pub mod questionnaires;
pub mod responses;
pub mod sweeps;
