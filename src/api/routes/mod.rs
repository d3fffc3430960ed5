pub mod rounds;
pub mod standings;
pub mod teams;
pub mod tournaments;
