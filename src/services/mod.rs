pub mod games;
pub mod roster;
pub mod seeding;
