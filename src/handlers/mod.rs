pub mod certificates;
pub mod health;
pub mod seals;
pub mod verify;
