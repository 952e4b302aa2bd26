pub mod action;
pub mod card;
pub mod deck;
pub mod direction;
pub mod face;
pub mod hand;
pub mod rank;
pub mod suit;
